use crate::{
    errors::HistoryError,
    history::{HistoryRequest, HistoryResponse, aggregate},
    server::state::AppStateExt,
};
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub chain: Option<String>,
    pub address: Option<String>,
}

/// `GET /api/history?chain=<key>&address=<0x…>`
///
/// Input is validated before the key is checked, so a bad request never
/// reaches Moralis and never depends on server configuration.
pub async fn route(
    State(state): AppStateExt,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, HistoryError> {
    let request = HistoryRequest::validate(query.chain.as_deref(), query.address.as_deref())?;

    let client = state.moralis.as_ref().ok_or(HistoryError::MissingApiKey)?;

    aggregate(client, &request).await.map(Json)
}

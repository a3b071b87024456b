use crate::{chains::Chain, server::state::AppStateExt};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub revision: String,
    pub moralis_configured: bool,
    pub chains: Vec<String>,
}

pub async fn route(State(state): AppStateExt) -> Json<RootResponse> {
    Json(RootResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        revision: env!("GIT_REVISION").to_string(),
        moralis_configured: state.moralis.is_some(),
        chains: Chain::keys().into_iter().map(String::from).collect(),
    })
}

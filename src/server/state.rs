use crate::moralis::MoralisClient;
use axum::extract::State;

/// Read-only, shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured.
    pub moralis: Option<MoralisClient>,
}

pub type AppStateExt = State<AppState>;

use axum::{
    Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get},
};
use history_proxy::moralis::Endpoint;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const API_PREFIX: &str = "/api/v2.2";

#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockResponse {
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn empty() -> Self {
        Self::json(json!({ "result": [] }))
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/html",
            body: body.into(),
            delay: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// What the mock saw for one upstream call.
#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub endpoint: Endpoint,
    pub address: String,
    pub query: HashMap<String, String>,
    pub api_key: Option<String>,
}

struct MockState {
    responses: HashMap<Endpoint, MockResponse>,
    hits: HashMap<Endpoint, AtomicUsize>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl MockState {
    async fn answer(
        &self,
        endpoint: Endpoint,
        address: String,
        query: HashMap<String, String>,
        headers: HeaderMap,
    ) -> Response {
        if let Some(hits) = self.hits.get(&endpoint) {
            hits.fetch_add(1, Ordering::SeqCst);
        }

        self.seen.lock().unwrap().push(SeenRequest {
            endpoint,
            address,
            query,
            api_key: headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        });

        let response = self
            .responses
            .get(&endpoint)
            .cloned()
            .unwrap_or_else(MockResponse::empty);

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        (
            StatusCode::from_u16(response.status).unwrap(),
            [(CONTENT_TYPE, response.content_type)],
            response.body,
        )
            .into_response()
    }
}

/// A stand-in for the Moralis deep index API. Endpoints without a
/// configured response answer `{"result": []}`.
pub struct MockMoralis {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockMoralis {
    pub async fn start(responses: HashMap<Endpoint, MockResponse>) -> Self {
        let state = Arc::new(MockState {
            responses,
            hits: Endpoint::ALL
                .iter()
                .map(|endpoint| (*endpoint, AtomicUsize::new(0)))
                .collect(),
            seen: Mutex::new(vec![]),
        });

        let mock_app = Router::new()
            .route(
                &format!("{API_PREFIX}/{{address}}/transactions"),
                listing(Endpoint::Transactions, state.clone()),
            )
            .route(
                &format!("{API_PREFIX}/{{address}}/erc20/transfers"),
                listing(Endpoint::Erc20Transfers, state.clone()),
            )
            .route(
                &format!("{API_PREFIX}/{{address}}/internal-transactions"),
                listing(Endpoint::InternalTransactions, state.clone()),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}{API_PREFIX}");

        tokio::spawn(async move {
            axum::serve(listener, mock_app).await.unwrap();
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Self { base_url, state }
    }

    pub async fn empty() -> Self {
        Self::start(HashMap::new()).await
    }

    /// Every endpoint answers empty, except `endpoint`.
    pub async fn with(endpoint: Endpoint, response: MockResponse) -> Self {
        Self::start(HashMap::from([(endpoint, response)])).await
    }

    pub fn hits(&self, endpoint: Endpoint) -> usize {
        self.state
            .hits
            .get(&endpoint)
            .map(|hits| hits.load(Ordering::SeqCst))
            .unwrap_or_default()
    }

    pub fn total_hits(&self) -> usize {
        Endpoint::ALL.iter().map(|e| self.hits(*e)).sum()
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }
}

fn listing(endpoint: Endpoint, state: Arc<MockState>) -> MethodRouter {
    get(
        move |Path(address): Path<String>,
              Query(query): Query<HashMap<String, String>>,
              headers: HeaderMap| {
            let state = state.clone();
            async move { state.answer(endpoint, address, query, headers).await }
        },
    )
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog;
use crate::core::error::{ConfigError, GatewayError, classify};
use crate::gateway::Gateway;
use crate::providers::space::SpaceBackend;
use crate::store::BlobStore;

const DEFAULT_STORE_BUDGET_BYTES: u64 = 64 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub cors: bool,
    pub store_budget_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors: true,
            store_budget_bytes: DEFAULT_STORE_BUDGET_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
    store_budget_bytes: Option<u64>,
}

impl ServerConfigBuilder {
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    pub fn store_budget_bytes(mut self, budget: u64) -> Self {
        self.store_budget_bytes = Some(budget);
        self
    }

    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            cors: self.cors.unwrap_or(defaults.cors),
            store_budget_bytes: self.store_budget_bytes.unwrap_or(defaults.store_budget_bytes),
        }
    }
}

/// Shared application state. The blob store is the only mutable piece and
/// lives here, constructed exactly once with the server.
pub struct AppState {
    gateway: Gateway,
    store: Mutex<BlobStore>,
    http: reqwest::Client,
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        let backend = SpaceBackend::new()?;
        let state = Arc::new(AppState {
            gateway: Gateway::new(Arc::new(backend)),
            store: Mutex::new(BlobStore::new(config.store_budget_bytes)),
            http: reqwest::Client::new(),
        });
        Ok(Self { config, state })
    }

    fn router(&self) -> Router {
        // Both the bare and the /v1-prefixed paths are served; stock OpenAI
        // clients send the prefix, the original deployment did not.
        let mut router = Router::new()
            .route("/health", get(health))
            .route("/models", get(list_models))
            .route("/v1/models", get(list_models))
            .route("/images/generations", post(generate_image))
            .route("/v1/images/generations", post(generate_image))
            .route("/api/proxy-image", get(proxy_image))
            .with_state(Arc::clone(&self.state));

        router = router.layer(TraceLayer::new_for_http());
        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }
        router
    }

    /// Runs the server until ctrl-c or SIGTERM.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.router();

        tracing::info!(addr = %self.config.addr, "starting gateway");
        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("gateway shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => tracing::warn!(%error, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn list_models() -> Json<crate::core::types::ModelList> {
    Json(catalog::model_list())
}

/// `POST /v1/images/generations`. The raw body goes straight to the
/// gateway so an unparseable payload maps to the canonical invalid-params
/// error instead of a framework-shaped rejection.
async fn generate_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.gateway.generate(&body, authorization).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error_response(&error),
    }
}

#[derive(Debug, Deserialize)]
struct ProxyQuery {
    url: Option<String>,
}

/// `GET /api/proxy-image?url=<encoded>`. Serves the upstream asset bytes,
/// caching them in the blob store keyed by the original URL. Store refusals
/// degrade to an uncached passthrough; fetch failures surface through the
/// canonical envelope.
async fn proxy_image(State(state): State<Arc<AppState>>, Query(query): Query<ProxyQuery>) -> Response {
    let Some(url) = query.url.filter(|url| !url.trim().is_empty()) else {
        return error_response(&GatewayError::invalid_params("url"));
    };

    {
        let mut store = state.store.lock().await;
        if let Some(blob) = store.get(&url) {
            return asset_response(&blob.content_type, blob.bytes.clone());
        }
    }

    let response = match state.http.get(&url).send().await {
        Ok(response) => response,
        Err(error) => return error_response(&classify("proxy", &error.to_string(), None)),
    };

    let status = response.status().as_u16();
    if !response.status().is_success() {
        let message = match response.text().await {
            Ok(body) if !body.trim().is_empty() => body,
            _ => format!("http status {status}"),
        };
        return error_response(&classify("proxy", &message, Some(status)));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes.to_vec(),
        Err(error) => return error_response(&classify("proxy", &error.to_string(), None)),
    };

    {
        let mut store = state.store.lock().await;
        if !store.store(&url, &content_type, bytes.clone()) {
            tracing::warn!(%url, size = bytes.len(), "asset exceeds store budget; serving uncached");
        }
    }

    asset_response(&content_type, bytes)
}

fn asset_response(content_type: &str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type.to_string())],
        bytes,
    )
        .into_response()
}

/// Renders the canonical error envelope with its dedicated HTTP status.
fn error_response(error: &GatewayError) -> Response {
    let status =
        StatusCode::from_u16(error.kind.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body = json!({
        "error": {
            "kind": error.kind,
            "message": error.message,
            "provider": error.provider,
        }
    });
    (status, Json(body)).into_response()
}

#![cfg(feature = "live-tests")]

//! Live smoke test against the real hosted spaces. Opt-in via
//! `cargo test --features live-tests`; generation runs on free-tier queues
//! and can take tens of seconds when the space is cold.

use std::sync::Arc;
use std::sync::Once;

use mirage_gateway::core::error::ErrorKind;
use mirage_gateway::core::traits::ImageBackend;
use mirage_gateway::gateway::Gateway;
use mirage_gateway::providers::space::SpaceBackend;
use serde_json::json;

const LIVE_MODEL_ENV: &str = "MIRAGE_LIVE_MODEL";
const LIVE_TOKEN_ENV: &str = "MIRAGE_LIVE_TOKEN";
const DEFAULT_LIVE_MODEL: &str = "flux-schnell";

static DOTENV_INIT: Once = Once::new();

fn load_env() {
    DOTENV_INIT.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

fn live_gateway() -> Gateway {
    let backend: Arc<dyn ImageBackend> =
        Arc::new(SpaceBackend::new().expect("default backend configuration is valid"));
    Gateway::new(backend)
}

#[tokio::test]
async fn test_live_generation_round_trip() {
    load_env();

    let model = std::env::var(LIVE_MODEL_ENV).unwrap_or_else(|_| DEFAULT_LIVE_MODEL.to_string());
    let authorization = std::env::var(LIVE_TOKEN_ENV)
        .ok()
        .map(|token| format!("Bearer {token}"));

    let body = serde_json::to_vec(&json!({
        "prompt": "a lighthouse on a cliff at dawn, oil painting",
        "model": model,
    }))
    .expect("serialize body");

    let result = live_gateway()
        .generate(&body, authorization.as_deref())
        .await;

    match result {
        Ok(response) => {
            assert_eq!(response.data.len(), 1);
            assert!(!response.data[0].url.is_empty());
        }
        // Free-tier queues legitimately push back under load; a classified
        // throttle is an acceptable live outcome, an unclassified one is not.
        Err(error) => {
            assert!(
                matches!(
                    error.kind,
                    ErrorKind::RateLimited | ErrorKind::QuotaExceeded | ErrorKind::ProviderError
                ),
                "unexpected live failure: {error}"
            );
        }
    }
}

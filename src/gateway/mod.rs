use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth;
use crate::catalog::{self, ResolvedTarget};
use crate::core::error::{ErrorKind, GatewayError};
use crate::core::traits::ImageBackend;
use crate::core::types::{
    Credential, GenerationRequest, GenerationResponse, ImageData, ImageOutput, ProviderId,
};
use crate::providers::provider_config;

const PROXY_PATH: &str = "/api/proxy-image";
/// Gradio serves generated files under an inline-file path; both the
/// current and the legacy prefix appear in the wild.
const RAW_FILE_PREFIXES: [&str; 2] = ["/gradio_api/file=", "/file="];

/// Adapter between the public OpenAI-shaped contract and the backend seam:
/// validates the inbound shape, resolves the routing target, enforces
/// credential affinity, and shapes the outbound response.
pub struct Gateway {
    backend: Arc<dyn ImageBackend>,
}

impl Gateway {
    pub fn new(backend: Arc<dyn ImageBackend>) -> Self {
        Self { backend }
    }

    /// Full request flow for `POST /v1/images/generations`. Every rejection
    /// happens before the first network call.
    pub async fn generate(
        &self,
        body: &[u8],
        authorization: Option<&str>,
    ) -> Result<GenerationResponse, GatewayError> {
        let request = parse_request(body)?;
        validate_request(&request)?;

        let target = catalog::resolve(&request.model);
        let credential = auth::parse_bearer_token(authorization);
        check_credential(&target, &credential)?;

        tracing::info!(
            model = target.entry.id,
            provider = target.provider.as_str(),
            "generation request accepted"
        );

        let output = self
            .backend
            .generate(&target, &request.prompt, &credential)
            .await?;

        Ok(build_response(output, now_unix()))
    }
}

fn parse_request(body: &[u8]) -> Result<GenerationRequest, GatewayError> {
    serde_json::from_slice(body).map_err(|_| GatewayError::invalid_params("body"))
}

fn validate_request(request: &GenerationRequest) -> Result<(), GatewayError> {
    if request.prompt.trim().is_empty() {
        return Err(GatewayError::invalid_prompt());
    }
    if let Some(n) = request.n {
        if n != 1 {
            return Err(GatewayError::invalid_params("n"));
        }
    }
    if let Some(format) = request.response_format.as_deref() {
        if format != "url" {
            return Err(GatewayError::invalid_params("response_format"));
        }
    }
    Ok(())
}

fn check_credential(
    target: &ResolvedTarget,
    credential: &Credential,
) -> Result<(), GatewayError> {
    if let Some(hint) = credential.provider_hint {
        if hint != target.provider {
            return Err(GatewayError::new(
                ErrorKind::InvalidParams,
                hint.as_str(),
                format!(
                    "invalid parameter: Authorization (token is scoped to {hint} but model {} resolves to {})",
                    target.entry.id, target.provider
                ),
            ));
        }
    }

    let config = provider_config(target.provider);
    if config.requires_auth && credential.token.is_none() {
        return Err(GatewayError::new(
            ErrorKind::AuthRequired,
            target.provider.as_str(),
            format!(
                "{} requires an API token; supply it as a bearer Authorization header",
                target.provider
            ),
        ));
    }

    Ok(())
}

fn build_response(output: ImageOutput, created: u64) -> GenerationResponse {
    GenerationResponse {
        created,
        data: vec![ImageData {
            url: to_proxy_url(&output.url),
            seed: output.seed,
        }],
    }
}

/// Rewrites a direct hosting-platform file URL onto the same-origin proxy.
///
/// Rewriting requires both signals: the host ends in a recognized platform
/// suffix AND the path is a raw inline-file reference. Anything else passes
/// through untouched, which also makes the rewrite idempotent — a proxied
/// URL is relative and percent-encoded, so it never matches again.
pub fn to_proxy_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => {
            let recognized = parsed.host_str().is_some_and(host_is_recognized)
                && is_raw_file_path(parsed.path());
            if recognized {
                proxied(url)
            } else {
                url.to_string()
            }
        }
        // Substring fallback for values the URL parser rejects.
        Err(_) => {
            let recognized = ProviderId::ALL
                .iter()
                .any(|provider| url.contains(provider_config(*provider).host_suffix))
                && RAW_FILE_PREFIXES.iter().any(|prefix| url.contains(prefix));
            if recognized {
                proxied(url)
            } else {
                url.to_string()
            }
        }
    }
}

fn host_is_recognized(host: &str) -> bool {
    ProviderId::ALL
        .iter()
        .any(|provider| host.ends_with(provider_config(*provider).host_suffix))
}

fn is_raw_file_path(path: &str) -> bool {
    RAW_FILE_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

fn proxied(url: &str) -> String {
    format!("{PROXY_PATH}?url={}", urlencoding::encode(url))
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

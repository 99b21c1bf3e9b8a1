use async_trait::async_trait;
use serde_json::{Value, json};

use crate::catalog::{ModelEntry, ResolvedTarget};
use crate::core::error::{ConfigError, ErrorKind, GatewayError};
use crate::core::traits::ImageBackend;
use crate::core::types::{Credential, ImageOutput};
use crate::providers::provider_config;
use crate::queue::client::{QueueClient, RetryPolicy};
use crate::queue::sse;

const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Shared backend for every hosting platform: the mirrored applications all
/// expose the same Gradio queue protocol, so one implementation drives them
/// and only the API root differs per provider.
pub struct SpaceBackend {
    queue: QueueClient,
    base_url_override: Option<String>,
}

impl SpaceBackend {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            queue: QueueClient::new(DEFAULT_TIMEOUT_MS, RetryPolicy::default())?,
            base_url_override: None,
        })
    }

    pub fn with_queue_client(queue: QueueClient) -> Self {
        Self {
            queue,
            base_url_override: None,
        }
    }

    /// Routes every job to a fixed API root instead of the per-provider
    /// domain. Intended for self-hosted Gradio applications and tests.
    pub fn with_base_url(queue: QueueClient, base_url: impl Into<String>) -> Self {
        Self {
            queue,
            base_url_override: Some(base_url.into()),
        }
    }

    fn api_root_for(&self, target: &ResolvedTarget) -> String {
        match &self.base_url_override {
            Some(base_url) => base_url.trim_end_matches('/').to_string(),
            None => provider_config(target.provider).api_root(target.entry.space),
        }
    }
}

#[async_trait]
impl ImageBackend for SpaceBackend {
    async fn generate(
        &self,
        target: &ResolvedTarget,
        prompt: &str,
        credential: &Credential,
    ) -> Result<ImageOutput, GatewayError> {
        let base_url = self.api_root_for(target);
        let inputs = gradio_inputs(prompt, target.entry);

        tracing::info!(
            provider = target.provider.as_str(),
            model = target.entry.id,
            endpoint = target.entry.endpoint,
            "dispatching generation job"
        );

        let outputs = self
            .queue
            .submit_and_await(
                target.provider.as_str(),
                &base_url,
                target.entry.endpoint,
                &inputs,
                credential.token.as_deref(),
            )
            .await?;

        image_output_from(target.provider.as_str(), &outputs)
    }
}

/// Input tuple shared by the mirrored text-to-image spaces:
/// prompt, seed, randomize_seed, width, height, steps.
fn gradio_inputs(prompt: &str, entry: &ModelEntry) -> Vec<Value> {
    vec![
        json!(prompt),
        json!(0),
        json!(true),
        json!(entry.width),
        json!(entry.height),
        json!(entry.steps),
    ]
}

/// Pulls the image URL (and the seed echo, when present) out of the
/// normalized output sequence.
fn image_output_from(provider: &str, outputs: &[Value]) -> Result<ImageOutput, GatewayError> {
    let Some(first) = outputs.first() else {
        return Err(GatewayError::new(
            ErrorKind::ProviderError,
            provider,
            "empty output sequence from backend",
        ));
    };

    let Some(url) = image_url_from(first) else {
        return Err(GatewayError::new(
            ErrorKind::ProviderError,
            provider,
            format!(
                "unexpected image payload shape: {}",
                sse::bounded_preview(&first.to_string())
            ),
        ));
    };

    Ok(ImageOutput {
        url,
        seed: outputs.get(1).and_then(Value::as_i64),
    })
}

fn image_url_from(value: &Value) -> Option<String> {
    match value {
        Value::String(url) => Some(url.clone()),
        Value::Object(map) => {
            if let Some(url) = map.get("url").and_then(Value::as_str) {
                return Some(url.to_string());
            }
            map.get("image")
                .and_then(|image| image.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests;

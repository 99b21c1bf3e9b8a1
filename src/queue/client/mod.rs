use std::time::Duration;

use serde_json::{Value, json};

use crate::core::error::{ConfigError, ErrorKind, GatewayError, classify};
use crate::queue::sse;

/// Retry policy for one phase of the queue protocol. Only cold-start
/// signals (404 while the route is not yet registered, 503 while the
/// application wakes) are transient; everything else fails fast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub retryable_statuses: Vec<u16>,
}

impl RetryPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_attempts must be >= 1".to_string(),
            });
        }
        if let Some(status) = self
            .retryable_statuses
            .iter()
            .copied()
            .find(|status| !(100..=599).contains(status))
        {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!("retryable status code must be in 100..=599: {status}"),
            });
        }
        Ok(())
    }

    fn should_retry_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Linear backoff: the delay after attempt `n` is `n * base`.
    fn backoff_after_attempt(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.base_delay_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            retryable_statuses: vec![404, 503],
        }
    }
}

/// Client for the two-call queue protocol: submit a job, then stream its
/// result. Presents a single blocking-call contract to the caller; retries
/// and backoff stay internal.
#[derive(Debug, Clone)]
pub struct QueueClient {
    client: reqwest::Client,
    retry_policy: RetryPolicy,
    timeout_ms: u64,
}

impl QueueClient {
    pub fn new(timeout_ms: u64, retry_policy: RetryPolicy) -> Result<Self, ConfigError> {
        Self::with_client(reqwest::Client::new(), timeout_ms, retry_policy)
    }

    pub fn with_client(
        client: reqwest::Client,
        timeout_ms: u64,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout { timeout_ms });
        }
        retry_policy.validate()?;

        Ok(Self {
            client,
            retry_policy,
            timeout_ms,
        })
    }

    /// Runs the full submit → await cycle for one job and returns the
    /// normalized output sequence.
    pub async fn submit_and_await(
        &self,
        provider: &str,
        base_url: &str,
        endpoint: &str,
        inputs: &[Value],
        token: Option<&str>,
    ) -> Result<Vec<Value>, GatewayError> {
        let event_id = self
            .submit(provider, base_url, endpoint, inputs, token)
            .await?;
        let body = self
            .await_result(provider, base_url, endpoint, &event_id, token)
            .await?;
        let payload = sse::extract_terminal(provider, &body)?;
        normalize_outputs(provider, payload)
    }

    async fn submit(
        &self,
        provider: &str,
        base_url: &str,
        endpoint: &str,
        inputs: &[Value],
        token: Option<&str>,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/call/{endpoint}", base_url.trim_end_matches('/'));
        let body = json!({ "data": inputs });

        for attempt in 1..=self.retry_policy.max_attempts {
            let mut request = self
                .client
                .post(&url)
                .timeout(Duration::from_millis(self.timeout_ms))
                .json(&body);
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(error) => return Err(classify(provider, &error.to_string(), None)),
            };

            let status = response.status().as_u16();
            if response.status().is_success() {
                let parsed: Value = response.json().await.map_err(|error| {
                    classify(provider, &format!("malformed queue response: {error}"), None)
                })?;
                let Some(event_id) = parsed.get("event_id").and_then(Value::as_str) else {
                    return Err(GatewayError::new(
                        ErrorKind::ProviderError,
                        provider,
                        "No event_id returned from queue",
                    ));
                };
                tracing::debug!(provider, endpoint, event_id, "queue job accepted");
                return Ok(event_id.to_string());
            }

            if self.retry_policy.should_retry_status(status) {
                if attempt < self.retry_policy.max_attempts {
                    tracing::warn!(
                        provider,
                        status,
                        attempt,
                        "transient status from queue submit; retrying"
                    );
                    tokio::time::sleep(self.retry_policy.backoff_after_attempt(attempt)).await;
                }
                continue;
            }

            let message = read_status_message(status, response).await;
            return Err(classify(provider, &message, Some(status)));
        }

        Err(GatewayError::new(
            ErrorKind::ProviderError,
            provider,
            "Queue request failed after retries",
        ))
    }

    async fn await_result(
        &self,
        provider: &str,
        base_url: &str,
        endpoint: &str,
        event_id: &str,
        token: Option<&str>,
    ) -> Result<String, GatewayError> {
        let url = format!(
            "{}/call/{endpoint}/{event_id}",
            base_url.trim_end_matches('/')
        );

        for attempt in 1..=self.retry_policy.max_attempts {
            let mut request = self
                .client
                .get(&url)
                .timeout(Duration::from_millis(self.timeout_ms));
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(error) => return Err(classify(provider, &error.to_string(), None)),
            };

            let status = response.status().as_u16();
            if response.status().is_success() {
                let body = response.text().await.map_err(|error| {
                    classify(
                        provider,
                        &format!("failed to read result stream: {error}"),
                        None,
                    )
                })?;
                if !body.trim().is_empty() {
                    return Ok(body);
                }
            } else if !self.retry_policy.should_retry_status(status) {
                let message = read_status_message(status, response).await;
                return Err(classify(provider, &message, Some(status)));
            }

            if attempt < self.retry_policy.max_attempts {
                tracing::warn!(
                    provider,
                    status,
                    attempt,
                    "result stream not ready; retrying"
                );
                tokio::time::sleep(self.retry_policy.backoff_after_attempt(attempt)).await;
            }
        }

        Err(GatewayError::new(
            ErrorKind::ProviderError,
            provider,
            "Result request failed after retries",
        ))
    }
}

/// Coerces a terminal payload into the plain output sequence. Backends
/// return either the bare sequence or an object wrapping it under `data`;
/// any other shape is a contract violation, not something to guess around.
fn normalize_outputs(provider: &str, payload: Value) -> Result<Vec<Value>, GatewayError> {
    let rendered = payload.to_string();
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("data") {
                return Ok(items);
            }
            Err(unexpected_payload(provider, &rendered))
        }
        _ => Err(unexpected_payload(provider, &rendered)),
    }
}

fn unexpected_payload(provider: &str, rendered: &str) -> GatewayError {
    GatewayError::new(
        ErrorKind::ProviderError,
        provider,
        format!(
            "unexpected completion payload shape: {}",
            sse::bounded_preview(rendered)
        ),
    )
}

async fn read_status_message(status: u16, response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => format!("http status {status}"),
        Err(error) => format!("http status {status}; failed to read response body: {error}"),
    }
}

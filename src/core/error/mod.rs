use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable note attached when a backend signals cold-start unavailability.
/// The raw upstream text for these responses is framework boilerplate, so a
/// fixed human-readable message replaces it.
pub const COLD_START_NOTE: &str =
    "Service temporarily unavailable; the backend may be cold-starting. Retry shortly.";

const GATEWAY_PROVIDER: &str = "gateway";

/// Closed error vocabulary crossing the gateway boundary. Every upstream
/// failure is mapped into one of these kinds before it propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimited,
    QuotaExceeded,
    AuthInvalid,
    AuthRequired,
    Timeout,
    ProviderError,
    InvalidParams,
    InvalidPrompt,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::QuotaExceeded => "quota_exceeded",
            Self::AuthInvalid => "auth_invalid",
            Self::AuthRequired => "auth_required",
            Self::Timeout => "timeout",
            Self::ProviderError => "provider_error",
            Self::InvalidParams => "invalid_params",
            Self::InvalidPrompt => "invalid_prompt",
        }
    }

    /// HTTP status the public contract maps this kind onto.
    pub fn http_status(self) -> u16 {
        match self {
            Self::RateLimited | Self::QuotaExceeded => 429,
            Self::AuthInvalid | Self::AuthRequired => 401,
            Self::Timeout => 504,
            Self::InvalidParams | Self::InvalidPrompt => 400,
            Self::ProviderError => 502,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} [provider={provider}]: {message}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub provider: String,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn invalid_params(field: &str) -> Self {
        Self::new(
            ErrorKind::InvalidParams,
            GATEWAY_PROVIDER,
            format!("invalid parameter: {field}"),
        )
    }

    pub fn invalid_prompt() -> Self {
        Self::new(
            ErrorKind::InvalidPrompt,
            GATEWAY_PROVIDER,
            "prompt must be a non-empty string",
        )
    }
}

/// Maps a raw upstream message/status pair onto the canonical taxonomy.
///
/// Ordering is deliberate: quota and rate-limit rules must precede the
/// generic provider-error fallback, and status-code signals take precedence
/// over substring heuristics within each rule. First match wins; matching is
/// case-insensitive.
pub fn classify(provider: &str, message: &str, status: Option<u16>) -> GatewayError {
    let lowered = message.to_ascii_lowercase();
    let contains = |needles: &[&str]| needles.iter().any(|needle| lowered.contains(needle));

    let (kind, rendered) = if status == Some(429) || contains(&["rate limit", "too many requests"])
    {
        (ErrorKind::RateLimited, message.to_string())
    } else if contains(&["quota", "exceeded"]) {
        (ErrorKind::QuotaExceeded, message.to_string())
    } else if matches!(status, Some(401 | 403)) || contains(&["unauthorized", "forbidden"]) {
        (ErrorKind::AuthInvalid, message.to_string())
    } else if contains(&["timeout", "timed out"]) {
        (ErrorKind::Timeout, message.to_string())
    } else if status == Some(503) || contains(&["unavailable", "loading"]) {
        (ErrorKind::ProviderError, COLD_START_NOTE.to_string())
    } else {
        (ErrorKind::ProviderError, message.to_string())
    };

    GatewayError::new(kind, provider, rendered)
}

/// Construction-time configuration failures. These never cross the public
/// HTTP boundary; they abort startup instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid timeout: {timeout_ms} ms")]
    InvalidTimeout { timeout_ms: u64 },
    #[error("invalid retry policy: {reason}")]
    InvalidRetryPolicy { reason: String },
}

use crate::core::types::{Credential, ProviderId};

/// Hugging Face token format; the prefix is part of the token itself and is
/// forwarded intact.
const HUGGING_FACE_PREFIX: &str = "hf_";
/// Gateway-side scoping markers. These are stripped before the remainder is
/// forwarded as the platform token.
const MODEL_SCOPE_PREFIX: &str = "ms-";
const OPEN_XLAB_PREFIX: &str = "xlab-";

/// Parses an `Authorization` header value into a credential.
///
/// Strips a case-insensitive `Bearer ` prefix, then inspects the remaining
/// token for a provider-identifying prefix. Tokens with no recognized prefix
/// carry no provider hint and are stored as-is. An absent or blank header
/// yields an empty credential.
pub fn parse_bearer_token(header: Option<&str>) -> Credential {
    let Some(raw) = header else {
        return Credential::default();
    };

    let token = strip_bearer(raw.trim()).trim();
    if token.is_empty() {
        return Credential::default();
    }

    if starts_with_ignore_case(token, HUGGING_FACE_PREFIX) {
        return Credential {
            token: Some(token.to_string()),
            provider_hint: Some(ProviderId::HuggingFace),
        };
    }

    if let Some(rest) = strip_prefix_ignore_case(token, MODEL_SCOPE_PREFIX) {
        return Credential {
            token: non_empty(rest),
            provider_hint: Some(ProviderId::ModelScope),
        };
    }

    if let Some(rest) = strip_prefix_ignore_case(token, OPEN_XLAB_PREFIX) {
        return Credential {
            token: non_empty(rest),
            provider_hint: Some(ProviderId::OpenXlab),
        };
    }

    Credential {
        token: Some(token.to_string()),
        provider_hint: None,
    }
}

fn strip_bearer(value: &str) -> &str {
    strip_prefix_ignore_case(value, "bearer ").unwrap_or(value)
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len() && value[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if starts_with_ignore_case(value, prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

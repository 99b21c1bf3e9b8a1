use serde_json::Value;

use crate::core::error::{ErrorKind, GatewayError, classify};

const BODY_PREVIEW_CHARS: usize = 200;

/// Bounds free-form upstream text before it is embedded in an error message.
pub(crate) fn bounded_preview(text: &str) -> String {
    text.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// Extracts the terminal payload from a Gradio event-stream body.
///
/// The body is a sequence of records pairing an `event:` line with a
/// following `data:` line. The first `complete` record wins; an `error`
/// record fails through the classifier with the parsed error message. A
/// body with neither is a provider error carrying a bounded preview of the
/// raw text.
pub fn extract_terminal(provider: &str, body: &str) -> Result<Value, GatewayError> {
    let mut current_event: Option<&str> = None;

    for line in body.lines() {
        let line = line.trim_end_matches('\r');

        if let Some(name) = line.strip_prefix("event:") {
            current_event = Some(name.trim());
            continue;
        }

        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();

        match current_event {
            Some("complete") => {
                return serde_json::from_str(data).map_err(|error| {
                    classify(
                        provider,
                        &format!("malformed completion payload: {error}"),
                        None,
                    )
                });
            }
            Some("error") => {
                // Malformed error payloads degrade to a classified raw-text
                // error; they must not abort extraction with a parse panic.
                let message = match serde_json::from_str::<Value>(data) {
                    Ok(payload) => error_message_from(&payload),
                    Err(_) => data.to_string(),
                };
                return Err(classify(provider, &message, None));
            }
            _ => {}
        }
    }

    Err(GatewayError::new(
        ErrorKind::ProviderError,
        provider,
        format!("no terminal event in stream: {}", bounded_preview(body)),
    ))
}

fn error_message_from(payload: &Value) -> String {
    for field in ["message", "error"] {
        if let Some(text) = payload.get(field).and_then(Value::as_str) {
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    payload.to_string()
}

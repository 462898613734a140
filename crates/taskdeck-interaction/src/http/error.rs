//! Turns API error bodies into readable messages.
//!
//! The backend answers errors either as `{"detail": "..."}` or as a map of
//! field names to message lists. Anything else falls back to a message
//! chosen by status code.

use serde_json::Value;
use taskdeck_core::error::TaskdeckError;

pub fn error_from_response(status: u16, body: &[u8]) -> TaskdeckError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| message_from_body(&value))
        .unwrap_or_else(|| fallback_message(status).to_string());
    TaskdeckError::http(status, message)
}

fn message_from_body(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Object(map) => {
            if let Some(detail) = map.get("detail").and_then(Value::as_str) {
                return Some(detail.to_string());
            }
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(field, messages)| {
                    let joined = join_messages(messages)?;
                    Some(if field == "non_field_errors" {
                        joined
                    } else {
                        format!("{}: {}", field, joined)
                    })
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

fn join_messages(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let texts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!texts.is_empty()).then(|| texts.join(" "))
        }
        _ => None,
    }
}

fn fallback_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request",
        401 => "Authentication required",
        403 => "Permission denied",
        404 => "Not found",
        429 => "Too many requests, try again later",
        500..=599 => "Server is temporarily unavailable",
        _ => "Unexpected response",
    }
}

use crate::error::{ApiError, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Pull the `message` field out of a backend envelope, if there is one.
pub fn extract_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
}

/// Build the message for a non-2xx response: the envelope's `message`, else
/// the raw body, else the status reason phrase.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = extract_message(&json) {
            return message;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Request failed")
        .to_string()
}

/// Unwrap a `{success, message, data}` envelope into `T`.
///
/// Bodies without an envelope are deserialized as-is.
pub fn extract_data<T: DeserializeOwned>(body: Value) -> Result<T> {
    let is_envelope = body
        .as_object()
        .map_or(false, |o| o.contains_key("success") || o.contains_key("data"));

    if !is_envelope {
        return Ok(serde_json::from_value(body)?);
    }

    if body.get("success").and_then(|s| s.as_bool()) == Some(false) {
        let message = extract_message(&body).unwrap_or_else(|| "Request failed".to_string());
        return Err(ApiError::Rejected(message));
    }

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    Ok(serde_json::from_value(data)?)
}

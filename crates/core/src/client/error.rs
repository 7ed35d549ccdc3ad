use serde_json::Value;
use std::fmt;

/// Fallback message for error bodies that are not JSON and for failures with nothing to say.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// A non-2xx response from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Builds the error from a raw response body.
    ///
    /// JSON bodies contribute their `message` (or `error`) field when it holds a non-empty,
    /// non-zero, non-false value; non-string values are rendered as text. JSON without
    /// either falls back to `HTTP error: {status}`, and anything unparseable to
    /// [`UNKNOWN_ERROR`].
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<Value>(body) {
            Ok(v) => body_message(&v).unwrap_or_else(|| format!("HTTP error: {status}")),
            Err(_) => UNKNOWN_ERROR.to_string(),
        };
        Self { status, message }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error (status={}): {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

fn body_message(v: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| v.get(key))
        .find_map(field_text)
}

fn field_text(v: &Value) -> Option<String> {
    match v {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Human-readable message for a failed store action.
pub fn error_message(err: &anyhow::Error) -> String {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return api.message.clone();
    }
    let rendered = format!("{err:#}");
    if rendered.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        rendered
    }
}

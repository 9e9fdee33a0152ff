use reqwest::StatusCode;
use serde_json::Value;

/// Failure of a single gateway call. `Display` renders only the message, which is what
/// operators see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("{message}")]
    Transport { message: String },
    /// The backend answered outside the 2xx range.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// A 2xx body did not match the expected record shape.
    #[error("{message}")]
    Schema { status: u16, message: String },
}

impl GatewayError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        GatewayError::Transport {
            message: err.to_string(),
        }
    }

    /// Build the error for a non-2xx response, preferring the backend's `detail` field.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|payload| detail_message(&payload))
            .unwrap_or_else(|| status_line(status));

        GatewayError::Status {
            status: status.as_u16(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GatewayError::Transport { message }
            | GatewayError::Status { message, .. }
            | GatewayError::Schema { message, .. } => message,
        }
    }

    /// HTTP status reported by the backend, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Transport { .. } => None,
            GatewayError::Status { status, .. } | GatewayError::Schema { status, .. } => {
                Some(*status)
            }
        }
    }
}

fn detail_message(payload: &Value) -> Option<String> {
    match payload.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::String(_) | Value::Null | Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {}: {}", status.as_u16(), reason),
        None => format!("HTTP {}:", status.as_u16()),
    }
}

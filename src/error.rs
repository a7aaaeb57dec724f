// Error types shared across the client core
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback shown when an error payload carries no recognizable message field
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Transport-level failure: the request left the client but did not produce
/// a successful response. Cloneable so cached snapshots can carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TransportError {
    /// Connection-level failure before any HTTP status was received
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status; body is kept for message extraction
    #[error("request rejected with status {status}")]
    Http { status: u16, body: Value },

    /// The request descriptor could not be turned into a dispatchable request
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network(message.into())
    }

    pub fn http(status: u16, body: Value) -> Self {
        TransportError::Http { status, body }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        TransportError::InvalidRequest(message.into())
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Client-safe display message, extracted from the response body when present
    pub fn display_message(&self) -> String {
        match self {
            TransportError::Http { body, .. } => error_message(body),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Errors surfaced by the resource client itself (registration and lookup),
/// as opposed to failures of the underlying transport
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),

    #[error("operation '{name}' is a {actual}, expected a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Extract a display message from a heterogeneous error payload.
///
/// Precedence is fixed and must not be reordered, since payloads can satisfy
/// several shapes at once: nested `data.message`, then top-level `error`,
/// then top-level `message` (string), then the first element of a `message`
/// array, then the generic fallback.
pub fn error_message(payload: &Value) -> String {
    if let Some(message) = payload.pointer("/data/message").and_then(Value::as_str) {
        return message.to_string();
    }
    if let Some(message) = payload.get("error").and_then(Value::as_str) {
        return message.to_string();
    }
    match payload.get("message") {
        Some(Value::String(message)) => return message.clone(),
        Some(Value::Array(items)) => {
            if let Some(first) = items.first().and_then(Value::as_str) {
                return first.to_string();
            }
        }
        _ => {}
    }
    FALLBACK_ERROR_MESSAGE.to_string()
}

/// Attribute an error message to one of the given form fields.
///
/// Returns the first field whose name occurs in the message, or "root" when
/// the message names none of them (form-level error).
pub fn error_field(message: &str, fields: &[&str]) -> String {
    fields
        .iter()
        .copied()
        .find(|field| message.contains(*field))
        .unwrap_or("root")
        .to_string()
}

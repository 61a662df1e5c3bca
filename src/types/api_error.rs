use serde_json::Value;
use std::fmt;

/// The `error` object of a datastore response that reported `success: false`.
///
/// CKAN does not use one fixed shape here (`message`, `__type`, `info` and
/// per-field lists all occur), so the whole payload is kept next to the two
/// fields that are usually present.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: Option<String>,
    /// CKAN's `__type`, e.g. "Validation Error".
    pub kind: Option<String>,
    pub payload: Value,
}

impl ApiError {
    pub fn from_payload(payload: Value) -> Self {
        let field = |name: &str| {
            payload
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            message: field("message"),
            kind: field("__type"),
            payload,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.message) {
            (Some(kind), Some(message)) => write!(f, "{kind}: {message}"),
            (None, Some(message)) => write!(f, "{message}"),
            (Some(kind), None) => write!(f, "{kind}: {}", self.payload),
            (None, None) => write!(f, "{}", self.payload),
        }
    }
}

use crate::types::api_error::ApiError;

/// Result of a query whose transport and decoding worked.
///
/// `Failed` carries the error object of a `success: false` response. It is
/// not a Rust error: callers are expected to render it (the dashboard shows a
/// placeholder chart) instead of handing partial data downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Ready(T),
    Failed(ApiError),
}

impl<T> QueryOutcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            QueryOutcome::Ready(value) => Some(value),
            QueryOutcome::Failed(_) => None,
        }
    }

    /// Applies a fallible step to a ready value; a `Failed` outcome never
    /// reaches `f`.
    pub fn and_then_try<U, E>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> Result<QueryOutcome<U>, E> {
        match self {
            QueryOutcome::Ready(value) => f(value).map(QueryOutcome::Ready),
            QueryOutcome::Failed(err) => Ok(QueryOutcome::Failed(err)),
        }
    }
}

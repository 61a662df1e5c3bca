use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatastoreError {
    #[error("Network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed datastore response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    // The response claimed success but lacks the nested payload
    #[error("Datastore response is missing '{missing}'")]
    Schema { missing: String },
}

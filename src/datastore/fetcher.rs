use crate::datastore::error::DatastoreError;
use crate::query::sql::DatastoreQuery;
use crate::types::api_error::ApiError;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;

/// Public CKAN endpoint of the Zurich open data portal.
pub const DEFAULT_ENDPOINT: &str =
    "https://data.stadt-zuerich.ch/api/3/action/datastore_search_sql";

/// Classified body of a decoded datastore response.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// `success: true`; the whole parsed envelope, ready for extraction.
    Success(Value),
    /// `success: false`; the envelope's `error` object.
    Failure(ApiError),
}

/// Issues `GET <endpoint>?sql=<query>` and classifies the JSON envelope.
///
/// Requests are not retried. A failed transport surfaces as
/// [`DatastoreError::Network`].
#[derive(Debug, Clone)]
pub struct DatastoreFetcher {
    endpoint: String,
    http: Client,
}

impl DatastoreFetcher {
    pub fn new(endpoint: impl Into<String>, http: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch(&self, query: &DatastoreQuery) -> Result<FetchOutcome, DatastoreError> {
        let url = format!("{} [{}]", self.endpoint, query);
        info!("Querying datastore: {}", url);
        debug!("SQL for {}:\n{}", query.kind, query.sql);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("sql", query.sql.as_str())])
            .send()
            .await
            .map_err(|e| DatastoreError::Network(url.clone(), e))?;

        // CKAN answers invalid SQL with 409 and a regular `success: false`
        // envelope, so the status is only consulted when the body is unusable.
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DatastoreError::Network(url.clone(), e))?;

        match classify_response(&url, &body) {
            Err(DatastoreError::MalformedResponse { .. }) if !status.is_success() => {
                warn!("HTTP error for {}: {}", url, status);
                Err(DatastoreError::HttpStatus { url, status })
            }
            Ok(FetchOutcome::Failure(err)) => {
                warn!("Datastore rejected {}: {}", url, err);
                Ok(FetchOutcome::Failure(err))
            }
            other => other,
        }
    }
}

/// Parses a response body and decides between success and failure by its
/// `success` field.
pub fn classify_response(url: &str, body: &[u8]) -> Result<FetchOutcome, DatastoreError> {
    let malformed = |reason: String| DatastoreError::MalformedResponse {
        url: url.to_string(),
        reason,
    };

    let envelope: Value = serde_json::from_slice(body)
        .map_err(|e| malformed(format!("body is not valid JSON ({e})")))?;

    let success = envelope
        .get("success")
        .ok_or_else(|| malformed("missing 'success' field".to_string()))?
        .as_bool()
        .ok_or_else(|| malformed("'success' is not a boolean".to_string()))?;

    if success {
        Ok(FetchOutcome::Success(envelope))
    } else {
        let payload = envelope.get("error").cloned().unwrap_or(Value::Null);
        Ok(FetchOutcome::Failure(ApiError::from_payload(payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::sql::date_bounds;
    use crate::test_support::MockDatastore;
    use crate::types::partition::Partition;
    use serde_json::json;

    fn query() -> DatastoreQuery {
        date_bounds(&Partition::new(2023, "4492d891-a366-49b9-b0f2-fabaa8015d47"))
    }

    #[test]
    fn test_classify_success() {
        let body = br#"{"success": true, "result": {"records": []}}"#;
        match classify_response("u", body).unwrap() {
            FetchOutcome::Success(envelope) => {
                assert_eq!(envelope["result"]["records"], json!([]));
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_failure_returns_error_payload() {
        let body = br#"{"success": false, "error": {"message": "no such table"}}"#;
        match classify_response("u", body).unwrap() {
            FetchOutcome::Failure(err) => {
                assert_eq!(err.message.as_deref(), Some("no such table"));
                assert_eq!(err.payload, json!({"message": "no such table"}));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_malformed_bodies() {
        for body in [
            &b"<html>Bad Gateway</html>"[..],
            &br#"{"result": {"records": []}}"#[..],
            &br#"{"success": "yes"}"#[..],
        ] {
            assert!(matches!(
                classify_response("u", body),
                Err(DatastoreError::MalformedResponse { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_sql_parameter() -> Result<(), DatastoreError> {
        let server = MockDatastore::start(|request| {
            assert!(request.contains("sql="));
            assert!(request.contains("datum_min"));
            (200, r#"{"success": true, "result": {"records": [{"datum_min": "2023-01-01", "datum_max": "2023-06-30"}]}}"#.to_string())
        })
        .await;

        let fetcher = DatastoreFetcher::new(server.endpoint(), Client::new());
        let outcome = fetcher.fetch(&query()).await?;
        assert!(matches!(outcome, FetchOutcome::Success(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_conflict_status_is_api_failure() -> Result<(), DatastoreError> {
        let server = MockDatastore::start(|_| {
            (
                409,
                r#"{"success": false, "error": {"__type": "Validation Error", "message": "no such table"}}"#
                    .to_string(),
            )
        })
        .await;

        let fetcher = DatastoreFetcher::new(server.endpoint(), Client::new());
        let outcome = fetcher.fetch(&query()).await?;
        assert!(matches!(outcome, FetchOutcome::Failure(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_non_json_error_page_is_http_status() {
        let server = MockDatastore::start(|_| (502, "Bad Gateway".to_string())).await;

        let fetcher = DatastoreFetcher::new(server.endpoint(), Client::new());
        let result = fetcher.fetch(&query()).await;
        match result {
            Err(DatastoreError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 502),
            other => panic!("expected HttpStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_json_success_is_malformed() {
        let server = MockDatastore::start(|_| (200, "not json".to_string())).await;

        let fetcher = DatastoreFetcher::new(server.endpoint(), Client::new());
        assert!(matches!(
            fetcher.fetch(&query()).await,
            Err(DatastoreError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_network_error() {
        let endpoint = MockDatastore::unreachable_endpoint().await;
        let fetcher = DatastoreFetcher::new(endpoint, Client::new());
        assert!(matches!(
            fetcher.fetch(&query()).await,
            Err(DatastoreError::Network(..))
        ));
    }
}

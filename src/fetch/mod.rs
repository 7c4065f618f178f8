//! Retrieval of raw snapshots from the OpenSky API.
//!
//! The API has been seen returning a bare `{"time", "states"}` object, the
//! same object wrapped in a one-element list, or just the list of rows.
//! [`normalize_snapshot`] folds all three into the wrapped form the parser
//! expects.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::parser::STATES_KEY;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        warn!(%status, url, "Snapshot request failed");
        anyhow::bail!("GET {url} returned status {status}");
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Fetches one snapshot and returns it in wrapped form.
#[tracing::instrument(skip(client))]
pub async fn fetch_snapshot<C: HttpClient>(client: &C, url: &str) -> Result<Value> {
    let bytes = fetch_bytes(client, url).await?;
    debug!(bytes = bytes.len(), "Snapshot bytes received");

    let value: Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("response from {url} is not JSON"))?;
    Ok(normalize_snapshot(value))
}

/// Wraps a snapshot into `[{"states": [...], ...}]`.
///
/// Values in any other shape are passed through untouched and rejected
/// later by the parser.
pub fn normalize_snapshot(value: Value) -> Value {
    let bare_rows = value
        .as_array()
        .and_then(|items| items.first())
        .is_some_and(Value::is_array);

    if value.is_object() {
        Value::Array(vec![value])
    } else if bare_rows {
        let mut batch = Map::new();
        batch.insert(STATES_KEY.to_string(), value);
        Value::Array(vec![Value::Object(batch)])
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build_table;
    use async_trait::async_trait;
    use reqwest::{Request, Response};
    use serde_json::json;

    /// Answers every request with the same status and body.
    struct CannedClient {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClient for CannedClient {
        async fn execute(&self, _req: Request) -> reqwest::Result<Response> {
            let resp = http::Response::builder()
                .status(self.status)
                .body(self.body)
                .unwrap();
            Ok(Response::from(resp))
        }
    }

    const URL: &str = "https://opensky-network.org/api/states/all";

    fn row() -> Value {
        json!(["4b1816", "EDW403Y", "Switzerland", 1, 2, 14.8345, 45.7171, 11582.4, false, 225.2, 314.17])
    }

    #[test]
    fn test_normalize_bare_object() {
        let value = normalize_snapshot(json!({ "time": 1, "states": [row()] }));
        assert_eq!(value, json!([{ "time": 1, "states": [row()] }]));
    }

    #[test]
    fn test_normalize_wrapped_object_unchanged() {
        let wrapped = json!([{ "time": 1, "states": [row()] }]);
        assert_eq!(normalize_snapshot(wrapped.clone()), wrapped);
    }

    #[test]
    fn test_normalize_bare_rows() {
        let value = normalize_snapshot(json!([row(), row()]));
        assert_eq!(build_table(&value).unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_passes_through_other_shapes() {
        assert_eq!(normalize_snapshot(json!([])), json!([]));
        assert_eq!(normalize_snapshot(json!("x")), json!("x"));
    }

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let client = CannedClient { status: 200, body: "payload" };
        assert_eq!(fetch_bytes(&client, URL).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_fetch_snapshot_wraps_bare_object() {
        let client = CannedClient {
            status: 200,
            body: r#"{"time": 1742988621, "states": [["4b1816", "EDW403Y", "Switzerland", 1, 2, 14.8345, 45.7171, 11582.4, false, 225.2, 314.17]]}"#,
        };

        let value = fetch_snapshot(&client, URL).await.unwrap();

        assert_eq!(value[0]["time"], json!(1742988621));
        assert_eq!(build_table(&value).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let client = CannedClient { status: 500, body: "internal error" };

        let err = fetch_bytes(&client, URL).await.unwrap_err();
        assert!(err.to_string().contains("500"));
        assert!(fetch_snapshot(&client, URL).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_snapshot_rejects_non_json() {
        let client = CannedClient { status: 200, body: "<html>rate limited</html>" };

        let err = fetch_snapshot(&client, URL).await.unwrap_err();
        assert!(err.to_string().contains("is not JSON"));
    }
}

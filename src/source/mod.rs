//! Where alerts come from: a JSON file on disk or a Keep-compatible API.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{API_KEY_HEADER, HTTP_TIMEOUT_SECS};
use crate::models::Alert;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode alerts: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// A delete/restore run that stopped at a failed request.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct PersistError {
    /// Alerts the server accepted before the failure.
    pub persisted: Vec<String>,
    /// The failed alert and every alert after it.
    pub failed: Vec<String>,
    pub source: SourceError,
}

/// The source call an event answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOp {
    Fetch,
    SetDeleted {
        persisted: Vec<String>,
        failed: Vec<String>,
        deleted: bool,
    },
}

/// Events sent from source tasks back to the main loop.
#[derive(Debug)]
pub enum SourceEvent {
    /// A fetch finished; this is the full alert list.
    Loaded(Vec<Alert>),
    /// Delete/restore was accepted for these alert ids.
    Persisted { ids: Vec<String>, deleted: bool },
    /// `op` failed with `message`.
    Error { op: SourceOp, message: String },
}

/// Body of `DELETE /alerts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    fingerprint: &'a str,
    last_received: String,
    restore: bool,
}

/// HTTP client for the Keep alert API.
#[derive(Debug, Clone)]
pub struct KeepClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl KeepClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn alerts_url(&self) -> String {
        format!("{}/alerts", self.base_url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header(API_KEY_HEADER, key),
            None => req,
        }
    }

    async fn fetch(&self) -> Result<Vec<Alert>, SourceError> {
        let resp = self
            .authorize(self.client.get(self.alerts_url()))
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let body = resp.bytes().await?;
        debug!(bytes = body.len(), url = %self.base_url, "alerts fetched");
        decode_alerts(&body)
    }

    async fn set_deleted(&self, alert: &Alert, deleted: bool) -> Result<(), SourceError> {
        let body = DeleteRequest {
            fingerprint: &alert.fingerprint,
            last_received: alert.last_received.to_rfc3339(),
            restore: !deleted,
        };
        let resp = self
            .authorize(self.client.delete(self.alerts_url()))
            .json(&body)
            .send()
            .await?;
        check_status(resp).await?;
        debug!(fingerprint = %alert.fingerprint, deleted, "alert state persisted");
        Ok(())
    }
}

/// Decode a JSON array of alerts. Entries that do not form an alert are
/// logged and skipped; only a body that is not an array fails.
fn decode_alerts(body: &[u8]) -> Result<Vec<Alert>, SourceError> {
    let entries: Vec<Value> = serde_json::from_slice(body)?;
    let total = entries.len();
    let alerts: Vec<Alert> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(alert) => Some(alert),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed alert");
                None
            }
        })
        .collect();
    if alerts.len() < total {
        warn!(skipped = total - alerts.len(), total, "some alerts could not be decoded");
    }
    Ok(alerts)
}

fn ids_of(alerts: &[Alert]) -> Vec<String> {
    alerts.iter().map(|a| a.id.clone()).collect()
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SourceError::Status { status, body })
}

/// An alert provider.
#[derive(Debug, Clone)]
pub enum AlertSource {
    /// JSON array of alerts on disk. Delete/restore stay in memory.
    File(PathBuf),
    /// Keep-compatible HTTP API.
    Keep(KeepClient),
}

impl AlertSource {
    /// Whether delete/restore survives the next fetch.
    pub fn persists_deletes(&self) -> bool {
        matches!(self, AlertSource::Keep(_))
    }

    /// Short label for the status bar and logs.
    pub fn describe(&self) -> String {
        match self {
            AlertSource::File(path) => path.display().to_string(),
            AlertSource::Keep(client) => client.base_url.clone(),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Alert>, SourceError> {
        match self {
            AlertSource::File(path) => {
                let content =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|source| SourceError::Io {
                            path: path.clone(),
                            source,
                        })?;
                decode_alerts(content.as_bytes())
            }
            AlertSource::Keep(client) => client.fetch().await,
        }
    }

    /// Persist a delete (or restore) of every alert in `alerts`, in order.
    /// Stops at the first failure and reports which alerts got through.
    pub async fn set_deleted(&self, alerts: &[Alert], deleted: bool) -> Result<(), PersistError> {
        let AlertSource::Keep(client) = self else {
            return Ok(());
        };
        for (index, alert) in alerts.iter().enumerate() {
            if let Err(source) = client.set_deleted(alert, deleted).await {
                return Err(PersistError {
                    persisted: ids_of(&alerts[..index]),
                    failed: ids_of(&alerts[index..]),
                    source,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[tokio::test]
    async fn file_source_loads_alerts() {
        let f = write_temp(
            r#"[
                {"id": "a1", "name": "cpu", "lastReceived": "2024-03-01T10:00:00Z", "team": "infra"},
                {"id": "a2", "name": "disk", "lastReceived": "2024-03-01T11:00:00Z", "deleted": true}
            ]"#,
        );
        let source = AlertSource::File(f.path().to_path_buf());
        let alerts = source.fetch().await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].extra_display("team"), "infra");
        assert!(alerts[1].deleted);
    }

    #[tokio::test]
    async fn file_source_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = AlertSource::File(dir.path().join("missing.json"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[tokio::test]
    async fn file_source_bad_json_is_decode_error() {
        let f = write_temp("{not json");
        let source = AlertSource::File(f.path().to_path_buf());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[tokio::test]
    async fn file_source_set_deleted_is_noop() {
        let source = AlertSource::File(PathBuf::from("/nonexistent.json"));
        assert!(source.set_deleted(&[], true).await.is_ok());
        assert!(!source.persists_deletes());
    }

    #[tokio::test]
    async fn file_source_skips_malformed_alerts() {
        let f = write_temp(
            r#"[
                {"id": "a1", "status": "Open-Ticket", "lastReceived": "2024-03-01T10:00:00Z"},
                {"id": "a2", "severity": "error", "lastReceived": "2024-03-01T10:00:00Z"},
                {"id": "a3", "lastReceived": "2024-03-01T10:00:00Z"},
                {"id": "a4"},
                {"id": "a5", "severity": 3, "lastReceived": "2024-03-01T10:00:00Z"}
            ]"#,
        );
        let alerts = AlertSource::File(f.path().to_path_buf())
            .fetch()
            .await
            .unwrap();
        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    // ── Keep API against a local stub ─────────────────────────────

    type Requests = Arc<Mutex<Vec<String>>>;

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf).to_lowercase();
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..end]
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= end + 4 + length
    }

    /// Answer one connection per canned `(status, body)`, recording each
    /// raw request. Returns the base URL.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Requests) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests: Requests = Arc::default();
        let seen = requests.clone();
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                while !request_complete(&buf) {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                seen.lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&buf).into_owned());
                let response = format!(
                    "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });
        (url, requests)
    }

    fn make_alert(id: &str) -> Alert {
        Alert::new(id, id, chrono::DateTime::from_timestamp(1_709_287_200, 0).unwrap())
    }

    #[tokio::test]
    async fn keep_fetch_sends_api_key() {
        let (url, requests) = serve(vec![(
            200,
            r#"[{"id": "a1", "name": "cpu", "lastReceived": "2024-03-01T10:00:00Z"}]"#,
        )])
        .await;
        let source = AlertSource::Keep(KeepClient::new(&url, Some("secret".into())).unwrap());

        let alerts = source.fetch().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].name, "cpu");

        let requests = requests.lock().unwrap();
        assert!(requests[0].starts_with("GET /alerts HTTP/1.1"));
        assert!(requests[0].to_lowercase().contains("x-api-key: secret"));
    }

    #[tokio::test]
    async fn keep_fetch_without_key_sends_no_header() {
        let (url, requests) = serve(vec![(200, "[]")]).await;
        let source = AlertSource::Keep(KeepClient::new(&url, None).unwrap());
        assert!(source.fetch().await.unwrap().is_empty());
        assert!(!requests.lock().unwrap()[0].to_lowercase().contains("x-api-key"));
    }

    #[tokio::test]
    async fn keep_error_status_keeps_code_and_body() {
        let (url, _) = serve(vec![(503, "maintenance")]).await;
        let source = AlertSource::Keep(KeepClient::new(&url, None).unwrap());
        match source.fetch().await.unwrap_err() {
            SourceError::Status { status, body } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn keep_body_that_is_not_a_list_is_decode_error() {
        let (url, _) = serve(vec![(200, r#"{"items": []}"#)]).await;
        let source = AlertSource::Keep(KeepClient::new(&url, None).unwrap());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[tokio::test]
    async fn keep_set_deleted_sends_one_delete_per_alert() {
        let (url, requests) = serve(vec![(200, "{}"), (200, "{}")]).await;
        let source = AlertSource::Keep(KeepClient::new(&url, Some("k".into())).unwrap());

        source
            .set_deleted(&[make_alert("a"), make_alert("b")], false)
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("DELETE /alerts HTTP/1.1"));
        assert!(requests[0].contains(r#""fingerprint":"a""#));
        assert!(requests[0].contains(r#""restore":true"#));
        assert!(requests[1].contains(r#""fingerprint":"b""#));
    }

    #[tokio::test]
    async fn keep_set_deleted_reports_where_it_stopped() {
        let (url, requests) = serve(vec![(200, "{}"), (500, "boom")]).await;
        let source = AlertSource::Keep(KeepClient::new(&url, None).unwrap());

        let err = source
            .set_deleted(&[make_alert("a"), make_alert("b"), make_alert("c")], true)
            .await
            .unwrap_err();

        assert_eq!(err.persisted, vec!["a".to_string()]);
        assert_eq!(err.failed, vec!["b".to_string(), "c".to_string()]);
        assert!(matches!(err.source, SourceError::Status { .. }));
        // Nothing is sent after the failure
        assert_eq!(requests.lock().unwrap().len(), 2);
    }

    #[test]
    fn keep_client_trims_trailing_slash() {
        let client = KeepClient::new("http://localhost:8080/", None).unwrap();
        assert_eq!(client.alerts_url(), "http://localhost:8080/alerts");
        let source = AlertSource::Keep(client);
        assert_eq!(source.describe(), "http://localhost:8080");
        assert!(source.persists_deletes());
    }

    #[test]
    fn delete_request_serializes_camel_case() {
        let body = DeleteRequest {
            fingerprint: "fp",
            last_received: "2024-03-01T10:00:00+00:00".into(),
            restore: false,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["fingerprint"], "fp");
        assert_eq!(v["lastReceived"], "2024-03-01T10:00:00+00:00");
        assert_eq!(v["restore"], false);
    }
}

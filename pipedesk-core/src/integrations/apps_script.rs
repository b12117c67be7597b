use crate::jobs::sync_manager::SyncError;
use async_trait::async_trait;
use serde::Serialize;
use shared_types::{CrmDataset, RecordKind};
use spreadsheets::{to_csv, SheetError};
use std::time::Duration;

/// Remote end of cloud sync: receives every collection at once.
#[async_trait]
pub trait SyncTarget: Send + Sync {
    async fn push(&self, target: &str, dataset: &CrmDataset) -> Result<(), SyncError>;
}

/// Body posted to the sheet web app: one CSV document per collection.
#[derive(Debug, Serialize)]
pub struct SyncPayload {
    pub csv_contacts: String,
    pub csv_leads: String,
    pub csv_tasks: String,
    pub csv_companies: String,
}

impl SyncPayload {
    pub fn from_dataset(dataset: &CrmDataset) -> Result<Self, SheetError> {
        Ok(Self {
            csv_contacts: to_csv(RecordKind::Contact, dataset)?,
            csv_leads: to_csv(RecordKind::Lead, dataset)?,
            csv_tasks: to_csv(RecordKind::Task, dataset)?,
            csv_companies: to_csv(RecordKind::Company, dataset)?,
        })
    }
}

/// Posts the dataset to a Google Apps Script web app bound to a spreadsheet.
pub struct AppsScriptTarget {
    client: reqwest::Client,
}

impl AppsScriptTarget {
    pub fn new(timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Remote(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SyncTarget for AppsScriptTarget {
    async fn push(&self, target: &str, dataset: &CrmDataset) -> Result<(), SyncError> {
        let payload = SyncPayload::from_dataset(dataset)?;

        tracing::info!(
            "Pushing {} contacts, {} leads, {} tasks, {} companies to {}",
            dataset.contacts.len(),
            dataset.leads.len(),
            dataset.tasks.len(),
            dataset.companies.len(),
            target
        );

        let response = self
            .client
            .post(target)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SyncError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Remote(format!("HTTP {}: {}", status, body.trim())));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Contact;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one HTTP request with `status`, returning the request body.
    async fn serve_once(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/exec", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let body = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= split + 4 + length {
                        break text[split + 4..].to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
                status
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            body
        });

        (url, handle)
    }

    fn dataset() -> CrmDataset {
        CrmDataset {
            contacts: vec![Contact {
                id: "c1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_payload_has_header_row_per_collection() {
        let payload = SyncPayload::from_dataset(&dataset()).unwrap();
        assert_eq!(payload.csv_contacts.lines().count(), 2);
        assert!(payload.csv_leads.starts_with("id,name,email"));
        assert_eq!(payload.csv_tasks.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_push_posts_json_payload() {
        let (url, server) = serve_once("200 OK").await;
        let target = AppsScriptTarget::new(Duration::from_secs(5)).unwrap();

        target.push(&url, &dataset()).await.unwrap();

        let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert!(body["csv_contacts"].as_str().unwrap().contains("Lovelace"));
        assert!(body["csv_companies"].is_string());
    }

    #[tokio::test]
    async fn test_non_success_status_is_remote_error() {
        let (url, _server) = serve_once("500 Internal Server Error").await;
        let target = AppsScriptTarget::new(Duration::from_secs(5)).unwrap();

        let result = target.push(&url, &dataset()).await;
        assert!(matches!(result, Err(SyncError::Remote(message)) if message.contains("500")));
    }
}

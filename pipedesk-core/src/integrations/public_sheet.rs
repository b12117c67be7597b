use async_trait::async_trait;
use futures::future::try_join_all;
use spreadsheets::{
    csv_export_url, extract_spreadsheet_id, import_csv, RowMapper, SheetError, SheetImportReport,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SheetFetchError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("Failed to fetch {url}: {message}")]
    Request { url: String, message: String },

    #[error("Fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Where CSV text for a sheet tab comes from.
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn fetch_csv(&self, url: &str) -> Result<String, SheetFetchError>;
}

pub struct HttpCsvSource {
    client: reqwest::Client,
}

impl HttpCsvSource {
    pub fn new(timeout: Duration) -> Result<Self, SheetFetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SheetFetchError::Request {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CsvSource for HttpCsvSource {
    async fn fetch_csv(&self, url: &str) -> Result<String, SheetFetchError> {
        let request_error = |e: reqwest::Error| SheetFetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SheetFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(request_error)
    }
}

/// Imports the tabs of a Google Sheet shared as "anyone with the link can view".
pub struct PublicSheetClient {
    source: Arc<dyn CsvSource>,
    tab_gids: Vec<String>,
}

impl PublicSheetClient {
    pub fn new(source: Arc<dyn CsvSource>, tab_gids: Vec<String>) -> Self {
        Self { source, tab_gids }
    }

    /// Fetch every configured tab, then classify and map each one. Any failed fetch aborts
    /// the whole import; a tab whose headers are not recognized becomes an error outcome in
    /// the report.
    pub async fn import(
        &self,
        sheet_url: &str,
        mapper: &RowMapper,
    ) -> Result<SheetImportReport, SheetFetchError> {
        let spreadsheet_id = extract_spreadsheet_id(sheet_url)?;
        tracing::info!(
            "Importing {} tabs from spreadsheet {}",
            self.tab_gids.len(),
            spreadsheet_id
        );

        let fetches = self.tab_gids.iter().map(|gid| {
            let url = csv_export_url(&spreadsheet_id, gid);
            async move {
                let text = self.source.fetch_csv(&url).await?;
                Ok::<_, SheetFetchError>((gid, text))
            }
        });
        let tabs = try_join_all(fetches).await?;

        let mut report = SheetImportReport::default();
        for (gid, text) in tabs {
            report.push(format!("gid {}", gid), import_csv(text.as_bytes(), mapper));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    const SHEET: &str = "https://docs.google.com/spreadsheets/d/sheet-123/edit#gid=0";

    #[derive(Default)]
    struct CannedSource {
        tabs: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl CannedSource {
        fn with_tab(mut self, gid: &str, csv: &str) -> Self {
            self.tabs
                .insert(csv_export_url("sheet-123", gid), csv.to_string());
            self
        }
    }

    #[async_trait]
    impl CsvSource for CannedSource {
        async fn fetch_csv(&self, url: &str) -> Result<String, SheetFetchError> {
            self.requested.lock().push(url.to_string());
            self.tabs
                .get(url)
                .cloned()
                .ok_or_else(|| SheetFetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn mapper() -> RowMapper {
        RowMapper::new("2026-10-19T12:00:00.000Z")
    }

    #[tokio::test]
    async fn test_each_tab_is_classified() {
        let source = Arc::new(
            CannedSource::default()
                .with_tab("0", "firstName,lastName\nAda,Lovelace\n")
                .with_tab("1", "name,industry\nAcme,Manufacturing\n")
                .with_tab("2", "colour\nblue\n"),
        );
        let client = PublicSheetClient::new(
            source.clone(),
            vec!["0".to_string(), "1".to_string(), "2".to_string()],
        );

        let report = client.import(SHEET, &mapper()).await.unwrap();
        assert_eq!(source.requested.lock().len(), 3);
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].0, "gid 2");

        let dataset = report.into_dataset();
        assert_eq!(dataset.contacts.len(), 1);
        assert_eq!(dataset.companies[0].industry, "Manufacturing");
    }

    #[tokio::test]
    async fn test_failed_fetch_aborts_import() {
        let source = Arc::new(CannedSource::default().with_tab("0", "title\nCall\n"));
        let client = PublicSheetClient::new(source, vec!["0".to_string(), "9".to_string()]);

        let result = client.import(SHEET, &mapper()).await;
        assert!(matches!(result, Err(SheetFetchError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_bad_link_is_rejected_before_fetching() {
        let source = Arc::new(CannedSource::default());
        let client = PublicSheetClient::new(source.clone(), vec!["0".to_string()]);

        let result = client.import("https://example.test/not-a-sheet", &mapper()).await;
        assert!(matches!(result, Err(SheetFetchError::Sheet(SheetError::InvalidUrl(_)))));
        assert!(source.requested.lock().is_empty());
    }
}

use crate::csv_parser::CsvParser;
use crate::error::{SchemaError, SheetError};
use crate::mapper::{MappedSheet, RowMapper};
use crate::schema::SheetSchema;
use crate::sheet::ParsedSheet;
use shared_types::{CrmDataset, RecordKind};

/// Result of reading one sheet or CSV file.
#[derive(Debug)]
pub struct SheetOutcome {
    /// Sheet name, file name or tab id the rows came from.
    pub source: String,
    pub result: Result<MappedSheet, SheetError>,
}

/// Per-sheet results of a spreadsheet import.
#[derive(Debug, Default)]
pub struct SheetImportReport {
    pub outcomes: Vec<SheetOutcome>,
}

impl SheetImportReport {
    pub fn push(&mut self, source: impl Into<String>, result: Result<MappedSheet, SheetError>) {
        let source = source.into();
        match &result {
            Ok(sheet) => tracing::info!(
                "Read {} {} from sheet '{}'",
                sheet.len(),
                sheet.kind().collection_name(),
                source
            ),
            Err(e) => tracing::warn!("Skipping sheet '{}': {}", source, e),
        }
        self.outcomes.push(SheetOutcome { source, result });
    }

    /// Number of records read from sheets that were identified.
    pub fn record_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(MappedSheet::len)
            .sum()
    }

    pub fn errors(&self) -> Vec<(&str, &SheetError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.source.as_str(), e)))
            .collect()
    }

    /// Merge every successful sheet into one dataset. Two sheets of the same kind append.
    pub fn into_dataset(self) -> CrmDataset {
        self.into_parts().0
    }

    /// The merged dataset plus the failed sheets.
    pub fn into_parts(self) -> (CrmDataset, Vec<(String, SheetError)>) {
        let mut dataset = CrmDataset::default();
        let mut failures = Vec::new();
        for outcome in self.outcomes {
            match outcome.result {
                Ok(sheet) => dataset.extend(sheet.into_dataset()),
                Err(e) => failures.push((outcome.source, e)),
            }
        }
        (dataset, failures)
    }
}

/// Identify and map an already parsed sheet. With a `kind_hint` (for example from the sheet
/// name) the header row is not classified.
pub fn map_parsed_sheet(
    parsed: &ParsedSheet,
    kind_hint: Option<RecordKind>,
    mapper: &RowMapper,
) -> Result<MappedSheet, SheetError> {
    if parsed.has_no_headers() {
        return Err(SchemaError::Empty.into());
    }
    let kind = match kind_hint {
        Some(kind) => kind,
        None => SheetSchema::classify(&parsed.headers)?,
    };
    Ok(mapper.map(kind, &parsed.rows))
}

/// Parse one CSV file and map it by its header row.
pub fn import_csv(content: &[u8], mapper: &RowMapper) -> Result<MappedSheet, SheetError> {
    let parsed = CsvParser::new().parse(content)?;
    map_parsed_sheet(&parsed, None, mapper)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2026-10-19T12:00:00.000Z";

    #[test]
    fn test_import_csv_detects_leads() {
        let csv = "Name,Email,Probability,Status\nRenewal,ops@acme.test,40,qualified\n";
        let sheet = import_csv(csv.as_bytes(), &RowMapper::new(NOW)).unwrap();

        let MappedSheet::Leads(leads) = sheet else {
            panic!("expected leads");
        };
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].probability, 40.0);
        assert_eq!(leads[0].created_at, NOW);
    }

    #[test]
    fn test_unrecognized_csv_is_an_error_not_empty_data() {
        let csv = "colour,size\nblue,XL\n";
        let result = import_csv(csv.as_bytes(), &RowMapper::new(NOW));
        assert!(matches!(
            result,
            Err(SheetError::Schema(SchemaError::Unrecognized { .. }))
        ));
    }

    #[test]
    fn test_kind_hint_skips_classification() {
        let parsed = CsvParser::new().parse(b"title\nCall back\n").unwrap();
        let mapped = map_parsed_sheet(&parsed, Some(RecordKind::Task), &RowMapper::new(NOW)).unwrap();
        assert_eq!(mapped.kind(), RecordKind::Task);

        let empty = ParsedSheet::default();
        let result = map_parsed_sheet(&empty, Some(RecordKind::Task), &RowMapper::new(NOW));
        assert!(matches!(result, Err(SheetError::Schema(SchemaError::Empty))));
    }

    #[test]
    fn test_report_merges_successes_and_keeps_failures() {
        let mapper = RowMapper::new(NOW);
        let mut report = SheetImportReport::default();
        report.push("a.csv", import_csv(b"firstName,lastName\nAda,Lovelace\n", &mapper));
        report.push("b.csv", import_csv(b"first name,last name\nAlan,Turing\n", &mapper));
        report.push("c.csv", import_csv(b"nothing\nhere\n", &mapper));

        assert_eq!(report.record_count(), 2);
        assert_eq!(report.errors().len(), 1);

        let (dataset, failures) = report.into_parts();
        assert_eq!(dataset.contacts.len(), 2);
        assert!(dataset.leads.is_empty());
        assert_eq!(failures[0].0, "c.csv");
    }
}

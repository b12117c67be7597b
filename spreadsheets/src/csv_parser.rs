use crate::error::SheetError;
use crate::sheet::ParsedSheet;
use csv::{ReaderBuilder, StringRecord};

/// Comma-separated input with a header row.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV text into normalized header maps. Quoted fields may contain commas, quotes
    /// and newlines. Rows that fail to parse are logged and skipped.
    pub fn parse(&self, content: &[u8]) -> Result<ParsedSheet, SheetError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(content);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (line, result) in reader.records().enumerate() {
            match result {
                Ok(record) => rows.push(record_fields(&record)),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row {}: {}", line + 2, e);
                }
            }
        }

        Ok(ParsedSheet::from_rows(&headers, rows))
    }
}

fn record_fields(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_fields_keep_commas_and_quotes() {
        let csv = "id,name,notes\n1,\"Acme, Inc.\",\"said \"\"hi\"\"\"\n";
        let sheet = CsvParser::new().parse(csv.as_bytes()).unwrap();

        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0]["name"], "Acme, Inc.");
        assert_eq!(sheet.rows[0]["notes"], "said \"hi\"");
    }

    #[test]
    fn test_short_rows_and_blank_lines() {
        let csv = "firstName,lastName,email\r\nAda,Lovelace\r\n\r\n,,\r\nGrace,Hopper,grace@navy.test\r\n";
        let sheet = CsvParser::new().parse(csv.as_bytes()).unwrap();

        assert_eq!(sheet.headers, vec!["firstname", "lastname", "email"]);
        assert_eq!(sheet.rows.len(), 2);
        assert!(sheet.rows[0].get("email").is_none());
        assert_eq!(sheet.rows[1]["email"], "grace@navy.test");
    }

    #[test]
    fn test_header_only_sheet_has_no_rows() {
        let sheet = CsvParser::new().parse(b"id,title\n").unwrap();
        assert!(sheet.rows.is_empty());
        assert!(!sheet.has_no_headers());
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        let sheet = CsvParser::new().parse(b"").unwrap();
        assert!(sheet.has_no_headers());
    }
}

use shared_types::RecordKind;

/// Errors raised while reading or writing spreadsheet data
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Invalid spreadsheet URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for SheetError {
    fn from(e: csv::Error) -> Self {
        SheetError::Csv(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SheetError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SheetError::Workbook(e.to_string())
    }
}

impl From<calamine::Error> for SheetError {
    fn from(e: calamine::Error) -> Self {
        SheetError::Workbook(e.to_string())
    }
}

/// A sheet's header row did not identify a single record kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("sheet has no header row")]
    Empty,

    #[error("headers match no known record schema: {}", headers.join(", "))]
    Unrecognized { headers: Vec<String> },

    #[error("headers match more than one record schema: {candidates:?}")]
    Ambiguous { candidates: Vec<RecordKind> },
}

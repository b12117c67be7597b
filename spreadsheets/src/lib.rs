//! Spreadsheets Crate
//!
//! Reading and writing CRM collections as spreadsheets: CSV files, XLSX workbooks and
//! public Google Sheets exported as CSV.
//!
//! # Architecture
//!
//! - **Types**: record types live in the `shared-types` crate
//! - **Parsing**: `CsvParser` and the XLSX reader produce a `ParsedSheet` of normalized
//!   header maps
//! - **Identification**: `SheetSchema::classify` picks the record kind from a header row
//! - **Mapping**: `RowMapper` turns rows into records, defaulting missing fields
//! - **Writing**: `sheet_rows` / `to_csv` and `write_workbook` emit the expected headers
//!
//! # Example
//!
//! ```rust,ignore
//! use spreadsheets::{import_csv, RowMapper};
//!
//! let mapper = RowMapper::new(now);
//! let sheet = import_csv(&bytes, &mapper)?;
//! let dataset = sheet.into_dataset();
//! ```

pub mod csv_parser;
pub mod error;
pub mod google_sheet;
pub mod import;
pub mod mapper;
pub mod schema;
pub mod sheet;
pub mod writer;
pub mod xlsx;

// Re-export commonly used types
pub use csv_parser::CsvParser;
pub use error::{SchemaError, SheetError};
pub use google_sheet::{
    csv_export_url, extract_spreadsheet_id, setup_instructions, DEFAULT_TAB_GIDS,
};
pub use import::{import_csv, map_parsed_sheet, SheetImportReport, SheetOutcome};
pub use mapper::{MappedSheet, RowMapper};
pub use schema::{normalize_header, SheetSchema};
pub use sheet::{ParsedSheet, SheetRow};
pub use writer::{sheet_rows, to_csv, CellValue, SheetRows};
pub use xlsx::{read_workbook, read_workbook_file, write_workbook, write_workbook_file};

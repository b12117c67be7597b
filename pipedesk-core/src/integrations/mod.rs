pub mod apps_script;
pub mod public_sheet;

pub use apps_script::{AppsScriptTarget, SyncPayload, SyncTarget};
pub use public_sheet::{CsvSource, HttpCsvSource, PublicSheetClient, SheetFetchError};

//! Helpers for reading a Google Sheet that has been shared publicly.
//!
//! A public sheet exposes each tab as CSV at a per-tab export URL. The default tab ids match
//! the four-tab template described by [`setup_instructions`].

use crate::error::SheetError;
use crate::schema::SheetSchema;
use regex::Regex;
use shared_types::RecordKind;

/// Tab gids of the Contacts, Leads, Tasks and Companies tabs in the template sheet.
pub const DEFAULT_TAB_GIDS: [&str; 4] = ["0", "1579801802", "1579801803", "1579801804"];

const SPREADSHEET_ID_PATTERN: &str = r"/spreadsheets/d/([a-zA-Z0-9_-]+)";

/// Pull the spreadsheet id out of a share or edit link.
pub fn extract_spreadsheet_id(url: &str) -> Result<String, SheetError> {
    let pattern =
        Regex::new(SPREADSHEET_ID_PATTERN).map_err(|e| SheetError::InvalidUrl(e.to_string()))?;
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SheetError::InvalidUrl(url.to_string()))
}

pub fn csv_export_url(spreadsheet_id: &str, gid: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
        spreadsheet_id, gid
    )
}

/// Step-by-step text for preparing a sheet that can be imported, listing the expected
/// header row of every tab.
pub fn setup_instructions() -> String {
    let mut text = String::from(
        "Create a Google Sheet with four tabs named Contacts, Leads, Tasks and Companies.\n\
         Put the header row below in row 1 of each tab, then share the sheet as\n\
         \"Anyone with the link can view\" and paste the link to import.\n",
    );
    for kind in RecordKind::ALL {
        let schema = SheetSchema::for_kind(kind);
        text.push('\n');
        text.push_str(kind.sheet_name());
        text.push_str(":\n  ");
        text.push_str(&schema.headers.join(", "));
        text.push('\n');
    }
    text
}

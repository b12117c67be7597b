use crate::schema::normalize_header;
use std::collections::HashMap;

/// One data row keyed by normalized header name.
pub type SheetRow = HashMap<String, String>;

/// A parsed sheet: normalized headers plus its non-blank rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl ParsedSheet {
    /// Build from a raw header row and raw value rows. Rows whose cells are all blank are
    /// dropped; cells past the last header are ignored.
    pub fn from_rows<I, R>(raw_headers: &[String], rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = String>,
    {
        let headers: Vec<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();

        let rows = rows
            .into_iter()
            .filter_map(|row| {
                let mut map = SheetRow::new();
                for (i, field) in row.into_iter().enumerate() {
                    if let Some(header) = headers.get(i) {
                        if !header.is_empty() {
                            map.insert(header.clone(), field);
                        }
                    }
                }
                if map.values().all(|v| v.trim().is_empty()) {
                    None
                } else {
                    Some(map)
                }
            })
            .collect();

        Self { headers, rows }
    }

    /// True when no header cell carries a name.
    pub fn has_no_headers(&self) -> bool {
        self.headers.iter().all(|h| h.is_empty())
    }
}

//! Expected sheet headers per record kind and the matcher that picks a kind from a header
//! row.
//!
//! Headers are compared in normalized form: lowercase ASCII letters and digits only, so
//! `First Name`, `first_name` and `firstName` are the same column.

use crate::error::SchemaError;
use shared_types::RecordKind;
use std::collections::HashSet;

pub const CONTACT_HEADERS: &[&str] = &[
    "id",
    "firstName",
    "lastName",
    "email",
    "phone",
    "company",
    "position",
    "status",
    "tags",
    "notes",
    "createdAt",
    "lastContact",
    "source",
    "value",
];

pub const LEAD_HEADERS: &[&str] = &[
    "id",
    "name",
    "email",
    "phone",
    "company",
    "status",
    "source",
    "value",
    "probability",
    "expectedCloseDate",
    "notes",
    "createdAt",
    "lastActivity",
    "assignedTo",
];

pub const TASK_HEADERS: &[&str] = &[
    "id",
    "title",
    "description",
    "type",
    "priority",
    "status",
    "dueDate",
    "createdAt",
    "completedAt",
    "relatedContactId",
    "relatedLeadId",
    "assignedTo",
];

pub const COMPANY_HEADERS: &[&str] = &[
    "id",
    "name",
    "industry",
    "size",
    "website",
    "phone",
    "email",
    "address",
    "city",
    "state",
    "zipCode",
    "country",
    "notes",
    "createdAt",
    "revenue",
    "employees",
    "status",
];

/// Column contract for one record kind.
#[derive(Debug, Clone, Copy)]
pub struct SheetSchema {
    pub kind: RecordKind,
    /// Every column, in export order.
    pub headers: &'static [&'static str],
    /// Columns that must be present for a sheet to be read as this kind (normalized).
    pub required: &'static [&'static str],
}

pub const SCHEMAS: [SheetSchema; 4] = [
    SheetSchema {
        kind: RecordKind::Contact,
        headers: CONTACT_HEADERS,
        required: &["firstname", "lastname"],
    },
    SheetSchema {
        kind: RecordKind::Lead,
        headers: LEAD_HEADERS,
        required: &["name", "probability"],
    },
    SheetSchema {
        kind: RecordKind::Task,
        headers: TASK_HEADERS,
        required: &["title"],
    },
    SheetSchema {
        kind: RecordKind::Company,
        headers: COMPANY_HEADERS,
        required: &["name", "industry"],
    },
];

impl SheetSchema {
    pub fn for_kind(kind: RecordKind) -> &'static SheetSchema {
        match kind {
            RecordKind::Contact => &SCHEMAS[0],
            RecordKind::Lead => &SCHEMAS[1],
            RecordKind::Task => &SCHEMAS[2],
            RecordKind::Company => &SCHEMAS[3],
        }
    }

    /// Number of this schema's columns present in `headers`, or `None` when a required
    /// column is missing.
    fn score(&self, headers: &HashSet<&str>) -> Option<usize> {
        if !self.required.iter().all(|r| headers.contains(r)) {
            return None;
        }
        Some(
            self.headers
                .iter()
                .filter(|h| headers.contains(normalize_header(h).as_str()))
                .count(),
        )
    }

    /// Pick the record kind a header row describes.
    ///
    /// Only schemas whose required columns are all present are candidates; the candidate
    /// matching the most columns wins and a tie is an error.
    pub fn classify(headers: &[String]) -> Result<RecordKind, SchemaError> {
        let present: HashSet<&str> = headers
            .iter()
            .map(String::as_str)
            .filter(|h| !h.is_empty())
            .collect();
        if present.is_empty() {
            return Err(SchemaError::Empty);
        }

        let scored: Vec<(RecordKind, usize)> = SCHEMAS
            .iter()
            .filter_map(|schema| schema.score(&present).map(|score| (schema.kind, score)))
            .collect();

        let best = match scored.iter().map(|(_, score)| *score).max() {
            Some(best) => best,
            None => {
                return Err(SchemaError::Unrecognized {
                    headers: headers.iter().filter(|h| !h.is_empty()).cloned().collect(),
                })
            }
        };

        let winners: Vec<RecordKind> = scored
            .into_iter()
            .filter(|(_, score)| *score == best)
            .map(|(kind, _)| kind)
            .collect();

        match winners.as_slice() {
            [kind] => Ok(*kind),
            _ => Err(SchemaError::Ambiguous {
                candidates: winners,
            }),
        }
    }
}

/// Lowercase and strip everything but ASCII letters and digits.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(headers: &[&str]) -> Vec<String> {
        headers.iter().map(|h| normalize_header(h)).collect()
    }

    #[test]
    fn test_normalize_header_variants() {
        assert_eq!(normalize_header("First Name"), "firstname");
        assert_eq!(normalize_header("first_name"), "firstname");
        assert_eq!(normalize_header(" firstName "), "firstname");
        assert_eq!(normalize_header("Zip-Code"), "zipcode");
    }

    #[test]
    fn test_full_header_lists_classify_as_their_kind() {
        for schema in SCHEMAS.iter() {
            let headers = normalized(schema.headers);
            assert_eq!(SheetSchema::classify(&headers), Ok(schema.kind));
        }
    }

    #[test]
    fn test_partial_contact_sheet() {
        let headers = normalized(&["First Name", "Last Name", "Company"]);
        assert_eq!(SheetSchema::classify(&headers), Ok(RecordKind::Contact));
    }

    #[test]
    fn test_unknown_headers_are_rejected() {
        let headers = normalized(&["name", "email"]);
        assert!(matches!(
            SheetSchema::classify(&headers),
            Err(SchemaError::Unrecognized { .. })
        ));
    }

    #[test]
    fn test_tie_is_ambiguous() {
        // Satisfies both the task and the contact requirements with equal overlap.
        let headers = normalized(&["title", "description", "firstName", "lastName"]);
        let result = SheetSchema::classify(&headers);
        assert!(matches!(result, Err(SchemaError::Ambiguous { .. })));
    }

    #[test]
    fn test_blank_headers_are_empty() {
        assert_eq!(
            SheetSchema::classify(&[String::new(), String::new()]),
            Err(SchemaError::Empty)
        );
    }
}

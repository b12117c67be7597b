use crate::{Company, Contact, Lead, Task};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use ts_rs::TS;

/// The four record kinds. Each kind owns one persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Contact,
    Lead,
    Task,
    Company,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Contact,
        RecordKind::Lead,
        RecordKind::Task,
        RecordKind::Company,
    ];

    /// Key under which the collection is persisted.
    pub fn storage_key(&self) -> &'static str {
        match self {
            RecordKind::Contact => "crm_contacts",
            RecordKind::Lead => "crm_leads",
            RecordKind::Task => "crm_tasks",
            RecordKind::Company => "crm_companies",
        }
    }

    /// Top-level key in export documents.
    pub fn collection_name(&self) -> &'static str {
        match self {
            RecordKind::Contact => "contacts",
            RecordKind::Lead => "leads",
            RecordKind::Task => "tasks",
            RecordKind::Company => "companies",
        }
    }

    /// Worksheet / tab name in spreadsheet exports.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            RecordKind::Contact => "Contacts",
            RecordKind::Lead => "Leads",
            RecordKind::Task => "Tasks",
            RecordKind::Company => "Companies",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Contact => "Contact",
            RecordKind::Lead => "Lead",
            RecordKind::Task => "Task",
            RecordKind::Company => "Company",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// Behaviour shared by every record type, used by the generic collection store.
pub trait CrmRecord: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn created_at(&self) -> &str;

    /// Human-readable title: full name for contacts, name for leads and companies, title for tasks.
    fn display_name(&self) -> String;

    /// Fields the list filter looks at.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    fn into_record(self) -> Record;

    /// Case-insensitive substring match over `search_fields`. A blank term matches everything.
    fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// A record of any kind. The kind travels with the value as an explicit `kind` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Contact(Contact),
    Lead(Lead),
    Task(Task),
    Company(Company),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Contact(_) => RecordKind::Contact,
            Record::Lead(_) => RecordKind::Lead,
            Record::Task(_) => RecordKind::Task,
            Record::Company(_) => RecordKind::Company,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Contact(r) => r.id(),
            Record::Lead(r) => r.id(),
            Record::Task(r) => r.id(),
            Record::Company(r) => r.id(),
        }
    }

    pub fn created_at(&self) -> &str {
        match self {
            Record::Contact(r) => r.created_at(),
            Record::Lead(r) => r.created_at(),
            Record::Task(r) => r.created_at(),
            Record::Company(r) => r.created_at(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Record::Contact(r) => r.display_name(),
            Record::Lead(r) => r.display_name(),
            Record::Task(r) => r.display_name(),
            Record::Company(r) => r.display_name(),
        }
    }
}

/// Generate a fresh record id.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Format a timestamp the way records store it: RFC 3339, UTC, millisecond precision.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp. Accepts RFC 3339 and bare `YYYY-MM-DD` dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

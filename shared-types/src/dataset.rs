use crate::record::{CrmRecord, Record, RecordKind};
use crate::{Company, Contact, Lead, Task};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// All four collections together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CrmDataset {
    pub contacts: Vec<Contact>,
    pub leads: Vec<Lead>,
    pub tasks: Vec<Task>,
    pub companies: Vec<Company>,
}

impl CrmDataset {
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
            && self.leads.is_empty()
            && self.tasks.is_empty()
            && self.companies.is_empty()
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Contact => self.contacts.len(),
            RecordKind::Lead => self.leads.len(),
            RecordKind::Task => self.tasks.len(),
            RecordKind::Company => self.companies.len(),
        }
    }

    pub fn extend(&mut self, other: CrmDataset) {
        self.contacts.extend(other.contacts);
        self.leads.extend(other.leads);
        self.tasks.extend(other.tasks);
        self.companies.extend(other.companies);
    }

    /// Every record wrapped in its tagged form, collection by collection.
    pub fn records(&self) -> Vec<Record> {
        let mut records = Vec::with_capacity(
            self.contacts.len() + self.leads.len() + self.tasks.len() + self.companies.len(),
        );
        records.extend(self.contacts.iter().cloned().map(CrmRecord::into_record));
        records.extend(self.leads.iter().cloned().map(CrmRecord::into_record));
        records.extend(self.tasks.iter().cloned().map(CrmRecord::into_record));
        records.extend(self.companies.iter().cloned().map(CrmRecord::into_record));
        records
    }
}

/// The JSON export file: every collection plus the moment of export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub contacts: Vec<Contact>,
    pub leads: Vec<Lead>,
    pub tasks: Vec<Task>,
    pub companies: Vec<Company>,
    pub export_date: String,
}

impl ExportDocument {
    pub fn new(dataset: CrmDataset, export_date: String) -> Self {
        Self {
            contacts: dataset.contacts,
            leads: dataset.leads,
            tasks: dataset.tasks,
            companies: dataset.companies,
            export_date,
        }
    }
}

/// An import file. Absent collections stay `None` and are left untouched; unknown
/// top-level keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocument {
    pub contacts: Option<Vec<Contact>>,
    pub leads: Option<Vec<Lead>>,
    pub tasks: Option<Vec<Task>>,
    pub companies: Option<Vec<Company>>,
    pub export_date: Option<String>,
}

/// How imported collections combine with what is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMode {
    /// Overwrite each imported collection.
    #[default]
    Replace,
    /// Keep existing records and append imported ones whose id is not present yet.
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CollectionImport {
    pub kind: RecordKind,
    pub added: usize,
    /// Records dropped because their id already existed (merge mode only).
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub collections: Vec<CollectionImport>,
}

impl ImportSummary {
    pub fn total_added(&self) -> usize {
        self.collections.iter().map(|c| c.added).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.collections.iter().map(|c| c.skipped).sum()
    }

    pub fn get(&self, kind: RecordKind) -> Option<&CollectionImport> {
        self.collections.iter().find(|c| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_document_skips_unknown_and_absent_keys() {
        let doc: ImportDocument = serde_json::from_str(
            r#"{"contacts": [], "somethingElse": 4, "exportDate": "2026-01-01T00:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(doc.contacts.map(|c| c.len()), Some(0));
        assert!(doc.leads.is_none());
        assert!(doc.tasks.is_none());
        assert!(doc.companies.is_none());
    }

    #[test]
    fn test_dataset_records_keep_their_kind() {
        let dataset = CrmDataset {
            leads: vec![Lead::default()],
            companies: vec![Company::default(), Company::default()],
            ..Default::default()
        };
        let kinds: Vec<RecordKind> = dataset.records().iter().map(Record::kind).collect();
        assert_eq!(
            kinds,
            vec![RecordKind::Lead, RecordKind::Company, RecordKind::Company]
        );
        assert_eq!(dataset.count(RecordKind::Company), 2);
        assert!(!dataset.is_empty());
    }
}

use super::{encode, CrmStore};
use crate::storage::StoreError;
use chrono::{DateTime, Utc};
use shared_types::{
    new_record_id, CollectionImport, CrmDataset, CrmRecord, ExportDocument, ImportDocument,
    ImportMode, ImportSummary, RecordKind,
};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Invalid import file: {0}")]
    InvalidFormat(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `crm-data-YYYY-MM-DD.<extension>`
pub fn export_file_name(date: DateTime<Utc>, extension: &str) -> String {
    format!("crm-data-{}.{}", date.format("%Y-%m-%d"), extension)
}

/// Collections decided by an import, ready to be written together.
#[derive(Default)]
struct PendingWrites {
    entries: Vec<(&'static str, String)>,
    collections: Vec<CollectionImport>,
}

impl PendingWrites {
    fn stage<T: CrmRecord>(
        &mut self,
        store: &CrmStore,
        incoming: Vec<T>,
        mode: ImportMode,
    ) -> Result<(), StoreError> {
        let (records, report) = match mode {
            ImportMode::Replace => {
                let added = incoming.len();
                (incoming, CollectionImport { kind: T::KIND, added, skipped: 0 })
            }
            ImportMode::Merge => merge(store.get::<T>()?, incoming),
        };
        let key = T::KIND.storage_key();
        self.entries.push((key, encode(key, &records)?));
        self.collections.push(report);
        Ok(())
    }
}

fn merge<T: CrmRecord>(mut existing: Vec<T>, incoming: Vec<T>) -> (Vec<T>, CollectionImport) {
    let mut ids: HashSet<String> = existing.iter().map(|r| r.id().to_string()).collect();
    let mut report = CollectionImport {
        kind: T::KIND,
        added: 0,
        skipped: 0,
    };
    for record in incoming {
        if ids.insert(record.id().to_string()) {
            existing.push(record);
            report.added += 1;
        } else {
            report.skipped += 1;
        }
    }
    (existing, report)
}

fn with_ids<T: CrmRecord>(mut records: Vec<T>) -> Vec<T> {
    for record in records.iter_mut() {
        if record.id().trim().is_empty() {
            record.set_id(new_record_id());
        }
    }
    records
}

impl CrmStore {
    pub fn export_document(&self) -> Result<ExportDocument, StoreError> {
        Ok(ExportDocument::new(self.dataset()?, self.now()))
    }

    /// Every collection as a pretty-printed JSON export file.
    pub fn export_json(&self) -> Result<String, TransferError> {
        let document = self.export_document()?;
        serde_json::to_string_pretty(&document).map_err(|source| {
            TransferError::Store(StoreError::Encode {
                key: "export".to_string(),
                source,
            })
        })
    }

    /// Import an export file. The whole document is parsed before anything is written, so a
    /// malformed file leaves every collection untouched. Collections absent from the file are
    /// left as they are.
    pub fn import_json(&self, text: &str, mode: ImportMode) -> Result<ImportSummary, TransferError> {
        let document: ImportDocument =
            serde_json::from_str(text).map_err(TransferError::InvalidFormat)?;

        let mut pending = PendingWrites::default();
        if let Some(contacts) = document.contacts {
            pending.stage(self, with_ids(contacts), mode)?;
        }
        if let Some(leads) = document.leads {
            pending.stage(self, with_ids(leads), mode)?;
        }
        if let Some(tasks) = document.tasks {
            pending.stage(self, with_ids(tasks), mode)?;
        }
        if let Some(companies) = document.companies {
            pending.stage(self, with_ids(companies), mode)?;
        }

        let summary = self.commit(pending, mode)?;
        tracing::info!(
            "Imported {} records from JSON ({} skipped)",
            summary.total_added(),
            summary.total_skipped()
        );
        Ok(summary)
    }

    /// Store records read from spreadsheets. Empty collections are skipped, so a workbook
    /// without a Tasks sheet never clears the stored tasks.
    pub fn apply_dataset(
        &self,
        dataset: CrmDataset,
        mode: ImportMode,
    ) -> Result<ImportSummary, StoreError> {
        let mut pending = PendingWrites::default();
        if !dataset.contacts.is_empty() {
            pending.stage(self, dataset.contacts, mode)?;
        }
        if !dataset.leads.is_empty() {
            pending.stage(self, dataset.leads, mode)?;
        }
        if !dataset.tasks.is_empty() {
            pending.stage(self, dataset.tasks, mode)?;
        }
        if !dataset.companies.is_empty() {
            pending.stage(self, dataset.companies, mode)?;
        }

        let summary = self.commit(pending, mode)?;
        tracing::info!(
            "Applied spreadsheet import: {} records added",
            summary.total_added()
        );
        Ok(summary)
    }

    /// Remove all four collections. The sync settings are kept.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        let keys = RecordKind::ALL.map(|kind| kind.storage_key());
        self.kv.remove_many(&keys)?;
        tracing::info!("Cleared all CRM data");
        Ok(())
    }

    fn commit(&self, pending: PendingWrites, mode: ImportMode) -> Result<ImportSummary, StoreError> {
        if !pending.entries.is_empty() {
            self.kv.set_many(&pending.entries)?;
        }
        Ok(ImportSummary {
            mode,
            collections: pending.collections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::clock::FixedClock;
    use crate::storage::{KeyValueStore, MemoryStore};
    use chrono::TimeZone;
    use shared_types::{Company, Contact, Lead, LeadStatus, Task, TaskPriority};
    use std::sync::Arc;

    fn store() -> CrmStore {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap());
        CrmStore::new(Arc::new(MemoryStore::new()), Arc::new(clock))
    }

    fn sample() -> CrmDataset {
        CrmDataset {
            contacts: vec![Contact {
                id: "c1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                tags: vec!["vip".to_string()],
                value: 1200.0,
                ..Default::default()
            }],
            leads: vec![Lead {
                id: "l1".to_string(),
                name: "Renewal".to_string(),
                status: LeadStatus::Negotiation,
                probability: 70.0,
                ..Default::default()
            }],
            tasks: vec![Task {
                id: "t1".to_string(),
                title: "Call".to_string(),
                priority: TaskPriority::Urgent,
                related_lead_id: Some("l1".to_string()),
                ..Default::default()
            }],
            companies: vec![Company {
                id: "co1".to_string(),
                name: "Acme".to_string(),
                employees: 40,
                ..Default::default()
            }],
        }
    }

    fn seed(store: &CrmStore, dataset: &CrmDataset) {
        store.save(&dataset.contacts).unwrap();
        store.save(&dataset.leads).unwrap();
        store.save(&dataset.tasks).unwrap();
        store.save(&dataset.companies).unwrap();
    }

    #[test]
    fn test_export_then_import_reproduces_collections() {
        let source = store();
        seed(&source, &sample());
        let json = source.export_json().unwrap();
        assert!(json.contains("\"exportDate\": \"2026-10-19T09:00:00.000Z\""));

        let target = store();
        let summary = target.import_json(&json, ImportMode::Replace).unwrap();

        assert_eq!(target.dataset().unwrap(), sample());
        assert_eq!(summary.total_added(), 4);
    }

    #[test]
    fn test_invalid_json_leaves_everything_unchanged() {
        let store = store();
        seed(&store, &sample());

        for text in ["{ not json", r#"{"contacts": [{"id": "x", "status": "unknown"}]}"#, "42"] {
            let result = store.import_json(text, ImportMode::Replace);
            assert!(matches!(result, Err(TransferError::InvalidFormat(_))), "{text}");
        }
        assert_eq!(store.dataset().unwrap(), sample());
    }

    #[test]
    fn test_absent_collections_are_untouched() {
        let store = store();
        seed(&store, &sample());

        let summary = store
            .import_json(r#"{"leads": [], "somethingElse": 1}"#, ImportMode::Replace)
            .unwrap();

        let dataset = store.dataset().unwrap();
        assert!(dataset.leads.is_empty());
        assert_eq!(dataset.contacts, sample().contacts);
        assert_eq!(summary.collections.len(), 1);
    }

    #[test]
    fn test_merge_skips_known_ids_and_fills_blank_ids() {
        let store = store();
        seed(&store, &sample());

        let summary = store
            .import_json(
                r#"{"companies": [{"id": "co1", "name": "Acme again"}, {"id": "", "name": "Globex"}]}"#,
                ImportMode::Merge,
            )
            .unwrap();

        let report = summary.get(RecordKind::Company).unwrap();
        assert_eq!((report.added, report.skipped), (1, 1));

        let companies = store.companies().unwrap();
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].name, "Acme");
        assert_eq!(companies[1].name, "Globex");
        assert!(!companies[1].id.is_empty());
    }

    #[test]
    fn test_apply_dataset_skips_empty_collections() {
        let store = store();
        seed(&store, &sample());

        let incoming = CrmDataset {
            contacts: vec![Contact {
                id: "c9".to_string(),
                first_name: "Grace".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        store.apply_dataset(incoming, ImportMode::Replace).unwrap();

        let dataset = store.dataset().unwrap();
        assert_eq!(dataset.contacts.len(), 1);
        assert_eq!(dataset.contacts[0].id, "c9");
        assert_eq!(dataset.tasks, sample().tasks);
    }

    #[test]
    fn test_clear_all_keeps_sync_settings() {
        let kv = Arc::new(MemoryStore::new());
        let store = CrmStore::new(kv.clone(), Arc::new(crate::helpers::clock::SystemClock));
        seed(&store, &sample());
        kv.set(crate::storage::SYNC_CONFIG_KEY, "{}").unwrap();

        store.clear_all().unwrap();

        assert!(store.dataset().unwrap().is_empty());
        assert_eq!(kv.len(), 1);
    }

    #[test]
    fn test_export_file_name() {
        let date = Utc.with_ymd_and_hms(2026, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(export_file_name(date, "json"), "crm-data-2026-03-07.json");
        assert_eq!(export_file_name(date, "xlsx"), "crm-data-2026-03-07.xlsx");
    }
}

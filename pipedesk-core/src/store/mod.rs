//! The CRM record store.
//!
//! Each record kind is persisted as one JSON array under its own key. Every mutation is a
//! read-modify-write of the whole collection; concurrent writers race and the last write
//! wins.

pub mod forms;
pub mod transfer;

pub use forms::FormError;
pub use transfer::{export_file_name, TransferError};

use crate::helpers::clock::{Clock, SystemClock};
use crate::storage::{KeyValueStore, MemoryStore, StoreError, SYNC_CONFIG_KEY};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{iso_timestamp, Company, Contact, CrmDataset, CrmRecord, Lead, SyncConfig, Task};
use std::sync::Arc;

#[derive(Clone)]
pub struct CrmStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl CrmStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    /// A store over a fresh [`MemoryStore`] and the system clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The current time in record timestamp format.
    pub fn now(&self) -> String {
        iso_timestamp(self.clock.now())
    }

    /// The whole collection of `T`; empty when nothing has been saved yet.
    pub fn get<T: CrmRecord>(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.read_json(T::KIND.storage_key())?.unwrap_or_default())
    }

    /// Overwrite the whole collection of `T`.
    pub fn save<T: CrmRecord>(&self, records: &[T]) -> Result<(), StoreError> {
        let key = T::KIND.storage_key();
        self.kv.set(key, &encode(key, records)?)?;
        tracing::debug!("Saved {} {}", records.len(), T::KIND);
        Ok(())
    }

    pub fn add<T: CrmRecord>(&self, record: T) -> Result<T, StoreError> {
        let mut records = self.get::<T>()?;
        records.push(record.clone());
        self.save(&records)?;
        Ok(record)
    }

    /// Replace the stored record with the same id. Returns `false`, without writing, when
    /// no record has that id.
    pub fn update<T: CrmRecord>(&self, record: T) -> Result<bool, StoreError> {
        let mut records = self.get::<T>()?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) else {
            tracing::debug!("No {} with id {} to update", T::KIND.label(), record.id());
            return Ok(false);
        };
        *slot = record;
        self.save(&records)?;
        Ok(true)
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub fn delete<T: CrmRecord>(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.get::<T>()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    pub fn find<T: CrmRecord>(&self, id: &str) -> Result<Option<T>, StoreError> {
        Ok(self.get::<T>()?.into_iter().find(|r| r.id() == id))
    }

    /// Records whose list-view fields contain `term`, ignoring case.
    pub fn search<T: CrmRecord>(&self, term: &str) -> Result<Vec<T>, StoreError> {
        let mut records = self.get::<T>()?;
        records.retain(|r| r.matches_search(term));
        Ok(records)
    }

    pub fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
        self.get()
    }

    pub fn leads(&self) -> Result<Vec<Lead>, StoreError> {
        self.get()
    }

    pub fn tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.get()
    }

    pub fn companies(&self) -> Result<Vec<Company>, StoreError> {
        self.get()
    }

    pub fn dataset(&self) -> Result<CrmDataset, StoreError> {
        Ok(CrmDataset {
            contacts: self.contacts()?,
            leads: self.leads()?,
            tasks: self.tasks()?,
            companies: self.companies()?,
        })
    }

    pub fn sync_config(&self) -> Result<Option<SyncConfig>, StoreError> {
        self.read_json(SYNC_CONFIG_KEY)
    }

    pub fn save_sync_config(&self, config: &SyncConfig) -> Result<(), StoreError> {
        self.kv.set(SYNC_CONFIG_KEY, &encode(SYNC_CONFIG_KEY, config)?)
    }

    fn read_json<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, StoreError> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }
}

fn encode<V: Serialize + ?Sized>(key: &str, value: &V) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}

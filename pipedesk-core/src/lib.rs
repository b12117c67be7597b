pub mod config;
pub mod dashboard;
pub mod helpers;
pub mod integrations;
pub mod jobs;
pub mod storage;
pub mod store;

pub use storage::{KeyValueStore, StoreError};
pub use store::CrmStore;

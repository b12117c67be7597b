#[macro_use]
mod macros;

pub mod company;
pub mod contact;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod lead;
pub mod record;
pub mod sync;
pub mod task;

pub use company::{
    CompaniesResponse, Company, CompanyStatus, CreateCompanyRequest, UpdateCompanyRequest,
};
pub use contact::{
    Contact, ContactStatus, ContactsResponse, CreateContactRequest, UpdateContactRequest,
};
pub use dashboard::DashboardSummary;
pub use dataset::{
    CollectionImport, CrmDataset, ExportDocument, ImportDocument, ImportMode, ImportSummary,
};
pub use error::{UnknownVariant, ValidationError};
pub use lead::{CreateLeadRequest, Lead, LeadStatus, LeadsResponse, UpdateLeadRequest};
pub use record::{iso_timestamp, new_record_id, parse_timestamp, CrmRecord, Record, RecordKind};
pub use sync::{SyncConfig, SyncState, SyncStatus, DEFAULT_SYNC_INTERVAL_MINUTES};
pub use task::{
    CreateTaskRequest, Task, TaskPriority, TaskStatus, TaskType, TasksResponse, UpdateTaskRequest,
};

use crate::record::Record;
use crate::{LeadStatus, TaskPriority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Read-only overview across all four collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_contacts: usize,
    pub active_contacts: usize,
    pub total_leads: usize,
    pub total_lead_value: f64,
    pub total_tasks: usize,
    pub active_tasks: usize,
    pub overdue_tasks: usize,
    pub total_companies: usize,
    pub customer_companies: usize,
    pub leads_by_status: BTreeMap<LeadStatus, usize>,
    /// Open tasks only.
    pub tasks_by_priority: BTreeMap<TaskPriority, usize>,
    /// Newest first.
    pub recent: Vec<Record>,
}

use crate::storage::StoreError;
use crate::store::CrmStore;
use chrono::{DateTime, Utc};
use shared_types::{
    parse_timestamp, CompanyStatus, ContactStatus, CrmDataset, DashboardSummary,
};
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Aggregate the dataset into dashboard figures as of `now`.
pub fn summarize(dataset: &CrmDataset, now: DateTime<Utc>, recent_limit: usize) -> DashboardSummary {
    let today = now.date_naive();

    let mut leads_by_status = BTreeMap::new();
    for lead in &dataset.leads {
        *leads_by_status.entry(lead.status).or_insert(0) += 1;
    }

    let active_tasks: Vec<_> = dataset.tasks.iter().filter(|t| t.status.is_active()).collect();
    let mut tasks_by_priority = BTreeMap::new();
    for task in &active_tasks {
        *tasks_by_priority.entry(task.priority).or_insert(0) += 1;
    }

    // Unparseable due dates are never overdue
    let overdue_tasks = active_tasks
        .iter()
        .filter_map(|t| parse_timestamp(&t.due_date))
        .filter(|due| due.date_naive() < today)
        .count();

    let mut recent = dataset.records();
    recent.sort_by_key(|r| Reverse(parse_timestamp(r.created_at())));
    recent.truncate(recent_limit);

    DashboardSummary {
        total_contacts: dataset.contacts.len(),
        active_contacts: dataset
            .contacts
            .iter()
            .filter(|c| c.status == ContactStatus::Active)
            .count(),
        total_leads: dataset.leads.len(),
        total_lead_value: dataset.leads.iter().map(|l| l.value).sum(),
        total_tasks: dataset.tasks.len(),
        active_tasks: active_tasks.len(),
        overdue_tasks,
        total_companies: dataset.companies.len(),
        customer_companies: dataset
            .companies
            .iter()
            .filter(|c| c.status == CompanyStatus::Customer)
            .count(),
        leads_by_status,
        tasks_by_priority,
        recent,
    }
}

impl CrmStore {
    pub fn dashboard(&self, recent_limit: usize) -> Result<DashboardSummary, StoreError> {
        Ok(summarize(&self.dataset()?, self.clock().now(), recent_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared_types::{Company, Contact, Lead, LeadStatus, Task, TaskPriority, TaskStatus};

    fn task(id: &str, due: &str, status: TaskStatus, priority: TaskPriority) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            due_date: due.to_string(),
            status,
            priority,
            ..Default::default()
        }
    }

    fn dataset() -> CrmDataset {
        CrmDataset {
            contacts: vec![
                Contact {
                    id: "c1".to_string(),
                    created_at: "2026-10-01T10:00:00.000Z".to_string(),
                    ..Default::default()
                },
                Contact {
                    id: "c2".to_string(),
                    status: ContactStatus::Inactive,
                    created_at: "not a date".to_string(),
                    ..Default::default()
                },
            ],
            leads: vec![
                Lead {
                    id: "l1".to_string(),
                    value: 1000.0,
                    status: LeadStatus::Won,
                    created_at: "2026-10-18T10:00:00.000Z".to_string(),
                    ..Default::default()
                },
                Lead {
                    id: "l2".to_string(),
                    value: 250.5,
                    created_at: "2026-10-05T10:00:00.000Z".to_string(),
                    ..Default::default()
                },
            ],
            tasks: vec![
                task("t-overdue", "2026-10-18", TaskStatus::Pending, TaskPriority::High),
                task("t-today", "2026-10-19", TaskStatus::InProgress, TaskPriority::High),
                task("t-done", "2026-01-01", TaskStatus::Completed, TaskPriority::Low),
                task("t-nodate", "", TaskStatus::Pending, TaskPriority::Urgent),
                task("t-garbage", "soon", TaskStatus::Pending, TaskPriority::Medium),
            ],
            companies: vec![Company {
                id: "co1".to_string(),
                status: CompanyStatus::Customer,
                created_at: "2026-10-19T07:00:00.000Z".to_string(),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_counts_and_totals() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let summary = summarize(&dataset(), now, 5);

        assert_eq!(summary.total_contacts, 2);
        assert_eq!(summary.active_contacts, 1);
        assert_eq!(summary.total_lead_value, 1250.5);
        assert_eq!(summary.total_tasks, 5);
        assert_eq!(summary.active_tasks, 4);
        assert_eq!(summary.overdue_tasks, 1);
        assert_eq!(summary.customer_companies, 1);
        assert_eq!(summary.leads_by_status[&LeadStatus::Won], 1);
        assert_eq!(summary.leads_by_status[&LeadStatus::New], 1);
        assert_eq!(summary.tasks_by_priority[&TaskPriority::High], 2);
        assert!(!summary.tasks_by_priority.contains_key(&TaskPriority::Low));
    }

    #[test]
    fn test_recent_is_newest_first_across_kinds() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let summary = summarize(&dataset(), now, 3);

        let ids: Vec<&str> = summary.recent.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["co1", "l1", "l2"]);
    }

    #[test]
    fn test_empty_dataset() {
        let summary = summarize(&CrmDataset::default(), Utc::now(), 5);
        assert_eq!(summary, DashboardSummary::default());
    }
}

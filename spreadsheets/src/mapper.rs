use crate::sheet::SheetRow;
use shared_types::lead::clamp_probability;
use shared_types::{new_record_id, Company, Contact, CrmDataset, Lead, RecordKind, Task};
use std::str::FromStr;

/// Records read from a single sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedSheet {
    Contacts(Vec<Contact>),
    Leads(Vec<Lead>),
    Tasks(Vec<Task>),
    Companies(Vec<Company>),
}

impl MappedSheet {
    pub fn kind(&self) -> RecordKind {
        match self {
            MappedSheet::Contacts(_) => RecordKind::Contact,
            MappedSheet::Leads(_) => RecordKind::Lead,
            MappedSheet::Tasks(_) => RecordKind::Task,
            MappedSheet::Companies(_) => RecordKind::Company,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MappedSheet::Contacts(v) => v.len(),
            MappedSheet::Leads(v) => v.len(),
            MappedSheet::Tasks(v) => v.len(),
            MappedSheet::Companies(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_dataset(self) -> CrmDataset {
        let mut dataset = CrmDataset::default();
        match self {
            MappedSheet::Contacts(v) => dataset.contacts = v,
            MappedSheet::Leads(v) => dataset.leads = v,
            MappedSheet::Tasks(v) => dataset.tasks = v,
            MappedSheet::Companies(v) => dataset.companies = v,
        }
        dataset
    }
}

/// Turns sheet rows into records. Missing or blank cells fall back to defaults: empty
/// strings, zero, the field's default enum value, a fresh id, and `now` for timestamps.
pub struct RowMapper {
    now: String,
}

impl RowMapper {
    pub fn new(now: impl Into<String>) -> Self {
        Self { now: now.into() }
    }

    pub fn map(&self, kind: RecordKind, rows: &[SheetRow]) -> MappedSheet {
        match kind {
            RecordKind::Contact => MappedSheet::Contacts(rows.iter().map(|r| self.contact(r)).collect()),
            RecordKind::Lead => MappedSheet::Leads(rows.iter().map(|r| self.lead(r)).collect()),
            RecordKind::Task => MappedSheet::Tasks(rows.iter().map(|r| self.task(r)).collect()),
            RecordKind::Company => {
                MappedSheet::Companies(rows.iter().map(|r| self.company(r)).collect())
            }
        }
    }

    pub fn contact(&self, row: &SheetRow) -> Contact {
        Contact {
            id: id_or_new(row),
            first_name: text(row, "firstname"),
            last_name: text(row, "lastname"),
            email: text(row, "email"),
            phone: text(row, "phone"),
            company: text(row, "company"),
            position: text(row, "position"),
            status: enum_or_default(row, "status"),
            tags: text(row, "tags")
                .split(';')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            notes: text(row, "notes"),
            created_at: self.timestamp_or_now(row, "createdat"),
            last_contact: self.timestamp_or_now(row, "lastcontact"),
            source: text(row, "source"),
            value: number(row, "value"),
        }
    }

    pub fn lead(&self, row: &SheetRow) -> Lead {
        Lead {
            id: id_or_new(row),
            name: text(row, "name"),
            email: text(row, "email"),
            phone: text(row, "phone"),
            company: text(row, "company"),
            status: enum_or_default(row, "status"),
            source: text(row, "source"),
            value: number(row, "value"),
            probability: clamp_probability(number(row, "probability")),
            expected_close_date: text(row, "expectedclosedate"),
            notes: text(row, "notes"),
            created_at: self.timestamp_or_now(row, "createdat"),
            last_activity: self.timestamp_or_now(row, "lastactivity"),
            assigned_to: text(row, "assignedto"),
        }
    }

    pub fn task(&self, row: &SheetRow) -> Task {
        Task {
            id: id_or_new(row),
            title: text(row, "title"),
            description: text(row, "description"),
            task_type: enum_or_default(row, "type"),
            priority: enum_or_default(row, "priority"),
            status: enum_or_default(row, "status"),
            due_date: text(row, "duedate"),
            created_at: self.timestamp_or_now(row, "createdat"),
            completed_at: optional_text(row, "completedat"),
            related_contact_id: optional_text(row, "relatedcontactid"),
            related_lead_id: optional_text(row, "relatedleadid"),
            assigned_to: text(row, "assignedto"),
        }
    }

    pub fn company(&self, row: &SheetRow) -> Company {
        Company {
            id: id_or_new(row),
            name: text(row, "name"),
            industry: text(row, "industry"),
            size: text(row, "size"),
            website: text(row, "website"),
            phone: text(row, "phone"),
            email: text(row, "email"),
            address: text(row, "address"),
            city: text(row, "city"),
            state: text(row, "state"),
            zip_code: text(row, "zipcode"),
            country: text(row, "country"),
            notes: text(row, "notes"),
            created_at: self.timestamp_or_now(row, "createdat"),
            revenue: number(row, "revenue"),
            employees: whole_number(row, "employees"),
            status: enum_or_default(row, "status"),
        }
    }

    fn timestamp_or_now(&self, row: &SheetRow, key: &str) -> String {
        optional_text(row, key).unwrap_or_else(|| self.now.clone())
    }
}

fn text(row: &SheetRow, key: &str) -> String {
    row.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn optional_text(row: &SheetRow, key: &str) -> Option<String> {
    Some(text(row, key)).filter(|v| !v.is_empty())
}

fn id_or_new(row: &SheetRow) -> String {
    optional_text(row, "id").unwrap_or_else(new_record_id)
}

fn number(row: &SheetRow, key: &str) -> f64 {
    text(row, key)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

fn whole_number(row: &SheetRow, key: &str) -> u32 {
    // Float-to-int `as` casts saturate, so negatives land on 0.
    number(row, key).round() as u32
}

fn enum_or_default<T>(row: &SheetRow, key: &str) -> T
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    let raw = text(row, key);
    if raw.is_empty() {
        return T::default();
    }
    match raw.parse::<T>() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{}; using the default", e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ContactStatus, LeadStatus, TaskPriority, TaskStatus, TaskType};

    const NOW: &str = "2026-10-19T12:00:00.000Z";

    fn row(pairs: &[(&str, &str)]) -> SheetRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_contact_missing_fields_are_defaulted() {
        let contact = RowMapper::new(NOW).contact(&row(&[("firstname", "Ada")]));

        assert_eq!(contact.first_name, "Ada");
        assert_eq!(contact.last_name, "");
        assert_eq!(contact.status, ContactStatus::Active);
        assert_eq!(contact.value, 0.0);
        assert!(contact.tags.is_empty());
        assert_eq!(contact.created_at, NOW);
        assert_eq!(contact.last_contact, NOW);
        assert!(!contact.id.is_empty());
    }

    #[test]
    fn test_contact_tags_and_existing_id() {
        let contact = RowMapper::new(NOW).contact(&row(&[
            ("id", "c-42"),
            ("tags", "vip; churn-risk;;"),
            ("value", "1250.5"),
            ("status", "Inactive"),
        ]));

        assert_eq!(contact.id, "c-42");
        assert_eq!(contact.tags, vec!["vip", "churn-risk"]);
        assert_eq!(contact.value, 1250.5);
        assert_eq!(contact.status, ContactStatus::Inactive);
    }

    #[test]
    fn test_lead_bad_numbers_and_unknown_status() {
        let lead = RowMapper::new(NOW).lead(&row(&[
            ("name", "Renewal"),
            ("value", "lots"),
            ("probability", "180"),
            ("status", "on-hold"),
        ]));

        assert_eq!(lead.value, 0.0);
        assert_eq!(lead.probability, 100.0);
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[test]
    fn test_task_optional_relations() {
        let task = RowMapper::new(NOW).task(&row(&[
            ("title", "Prep demo"),
            ("type", "demo"),
            ("priority", "URGENT"),
            ("status", "in progress"),
            ("relatedleadid", "l-1"),
            ("relatedcontactid", " "),
        ]));

        assert_eq!(task.task_type, TaskType::Demo);
        assert_eq!(task.priority, TaskPriority::Urgent);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.related_lead_id.as_deref(), Some("l-1"));
        assert!(task.related_contact_id.is_none());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_company_employee_count_rounds_and_saturates() {
        let mapper = RowMapper::new(NOW);
        assert_eq!(mapper.company(&row(&[("employees", "41.6")])).employees, 42);
        assert_eq!(mapper.company(&row(&[("employees", "-5")])).employees, 0);
    }

    #[test]
    fn test_rows_without_ids_get_distinct_ids() {
        let mapped = RowMapper::new(NOW).map(
            RecordKind::Company,
            &[row(&[("name", "A")]), row(&[("name", "B")])],
        );
        let MappedSheet::Companies(companies) = mapped else {
            panic!("expected companies");
        };
        assert_ne!(companies[0].id, companies[1].id);
    }
}

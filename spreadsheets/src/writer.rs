use crate::error::SheetError;
use crate::schema::SheetSchema;
use shared_types::{Company, Contact, CrmDataset, Lead, RecordKind, Task};

/// A single cell on its way out to a sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

pub type SheetRows = Vec<Vec<CellValue>>;

/// Header row followed by one row per record of `kind`, in the schema's column order.
pub fn sheet_rows(kind: RecordKind, dataset: &CrmDataset) -> SheetRows {
    let header: Vec<CellValue> = SheetSchema::for_kind(kind)
        .headers
        .iter()
        .map(|h| CellValue::from(*h))
        .collect();

    let mut rows = vec![header];
    match kind {
        RecordKind::Contact => rows.extend(dataset.contacts.iter().map(contact_row)),
        RecordKind::Lead => rows.extend(dataset.leads.iter().map(lead_row)),
        RecordKind::Task => rows.extend(dataset.tasks.iter().map(task_row)),
        RecordKind::Company => rows.extend(dataset.companies.iter().map(company_row)),
    }
    rows
}

/// The collection of `kind` as CSV text, header included.
pub fn to_csv(kind: RecordKind, dataset: &CrmDataset) -> Result<String, SheetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in sheet_rows(kind, dataset) {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SheetError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SheetError::Csv(e.to_string()))
}

fn contact_row(contact: &Contact) -> Vec<CellValue> {
    vec![
        contact.id.as_str().into(),
        contact.first_name.as_str().into(),
        contact.last_name.as_str().into(),
        contact.email.as_str().into(),
        contact.phone.as_str().into(),
        contact.company.as_str().into(),
        contact.position.as_str().into(),
        contact.status.as_str().into(),
        CellValue::Text(contact.tags.join(";")),
        contact.notes.as_str().into(),
        contact.created_at.as_str().into(),
        contact.last_contact.as_str().into(),
        contact.source.as_str().into(),
        contact.value.into(),
    ]
}

fn lead_row(lead: &Lead) -> Vec<CellValue> {
    vec![
        lead.id.as_str().into(),
        lead.name.as_str().into(),
        lead.email.as_str().into(),
        lead.phone.as_str().into(),
        lead.company.as_str().into(),
        lead.status.as_str().into(),
        lead.source.as_str().into(),
        lead.value.into(),
        lead.probability.into(),
        lead.expected_close_date.as_str().into(),
        lead.notes.as_str().into(),
        lead.created_at.as_str().into(),
        lead.last_activity.as_str().into(),
        lead.assigned_to.as_str().into(),
    ]
}

fn task_row(task: &Task) -> Vec<CellValue> {
    vec![
        task.id.as_str().into(),
        task.title.as_str().into(),
        task.description.as_str().into(),
        task.task_type.as_str().into(),
        task.priority.as_str().into(),
        task.status.as_str().into(),
        task.due_date.as_str().into(),
        task.created_at.as_str().into(),
        task.completed_at.as_deref().unwrap_or_default().into(),
        task.related_contact_id.as_deref().unwrap_or_default().into(),
        task.related_lead_id.as_deref().unwrap_or_default().into(),
        task.assigned_to.as_str().into(),
    ]
}

fn company_row(company: &Company) -> Vec<CellValue> {
    vec![
        company.id.as_str().into(),
        company.name.as_str().into(),
        company.industry.as_str().into(),
        company.size.as_str().into(),
        company.website.as_str().into(),
        company.phone.as_str().into(),
        company.email.as_str().into(),
        company.address.as_str().into(),
        company.city.as_str().into(),
        company.state.as_str().into(),
        company.zip_code.as_str().into(),
        company.country.as_str().into(),
        company.notes.as_str().into(),
        company.created_at.as_str().into(),
        company.revenue.into(),
        f64::from(company.employees).into(),
        company.status.as_str().into(),
    ]
}

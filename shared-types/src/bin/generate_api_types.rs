use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the front end
    let mut types = Vec::new();

    // Record kinds
    types.push(clean_type(RecordKind::export_to_string()?));
    types.push(clean_type(Record::export_to_string()?));

    // Contact types
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(ContactStatus::export_to_string()?));
    types.push(clean_type(CreateContactRequest::export_to_string()?));
    types.push(clean_type(UpdateContactRequest::export_to_string()?));
    types.push(clean_type(ContactsResponse::export_to_string()?));

    // Lead types
    types.push(clean_type(Lead::export_to_string()?));
    types.push(clean_type(LeadStatus::export_to_string()?));
    types.push(clean_type(CreateLeadRequest::export_to_string()?));
    types.push(clean_type(UpdateLeadRequest::export_to_string()?));
    types.push(clean_type(LeadsResponse::export_to_string()?));

    // Task types
    types.push(clean_type(Task::export_to_string()?));
    types.push(clean_type(TaskType::export_to_string()?));
    types.push(clean_type(TaskStatus::export_to_string()?));
    types.push(clean_type(TaskPriority::export_to_string()?));
    types.push(clean_type(CreateTaskRequest::export_to_string()?));
    types.push(clean_type(UpdateTaskRequest::export_to_string()?));
    types.push(clean_type(TasksResponse::export_to_string()?));

    // Company types
    types.push(clean_type(Company::export_to_string()?));
    types.push(clean_type(CompanyStatus::export_to_string()?));
    types.push(clean_type(CreateCompanyRequest::export_to_string()?));
    types.push(clean_type(UpdateCompanyRequest::export_to_string()?));
    types.push(clean_type(CompaniesResponse::export_to_string()?));

    // Import / export
    types.push(clean_type(CrmDataset::export_to_string()?));
    types.push(clean_type(ExportDocument::export_to_string()?));
    types.push(clean_type(ImportMode::export_to_string()?));
    types.push(clean_type(CollectionImport::export_to_string()?));
    types.push(clean_type(ImportSummary::export_to_string()?));

    // Sync and dashboard
    types.push(clean_type(SyncConfig::export_to_string()?));
    types.push(clean_type(SyncState::export_to_string()?));
    types.push(clean_type(SyncStatus::export_to_string()?));
    types.push(clean_type(DashboardSummary::export_to_string()?));

    let output_dir = Path::new("../gui/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Everything lands in one file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}

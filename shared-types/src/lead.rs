use crate::error::{require, ValidationError};
use crate::record::{CrmRecord, Record, RecordKind};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use ts_rs::TS;

/// Pipeline stage of a lead, in pipeline order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

string_enum!(LeadStatus, "lead status", {
    New => "new",
    Contacted => "contacted",
    Qualified => "qualified",
    Proposal => "proposal",
    Negotiation => "negotiation",
    Won => "won",
    Lost => "lost",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: LeadStatus,
    pub source: String,
    pub value: f64,
    /// Win probability in percent, 0 to 100.
    pub probability: f64,
    pub expected_close_date: String,
    pub notes: String,
    pub created_at: String,
    pub last_activity: String,
    pub assigned_to: String,
}

/// Clamp a probability into the 0-100 range. NaN becomes 0.
pub fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    probability.clamp(0.0, 100.0)
}

impl CrmRecord for Lead {
    const KIND: RecordKind = RecordKind::Lead;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.company.as_str()),
        ]
    }

    fn into_record(self) -> Record {
        Record::Lead(self)
    }
}

/// Lead form submission. Name and email are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLeadRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: Option<LeadStatus>,
    pub source: String,
    pub value: f64,
    pub probability: f64,
    pub expected_close_date: String,
    pub notes: String,
    pub assigned_to: String,
}

impl CreateLeadRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        Ok(())
    }

    pub fn into_lead(self, id: String, now: &str) -> Lead {
        Lead {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone,
            company: self.company,
            status: self.status.unwrap_or_default(),
            source: self.source,
            value: self.value,
            probability: clamp_probability(self.probability),
            expected_close_date: self.expected_close_date,
            notes: self.notes,
            created_at: now.to_string(),
            last_activity: now.to_string(),
            assigned_to: self.assigned_to,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateLeadRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub value: Option<f64>,
    pub probability: Option<f64>,
    pub expected_close_date: Option<String>,
    pub notes: Option<String>,
    pub assigned_to: Option<String>,
}

impl UpdateLeadRequest {
    pub fn apply_to(self, lead: &mut Lead, now: &str) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(email) = &self.email {
            require("email", email)?;
        }

        if let Some(name) = self.name {
            lead.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            lead.email = email.trim().to_string();
        }
        if let Some(phone) = self.phone {
            lead.phone = phone;
        }
        if let Some(company) = self.company {
            lead.company = company;
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(source) = self.source {
            lead.source = source;
        }
        if let Some(value) = self.value {
            lead.value = value;
        }
        if let Some(probability) = self.probability {
            lead.probability = clamp_probability(probability);
        }
        if let Some(expected_close_date) = self.expected_close_date {
            lead.expected_close_date = expected_close_date;
        }
        if let Some(notes) = self.notes {
            lead.notes = notes;
        }
        if let Some(assigned_to) = self.assigned_to {
            lead.assigned_to = assigned_to;
        }
        lead.last_activity = now.to_string();
        Ok(())
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
}

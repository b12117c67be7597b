use crate::error::{require, ValidationError};
use crate::record::{CrmRecord, Record, RecordKind};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ContactStatus {
    #[default]
    Active,
    Inactive,
    Lead,
}

string_enum!(ContactStatus, "contact status", {
    Active => "active",
    Inactive => "inactive",
    Lead => "lead",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub position: String,
    pub status: ContactStatus,
    pub tags: Vec<String>,
    pub notes: String,
    pub created_at: String,
    pub last_contact: String,
    pub source: String,
    pub value: f64,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl CrmRecord for Contact {
    const KIND: RecordKind = RecordKind::Contact;

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
        self.full_name()
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Owned(self.full_name()),
            Cow::Borrowed(self.email.as_str()),
            Cow::Borrowed(self.company.as_str()),
        ]
    }

    fn into_record(self) -> Record {
        Record::Contact(self)
    }
}

/// Contact form submission. First name, last name and email are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub position: String,
    pub status: Option<ContactStatus>,
    pub tags: Vec<String>,
    pub notes: String,
    pub source: String,
    pub value: f64,
}

impl CreateContactRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        require("email", &self.email)?;
        Ok(())
    }

    /// Build the stored contact. `now` becomes both `createdAt` and `lastContact`.
    pub fn into_contact(self, id: String, now: &str) -> Contact {
        Contact {
            id,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone,
            company: self.company,
            position: self.position,
            status: self.status.unwrap_or_default(),
            tags: clean_tags(self.tags),
            notes: self.notes,
            created_at: now.to_string(),
            last_contact: now.to_string(),
            source: self.source,
            value: self.value,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateContactRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<ContactStatus>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub value: Option<f64>,
}

impl UpdateContactRequest {
    /// Patch `contact` with every field present in the request. Required fields may not be
    /// blanked out.
    pub fn apply_to(self, contact: &mut Contact, now: &str) -> Result<(), ValidationError> {
        if let Some(first_name) = &self.first_name {
            require("firstName", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            require("lastName", last_name)?;
        }
        if let Some(email) = &self.email {
            require("email", email)?;
        }

        if let Some(first_name) = self.first_name {
            contact.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = self.last_name {
            contact.last_name = last_name.trim().to_string();
        }
        if let Some(email) = self.email {
            contact.email = email.trim().to_string();
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        if let Some(company) = self.company {
            contact.company = company;
        }
        if let Some(position) = self.position {
            contact.position = position;
        }
        if let Some(status) = self.status {
            contact.status = status;
        }
        if let Some(tags) = self.tags {
            contact.tags = clean_tags(tags);
        }
        if let Some(notes) = self.notes {
            contact.notes = notes;
        }
        if let Some(source) = self.source {
            contact.source = source;
        }
        if let Some(value) = self.value {
            contact.value = value;
        }
        contact.last_contact = now.to_string();
        Ok(())
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

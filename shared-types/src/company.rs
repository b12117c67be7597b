use crate::error::{require, ValidationError};
use crate::record::{CrmRecord, Record, RecordKind};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum CompanyStatus {
    #[default]
    Prospect,
    Customer,
    Partner,
    Inactive,
}

string_enum!(CompanyStatus, "company status", {
    Prospect => "prospect",
    Customer => "customer",
    Partner => "partner",
    Inactive => "inactive",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub industry: String,
    pub size: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub notes: String,
    pub created_at: String,
    pub revenue: f64,
    pub employees: u32,
    pub status: CompanyStatus,
}

impl CrmRecord for Company {
    const KIND: RecordKind = RecordKind::Company;

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
            Cow::Borrowed(self.industry.as_str()),
            Cow::Borrowed(self.email.as_str()),
        ]
    }

    fn into_record(self) -> Record {
        Record::Company(self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub industry: String,
    pub size: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub notes: String,
    pub revenue: f64,
    pub employees: u32,
    pub status: Option<CompanyStatus>,
}

impl CreateCompanyRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }

    pub fn into_company(self, id: String, now: &str) -> Company {
        Company {
            id,
            name: self.name.trim().to_string(),
            industry: self.industry,
            size: self.size,
            website: self.website,
            phone: self.phone,
            email: self.email,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
            notes: self.notes,
            created_at: now.to_string(),
            revenue: self.revenue,
            employees: self.employees,
            status: self.status.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub revenue: Option<f64>,
    pub employees: Option<u32>,
    pub status: Option<CompanyStatus>,
}

impl UpdateCompanyRequest {
    pub fn apply_to(self, company: &mut Company) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }

        if let Some(name) = self.name {
            company.name = name.trim().to_string();
        }
        if let Some(industry) = self.industry {
            company.industry = industry;
        }
        if let Some(size) = self.size {
            company.size = size;
        }
        if let Some(website) = self.website {
            company.website = website;
        }
        if let Some(phone) = self.phone {
            company.phone = phone;
        }
        if let Some(email) = self.email {
            company.email = email;
        }
        if let Some(address) = self.address {
            company.address = address;
        }
        if let Some(city) = self.city {
            company.city = city;
        }
        if let Some(state) = self.state {
            company.state = state;
        }
        if let Some(zip_code) = self.zip_code {
            company.zip_code = zip_code;
        }
        if let Some(country) = self.country {
            company.country = country;
        }
        if let Some(notes) = self.notes {
            company.notes = notes;
        }
        if let Some(revenue) = self.revenue {
            company.revenue = revenue;
        }
        if let Some(employees) = self.employees {
            company.employees = employees;
        }
        if let Some(status) = self.status {
            company.status = status;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CompaniesResponse {
    pub companies: Vec<Company>,
}

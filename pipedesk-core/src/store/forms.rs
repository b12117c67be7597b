use super::CrmStore;
use crate::storage::StoreError;
use shared_types::{
    new_record_id, Company, Contact, CreateCompanyRequest, CreateContactRequest,
    CreateLeadRequest, CreateTaskRequest, CrmRecord, Lead, Task, UpdateCompanyRequest,
    UpdateContactRequest, UpdateLeadRequest, UpdateTaskRequest, ValidationError,
};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CrmStore {
    pub fn create_contact(&self, request: CreateContactRequest) -> Result<Contact, FormError> {
        request.validate()?;
        let contact = request.into_contact(new_record_id(), &self.now());
        tracing::info!("Created contact {}", contact.id);
        Ok(self.add(contact)?)
    }

    /// Returns `None` when there is no contact with `id`.
    pub fn update_contact(
        &self,
        id: &str,
        request: UpdateContactRequest,
    ) -> Result<Option<Contact>, FormError> {
        let now = self.now();
        self.patch(id, |contact: &mut Contact| request.apply_to(contact, &now))
    }

    pub fn create_lead(&self, request: CreateLeadRequest) -> Result<Lead, FormError> {
        request.validate()?;
        let lead = request.into_lead(new_record_id(), &self.now());
        tracing::info!("Created lead {}", lead.id);
        Ok(self.add(lead)?)
    }

    pub fn update_lead(
        &self,
        id: &str,
        request: UpdateLeadRequest,
    ) -> Result<Option<Lead>, FormError> {
        let now = self.now();
        self.patch(id, |lead: &mut Lead| request.apply_to(lead, &now))
    }

    pub fn create_task(&self, request: CreateTaskRequest) -> Result<Task, FormError> {
        request.validate()?;
        let task = request.into_task(new_record_id(), &self.now());
        tracing::info!("Created task {}", task.id);
        Ok(self.add(task)?)
    }

    pub fn update_task(
        &self,
        id: &str,
        request: UpdateTaskRequest,
    ) -> Result<Option<Task>, FormError> {
        let now = self.now();
        self.patch(id, |task: &mut Task| request.apply_to(task, &now))
    }

    /// Mark a task completed.
    pub fn complete_task(&self, id: &str) -> Result<Option<Task>, FormError> {
        let now = self.now();
        self.patch(id, |task: &mut Task| {
            task.complete(&now);
            Ok(())
        })
    }

    pub fn create_company(&self, request: CreateCompanyRequest) -> Result<Company, FormError> {
        request.validate()?;
        let company = request.into_company(new_record_id(), &self.now());
        tracing::info!("Created company {}", company.id);
        Ok(self.add(company)?)
    }

    pub fn update_company(
        &self,
        id: &str,
        request: UpdateCompanyRequest,
    ) -> Result<Option<Company>, FormError> {
        self.patch(id, |company: &mut Company| request.apply_to(company))
    }

    /// Apply `edit` to the record with `id` and save the collection. Nothing is written when
    /// the id is unknown or the edit fails validation.
    fn patch<T, F>(&self, id: &str, edit: F) -> Result<Option<T>, FormError>
    where
        T: CrmRecord,
        F: FnOnce(&mut T) -> Result<(), ValidationError>,
    {
        let mut records = self.get::<T>()?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        edit(record)?;
        let updated = record.clone();
        self.save(&records)?;
        Ok(Some(updated))
    }
}

/// A required form field was left blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
}

/// A string did not name any variant of an enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value: {value:?}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

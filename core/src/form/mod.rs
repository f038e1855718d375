use itertools::Itertools;
use serde::Serialize;

pub mod storage;

/// A single problem with a submitted form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Dotted path of the offending field, like `general.display_name`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Everything that was wrong with a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid form values: {}", .0.iter().join(", "))]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_error_for(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

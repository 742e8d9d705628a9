use serde::{Deserialize, Serialize};

/// The value a field held when its check was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub field_value: String,
}

impl ValidationRequest {
    pub fn new(field_value: impl Into<String>) -> Self {
        Self {
            field_value: field_value.into(),
        }
    }
}

/// Body of the validation endpoint's success response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub exists: bool,
}

/// Validity of a bound field as the user currently sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Empty,
    Pending,
    Valid,
    Invalid,
}

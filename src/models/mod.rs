pub mod category;
pub mod validation;

use thiserror::Error;

pub use category::{CATEGORY_NAME_MAX_CHARS, CategoryName, CategoryOption, TransactionType};
pub use validation::{FieldState, ValidationRequest, ValidationResult};

#[derive(Debug, Error)]
pub enum ModelValidationError {
    #[error("category name must be at most {} characters", CATEGORY_NAME_MAX_CHARS)]
    CategoryNameTooLong,
    #[error("transaction type must be one of INC or EXP, got {0:?}")]
    UnknownTransactionType(String),
}

pub type ModelResult<T> = Result<T, ModelValidationError>;

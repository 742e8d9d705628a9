use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ModelResult, ModelValidationError};

/// Width of the server's category name column.
pub const CATEGORY_NAME_MAX_CHARS: usize = 150;

/// A category name ready to be checked against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryName(String);

impl CategoryName {
    /// Normalises raw input the way the server's form does before comparing.
    ///
    /// Returns `Ok(None)` when nothing but whitespace was typed.
    pub fn parse(raw: &str) -> ModelResult<Option<Self>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        ensure_valid_name(trimmed)?;
        Ok(Some(Self(trimmed.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn ensure_valid_name(value: &str) -> ModelResult<()> {
    let len = value.chars().count();
    if len > CATEGORY_NAME_MAX_CHARS {
        tracing::debug!(
            length = len,
            max = CATEGORY_NAME_MAX_CHARS,
            "Category name rejected: too long"
        );
        return Err(ModelValidationError::CategoryNameTooLong);
    }

    Ok(())
}

/// Transaction type a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "INC")]
    Income,
    #[serde(rename = "EXP")]
    Expense,
}

impl TransactionType {
    /// Wire code used in query strings and select values.
    pub fn code(&self) -> &'static str {
        match self {
            TransactionType::Income => "INC",
            TransactionType::Expense => "EXP",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ModelValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "INC" | "Income" => Ok(TransactionType::Income),
            "EXP" | "Expense" => Ok(TransactionType::Expense),
            other => Err(ModelValidationError::UnknownTransactionType(
                other.to_string(),
            )),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One entry of the dependent-category endpoint's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: i64,
    pub name: String,
}

//! Server endpoints the page widgets talk to.
//!
//! Widgets only see the [`NameValidator`] and [`CategorySource`] traits; the
//! HTTP implementations live in [`client`].

use async_trait::async_trait;

use crate::errors::HookResult;
use crate::models::{CategoryOption, TransactionType, ValidationRequest, ValidationResult};

pub mod client;
pub mod headers;
pub mod json;

pub use client::{HttpCategorySource, HttpValidator, TrackerClient};

/// Answers whether a candidate value is already taken.
#[async_trait]
pub trait NameValidator: Send + Sync {
    async fn check(&self, request: &ValidationRequest) -> HookResult<ValidationResult>;
}

/// Lists the categories available for a transaction type.
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn categories(&self, kind: TransactionType) -> HookResult<Vec<CategoryOption>>;
}

use reqwest::StatusCode;
use std::error::Error as StdError;
use thiserror::Error;

use crate::logging::HookEvent;
use crate::models::ModelValidationError;

/// Centralized error type for every round-trip and pre-check a widget performs.
///
/// Widgets never surface these to the page. They are logged and degraded to
/// "no decision rendered" at the widget boundary.
#[derive(Debug, Error)]
pub enum HookError {
    // Transport errors
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("server responded with status {status}")]
    ServerError { status: StatusCode },

    // Response parsing errors
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    // Local errors
    #[error("validation error: {0}")]
    Validation(#[from] ModelValidationError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type HookResult<T> = Result<T, HookError>;

impl HookError {
    /// Maps a reqwest error onto the transport taxonomy.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return HookError::ServerError { status };
        }

        if error.is_decode() {
            return HookError::MalformedResponse(error.to_string());
        }

        let kind = if error.is_timeout() {
            "request timed out"
        } else if error.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        let detail = error
            .source()
            .map(|source| format!("{kind}: {source}"))
            .unwrap_or_else(|| kind.to_string());
        HookError::NetworkFailure(detail)
    }

    /// Whether retrying the same request later could reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            HookError::NetworkFailure(_) => true,
            HookError::ServerError { status } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            HookError::MalformedResponse(_) | HookError::Validation(_) | HookError::Config(_) => {
                false
            }
        }
    }

    /// Records the error as a soft failure for the given widget event.
    pub fn log_soft_failure(&self, event: HookEvent, widget: &str) {
        match self {
            HookError::NetworkFailure(_) | HookError::ServerError { .. } => {
                tracing::warn!(
                    ui_event = %event,
                    widget,
                    error = %self,
                    transient = self.is_transient(),
                    "Remote call failed; leaving widget state unchanged"
                );
            }
            HookError::MalformedResponse(_) => {
                tracing::error!(
                    ui_event = %event,
                    widget,
                    error = %self,
                    "Server returned an unusable body; leaving widget state unchanged"
                );
            }
            HookError::Validation(_) => {
                tracing::debug!(ui_event = %event, widget, error = %self, "Rejected locally");
            }
            HookError::Config(_) => {
                tracing::error!(ui_event = %event, widget, error = %self, "Misconfigured widget");
            }
        }
    }
}

impl From<url::ParseError> for HookError {
    fn from(error: url::ParseError) -> Self {
        HookError::Config(format!("invalid url: {error}"))
    }
}

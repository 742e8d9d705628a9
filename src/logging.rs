use std::fmt;
use std::sync::Once;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Sanitized wrapper for values a user typed into a form field.
///
/// Only the first character and the length survive, which is enough to
/// correlate keystrokes in a trace without leaking what was entered.
#[derive(Debug, Clone)]
pub struct SanitizedValue(String);

impl SanitizedValue {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(Self::sanitize(value.as_ref()))
    }

    fn sanitize(value: &str) -> String {
        let len = value.chars().count();
        match value.chars().next() {
            None => "<empty>".to_string(),
            Some(_) if len <= 2 => format!("{}(len={len})", "*".repeat(len)),
            Some(first) => format!("{first}***(len={len})"),
        }
    }
}

impl fmt::Display for SanitizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one bound widget, safe to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(pub Uuid);

impl FieldId {
    pub fn new() -> Self {
        FieldId(Uuid::new_v4())
    }
}

impl Default for FieldId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for FieldId {
    fn from(uuid: Uuid) -> Self {
        FieldId(uuid)
    }
}

/// UI event types for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    ValidationIssued,
    ValidationApplied,
    ValidationFailed,
    ValidationRejected,
    ValidationCleared,
    StaleResponseDiscarded,
    CategoriesLoaded,
    CategoriesFailed,
    AlertDismissed,
    ViewReset,
}

impl HookEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookEvent::ValidationIssued => "validation_issued",
            HookEvent::ValidationApplied => "validation_applied",
            HookEvent::ValidationFailed => "validation_failed",
            HookEvent::ValidationRejected => "validation_rejected",
            HookEvent::ValidationCleared => "validation_cleared",
            HookEvent::StaleResponseDiscarded => "stale_response_discarded",
            HookEvent::CategoriesLoaded => "categories_loaded",
            HookEvent::CategoriesFailed => "categories_failed",
            HookEvent::AlertDismissed => "alert_dismissed",
            HookEvent::ViewReset => "view_reset",
        }
    }

    /// Events an operator should see without turning on debug output.
    pub fn is_notable(&self) -> bool {
        matches!(
            self,
            HookEvent::ValidationFailed | HookEvent::CategoriesFailed
        )
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Log a UI event with sanitized context
#[macro_export]
macro_rules! log_hook_event {
    ($event:expr, $($field:tt)*) => {
        if $event.is_notable() {
            tracing::warn!(
                ui_event = %$event,
                event_type = "ui",
                $($field)*
            );
        } else {
            tracing::info!(
                ui_event = %$event,
                event_type = "ui",
                $($field)*
            );
        }
    };
}

static INIT: Once = Once::new();

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_target(false)
            .with_env_filter(filter)
            .try_init();
    });
}

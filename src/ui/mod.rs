//! Seams between the widgets and whatever renders the page.
//!
//! Every method takes `&self`: a view is shared between the event loop that
//! feeds it changes and the tasks that apply round-trip results.

use url::Url;

pub mod headless;

/// Placeholder shown first in every category dropdown.
pub const SELECT_PLACEHOLDER: &str = "Select Category";

/// A text input with an inline error slot next to it.
pub trait TextField: Send + Sync {
    /// Renders `message` adjacent to the field, replacing any previous one.
    fn show_error(&self, message: &str);
    fn clear_error(&self);
    /// Toggles the input's invalid marker (the `is-invalid` class on a page).
    fn set_invalid(&self, invalid: bool);
}

pub trait SubmitControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

/// A `<select>` whose options are rebuilt wholesale.
pub trait SelectField: Send + Sync {
    fn replace_options(&self, options: Vec<SelectOption>);
}

/// An alert banner that can be closed.
pub trait Dismissible: Send + Sync {
    fn is_open(&self) -> bool;
    fn close(&self);
}

/// The page's location bar.
pub trait Navigator: Send + Sync {
    fn current_url(&self) -> Url;
    fn navigate(&self, to: Url);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new("", SELECT_PLACEHOLDER)
    }
}

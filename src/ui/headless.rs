//! In-memory views that record what the widgets rendered.
//!
//! Used by hosts without a DOM (server-side previews, terminal front ends) and
//! by the test suites.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use url::Url;

use super::{Dismissible, Navigator, SelectField, SelectOption, SubmitControl, TextField};
use crate::lock;

#[derive(Debug, Default)]
pub struct HeadlessField {
    error: Mutex<Option<String>>,
    invalid: AtomicBool,
}

impl HeadlessField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.error).clone()
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid.load(Ordering::SeqCst)
    }
}

impl TextField for HeadlessField {
    fn show_error(&self, message: &str) {
        *lock(&self.error) = Some(message.to_string());
    }

    fn clear_error(&self) {
        *lock(&self.error) = None;
    }

    fn set_invalid(&self, invalid: bool) {
        self.invalid.store(invalid, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct HeadlessSubmit {
    enabled: AtomicBool,
    changes: AtomicUsize,
}

impl HeadlessSubmit {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            changes: AtomicUsize::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// How many times a widget set the control's state.
    pub fn changes(&self) -> usize {
        self.changes.load(Ordering::SeqCst)
    }
}

impl Default for HeadlessSubmit {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitControl for HeadlessSubmit {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        self.changes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
pub struct HeadlessSelect {
    options: Mutex<Vec<SelectOption>>,
    rebuilds: AtomicUsize,
}

impl HeadlessSelect {
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self {
            options: Mutex::new(options),
            rebuilds: AtomicUsize::new(0),
        }
    }

    pub fn options(&self) -> Vec<SelectOption> {
        lock(&self.options).clone()
    }

    pub fn labels(&self) -> Vec<String> {
        lock(&self.options)
            .iter()
            .map(|option| option.label.clone())
            .collect()
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds.load(Ordering::SeqCst)
    }
}

impl SelectField for HeadlessSelect {
    fn replace_options(&self, options: Vec<SelectOption>) {
        *lock(&self.options) = options;
        self.rebuilds.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct HeadlessAlert {
    open: AtomicBool,
    closes: AtomicUsize,
}

impl HeadlessAlert {
    pub fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Default for HeadlessAlert {
    fn default() -> Self {
        Self::new()
    }
}

impl Dismissible for HeadlessAlert {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct HeadlessNavigator {
    current: Mutex<Url>,
    history: Mutex<Vec<Url>>,
}

impl HeadlessNavigator {
    pub fn new(start: Url) -> Self {
        Self {
            current: Mutex::new(start),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every URL navigated to, oldest first.
    pub fn history(&self) -> Vec<Url> {
        lock(&self.history).clone()
    }
}

impl Navigator for HeadlessNavigator {
    fn current_url(&self) -> Url {
        lock(&self.current).clone()
    }

    fn navigate(&self, to: Url) {
        lock(&self.history).push(to.clone());
        *lock(&self.current) = to;
    }
}

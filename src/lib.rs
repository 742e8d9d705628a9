//! Interaction behaviours for the finance tracker's server-rendered pages.
//!
//! The widgets talk to the page through the traits in [`ui`] and to the server
//! through the traits in [`remote`]; [`PageHooks`] wires both from one
//! [`HooksConfig`].

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod page;
pub mod remote;
pub mod ui;
pub mod widgets;

pub use config::{HooksConfig, Transport};
pub use errors::{HookError, HookResult};
pub use page::PageHooks;

/// Locks a widget's state, recovering it if a view panicked mid-update.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

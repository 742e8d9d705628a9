use std::sync::Arc;

use url::Url;

use crate::logging::HookEvent;
use crate::ui::Navigator;

/// The current page with every filter dropped: origin and path only.
pub fn reset_target(current: &Url) -> Url {
    let mut target = current.clone();
    target.set_query(None);
    target.set_fragment(None);
    // Credentials are not part of the origin; failures only mean the URL has none.
    let _ = target.set_username("");
    let _ = target.set_password(None);
    target
}

/// Button that reloads a chart page without its query parameters.
#[derive(Clone)]
pub struct ResetButton {
    navigator: Arc<dyn Navigator>,
}

impl ResetButton {
    pub fn bind(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Navigates to [`reset_target`] of the current location and returns it.
    pub fn on_click(&self) -> Url {
        let current = self.navigator.current_url();
        let target = reset_target(&current);
        crate::log_hook_event!(
            HookEvent::ViewReset,
            path = target.path(),
            dropped_query = current.query().is_some(),
            "Resetting view"
        );
        self.navigator.navigate(target.clone());
        target
    }
}

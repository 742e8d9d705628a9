use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::config::HooksConfig;
use crate::logging::HookEvent;
use crate::ui::Dismissible;

/// Closes the alert banners present at page load after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct AlertDismisser {
    after: Duration,
}

impl AlertDismisser {
    pub fn new(after: Duration) -> Self {
        Self { after }
    }

    pub fn from_config(config: &HooksConfig) -> Self {
        Self::new(config.alert_dismiss_after)
    }

    pub fn delay(&self) -> Duration {
        self.after
    }

    /// Arms one timer per alert.
    ///
    /// # Panics
    ///
    /// Panics if `alerts` is non-empty and no Tokio runtime is current.
    pub fn schedule(&self, alerts: Vec<Arc<dyn Dismissible>>) -> DismissGuard {
        let after = self.after;
        tracing::debug!(
            alerts = alerts.len(),
            after_ms = after.as_millis() as u64,
            "Scheduling alert dismissal"
        );

        let handles = alerts
            .into_iter()
            .enumerate()
            .map(|(index, alert)| {
                tokio::spawn(async move {
                    sleep(after).await;
                    if !alert.is_open() {
                        tracing::trace!(index, "Alert already closed");
                        return;
                    }
                    alert.close();
                    crate::log_hook_event!(HookEvent::AlertDismissed, index, "Alert dismissed");
                })
            })
            .collect();

        DismissGuard { handles }
    }
}

impl Default for AlertDismisser {
    fn default() -> Self {
        Self::from_config(&HooksConfig::default())
    }
}

/// Pending dismissal timers. Dropping the guard leaves them running.
#[derive(Debug)]
pub struct DismissGuard {
    handles: Vec<JoinHandle<()>>,
}

impl DismissGuard {
    pub fn pending(&self) -> usize {
        self.handles.iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Stops every timer that has not fired yet.
    pub fn cancel(self) {
        for handle in &self.handles {
            handle.abort();
        }
    }

    /// Waits until every timer has fired.
    pub async fn finished(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "Alert dismissal task failed");
            }
        }
    }
}

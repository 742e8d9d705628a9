use std::sync::Arc;

use crate::config::HooksConfig;
use crate::errors::HookResult;
use crate::remote::TrackerClient;
use crate::ui::{Dismissible, Navigator, SelectField, SubmitControl, TextField};
use crate::widgets::{
    AlertDismisser, DependentDropdown, DismissGuard, FieldOptions, RemoteValidationField,
    ResetButton,
};

/// Wires the tracker's widgets to one configuration and HTTP client.
#[derive(Debug, Clone)]
pub struct PageHooks {
    client: TrackerClient,
}

impl PageHooks {
    pub fn new(config: HooksConfig) -> HookResult<Self> {
        Ok(Self {
            client: TrackerClient::new(config)?,
        })
    }

    pub fn from_env() -> HookResult<Self> {
        Self::new(HooksConfig::from_env()?)
    }

    pub fn config(&self) -> &HooksConfig {
        self.client.config()
    }

    pub fn client(&self) -> &TrackerClient {
        &self.client
    }

    /// Category form: name uniqueness gating the submit button.
    pub fn category_name_field(
        &self,
        input: Arc<dyn TextField>,
        submit: Arc<dyn SubmitControl>,
    ) -> RemoteValidationField {
        RemoteValidationField::bind_with(
            input,
            Arc::new(self.client.validator()),
            submit,
            FieldOptions::from_config(self.config()),
        )
    }

    /// Transaction form: category choices following the type selector.
    pub fn category_dropdown(&self, select: Arc<dyn SelectField>) -> DependentDropdown {
        DependentDropdown::bind(Arc::new(self.client.category_source()), select)
    }

    pub fn dismiss_alerts(&self, alerts: Vec<Arc<dyn Dismissible>>) -> DismissGuard {
        AlertDismisser::from_config(self.config()).schedule(alerts)
    }

    pub fn reset_button(&self, navigator: Arc<dyn Navigator>) -> ResetButton {
        ResetButton::bind(navigator)
    }
}

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use super::sequence::{RequestSequence, Ticket};
use crate::errors::HookError;
use crate::lock;
use crate::logging::{FieldId, HookEvent};
use crate::models::{CategoryOption, TransactionType};
use crate::remote::CategorySource;
use crate::ui::{SelectField, SelectOption};

const WIDGET: &str = "category_select";

struct DropdownInner {
    id: FieldId,
    source: Arc<dyn CategorySource>,
    select: Arc<dyn SelectField>,
    sequence: Mutex<RequestSequence>,
}

/// Category `<select>` repopulated whenever the transaction type changes.
#[derive(Clone)]
pub struct DependentDropdown {
    inner: Arc<DropdownInner>,
}

impl DependentDropdown {
    pub fn bind(source: Arc<dyn CategorySource>, select: Arc<dyn SelectField>) -> Self {
        Self {
            inner: Arc::new(DropdownInner {
                id: FieldId::new(),
                source,
                select,
                sequence: Mutex::new(RequestSequence::new()),
            }),
        }
    }

    pub fn id(&self) -> FieldId {
        self.inner.id
    }

    /// Handles a change of the type selector to `raw` (its option value).
    ///
    /// # Panics
    ///
    /// Panics if a known type code arrives outside a Tokio runtime, since the
    /// fetch is spawned onto the current one.
    pub fn on_type_change(&self, raw: &str) -> Option<JoinHandle<()>> {
        let inner = &self.inner;
        let mut sequence = lock(&inner.sequence);
        let ticket = sequence.issue();

        if raw.trim().is_empty() {
            inner.select.replace_options(vec![SelectOption::placeholder()]);
            return None;
        }

        let kind = match raw.parse::<TransactionType>() {
            Ok(kind) => kind,
            Err(err) => {
                HookError::from(err).log_soft_failure(HookEvent::CategoriesFailed, WIDGET);
                return None;
            }
        };

        drop(sequence);
        Some(tokio::spawn(Arc::clone(inner).load(ticket, kind)))
    }
}

impl DropdownInner {
    async fn load(self: Arc<Self>, ticket: Ticket, kind: TransactionType) {
        let outcome = self.source.categories(kind).await;

        let sequence = lock(&self.sequence);
        if !sequence.is_current(ticket) {
            tracing::debug!(
                ui_event = %HookEvent::StaleResponseDiscarded,
                field_id = %self.id,
                %ticket,
                %kind,
                "Discarding stale category list"
            );
            return;
        }

        match outcome {
            Ok(categories) => {
                let count = categories.len();
                self.select.replace_options(render_options(categories));
                crate::log_hook_event!(
                    HookEvent::CategoriesLoaded,
                    field_id = %self.id,
                    %kind,
                    count,
                    "Category options replaced"
                );
            }
            Err(err) => err.log_soft_failure(HookEvent::CategoriesFailed, WIDGET),
        }
    }
}

/// Placeholder first, then one option per category in server order.
pub fn render_options(categories: Vec<CategoryOption>) -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder())
        .chain(
            categories
                .into_iter()
                .map(|category| SelectOption::new(category.id.to_string(), category.name)),
        )
        .collect()
}

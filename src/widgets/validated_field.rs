use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::sequence::{RequestSequence, Ticket};
use crate::config::HooksConfig;
use crate::errors::HookError;
use crate::lock;
use crate::logging::{FieldId, HookEvent, SanitizedValue};
use crate::models::{CategoryName, FieldState, ValidationRequest};
use crate::remote::NameValidator;
use crate::ui::{SubmitControl, TextField};

pub const ALREADY_EXISTS_MESSAGE: &str = "Category with this Name already exists.";

const WIDGET: &str = "category_name";

#[derive(Debug, Clone)]
pub struct FieldOptions {
    /// Quiet period after a change before the check is sent.
    pub debounce: Duration,
    pub exists_message: String,
}

impl FieldOptions {
    pub fn from_config(config: &HooksConfig) -> Self {
        Self {
            debounce: config.debounce,
            ..Self::default()
        }
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::ZERO,
            exists_message: ALREADY_EXISTS_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct FieldSlot {
    sequence: RequestSequence,
    state: FieldState,
    /// Last state a decision or the empty shortcut produced.
    settled: FieldState,
    requests_sent: u64,
}

struct FieldInner {
    id: FieldId,
    input: Arc<dyn TextField>,
    validator: Arc<dyn NameValidator>,
    submit: Arc<dyn SubmitControl>,
    options: FieldOptions,
    slot: Mutex<FieldSlot>,
}

/// A text input kept in sync with a server-side uniqueness check.
///
/// Each change clears the inline error and, for a non-blank value, starts one
/// round-trip tagged with a fresh [`Ticket`]. A result is applied only while
/// its ticket is still the latest, so a slow answer to an old value can never
/// overwrite the answer for what is in the box now.
#[derive(Clone)]
pub struct RemoteValidationField {
    inner: Arc<FieldInner>,
}

impl RemoteValidationField {
    pub fn bind(
        input: Arc<dyn TextField>,
        validator: Arc<dyn NameValidator>,
        submit: Arc<dyn SubmitControl>,
    ) -> Self {
        Self::bind_with(input, validator, submit, FieldOptions::default())
    }

    pub fn bind_with(
        input: Arc<dyn TextField>,
        validator: Arc<dyn NameValidator>,
        submit: Arc<dyn SubmitControl>,
        options: FieldOptions,
    ) -> Self {
        let id = FieldId::new();
        tracing::debug!(
            field_id = %id,
            debounce_ms = options.debounce.as_millis() as u64,
            "Binding remote validation field"
        );

        Self {
            inner: Arc::new(FieldInner {
                id,
                input,
                validator,
                submit,
                options,
                slot: Mutex::new(FieldSlot::default()),
            }),
        }
    }

    pub fn id(&self) -> FieldId {
        self.inner.id
    }

    pub fn state(&self) -> FieldState {
        lock(&self.inner.slot).state
    }

    /// Checks actually sent to the validator so far.
    pub fn requests_sent(&self) -> u64 {
        lock(&self.inner.slot).requests_sent
    }

    /// Handles one change of the input's value.
    ///
    /// Everything visible for this change happens before returning; the
    /// round-trip, if any, runs on the returned task.
    ///
    /// # Panics
    ///
    /// Panics if a non-blank value arrives outside a Tokio runtime, since the
    /// round-trip is spawned onto the current one. Blank values and local
    /// rejections never spawn.
    pub fn on_input(&self, value: &str) -> Option<JoinHandle<()>> {
        let inner = &self.inner;
        let parsed = CategoryName::parse(value);

        let mut slot = lock(&inner.slot);
        let ticket = slot.sequence.issue();

        inner.input.clear_error();
        inner.input.set_invalid(false);

        match parsed {
            Ok(None) => {
                inner.submit.set_enabled(true);
                slot.state = FieldState::Empty;
                slot.settled = FieldState::Empty;
                crate::log_hook_event!(
                    HookEvent::ValidationCleared,
                    field_id = %inner.id,
                    ticket = ticket.value(),
                    "Field cleared"
                );
                None
            }
            Err(err) => {
                inner.render_invalid(&err.to_string());
                slot.state = FieldState::Invalid;
                slot.settled = FieldState::Invalid;
                HookError::from(err).log_soft_failure(HookEvent::ValidationRejected, WIDGET);
                None
            }
            Ok(Some(name)) => {
                slot.state = FieldState::Pending;
                drop(slot);
                Some(tokio::spawn(Arc::clone(inner).validate(ticket, name)))
            }
        }
    }
}

impl FieldInner {
    async fn validate(self: Arc<Self>, ticket: Ticket, name: CategoryName) {
        if !self.options.debounce.is_zero() {
            sleep(self.options.debounce).await;
            if !lock(&self.slot).sequence.is_current(ticket) {
                tracing::trace!(field_id = %self.id, %ticket, "Superseded before dispatch");
                return;
            }
        }

        lock(&self.slot).requests_sent += 1;
        crate::log_hook_event!(
            HookEvent::ValidationIssued,
            field_id = %self.id,
            ticket = ticket.value(),
            value = %SanitizedValue::new(name.as_str()),
            "Checking category name"
        );

        let outcome = self
            .validator
            .check(&ValidationRequest::new(name.into_inner()))
            .await;

        let mut slot = lock(&self.slot);
        if !slot.sequence.is_current(ticket) {
            tracing::debug!(
                ui_event = %HookEvent::StaleResponseDiscarded,
                field_id = %self.id,
                %ticket,
                latest = ?slot.sequence.latest().map(|latest| latest.value()),
                "Discarding stale validation response"
            );
            return;
        }

        match outcome {
            Ok(result) if result.exists => {
                self.render_invalid(&self.options.exists_message);
                slot.state = FieldState::Invalid;
                slot.settled = FieldState::Invalid;
            }
            Ok(_) => {
                self.input.set_invalid(false);
                self.submit.set_enabled(true);
                slot.state = FieldState::Valid;
                slot.settled = FieldState::Valid;
            }
            Err(err) => {
                err.log_soft_failure(HookEvent::ValidationFailed, WIDGET);
                slot.state = slot.settled;
                return;
            }
        }

        crate::log_hook_event!(
            HookEvent::ValidationApplied,
            field_id = %self.id,
            ticket = ticket.value(),
            state = ?slot.state,
            "Validation result applied"
        );
    }

    fn render_invalid(&self, message: &str) {
        self.input.set_invalid(true);
        self.input.show_error(message);
        self.submit.set_enabled(false);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use proptest::prelude::*;
    use reqwest::StatusCode;
    use tokio::sync::oneshot;

    use super::*;
    use crate::errors::HookResult;
    use crate::models::ValidationResult;
    use crate::ui::headless::{HeadlessField, HeadlessSubmit};

    type Reply = oneshot::Sender<HookResult<ValidationResult>>;

    /// Validator whose answers the test releases one value at a time.
    #[derive(Default)]
    struct ScriptedValidator {
        waiting: Mutex<HashMap<String, Reply>>,
        calls: AtomicUsize,
    }

    impl ScriptedValidator {
        async fn respond(&self, value: &str, outcome: HookResult<ValidationResult>) {
            loop {
                if let Some(reply) = lock(&self.waiting).remove(value) {
                    let _ = reply.send(outcome);
                    return;
                }
                sleep(Duration::from_millis(1)).await;
            }
        }

        async fn answer(&self, value: &str, exists: bool) {
            self.respond(value, Ok(ValidationResult { exists })).await;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NameValidator for ScriptedValidator {
        async fn check(&self, request: &ValidationRequest) -> HookResult<ValidationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = oneshot::channel();
            lock(&self.waiting).insert(request.field_value.clone(), tx);
            rx.await
                .unwrap_or_else(|_| Err(HookError::NetworkFailure("dropped".to_string())))
        }
    }

    struct Page {
        input: Arc<HeadlessField>,
        submit: Arc<HeadlessSubmit>,
        validator: Arc<ScriptedValidator>,
        field: RemoteValidationField,
    }

    fn page_with(options: FieldOptions) -> Page {
        let input = Arc::new(HeadlessField::new());
        let submit = Arc::new(HeadlessSubmit::new());
        let validator = Arc::new(ScriptedValidator::default());
        let field = RemoteValidationField::bind_with(
            input.clone(),
            validator.clone(),
            submit.clone(),
            options,
        );
        Page {
            input,
            submit,
            validator,
            field,
        }
    }

    fn page() -> Page {
        page_with(FieldOptions::default())
    }

    #[tokio::test]
    async fn test_existing_name_blocks_submit() {
        let page = page();

        let handle = page.field.on_input("Food").unwrap();
        assert_eq!(page.field.state(), FieldState::Pending);

        page.validator.answer("Food", true).await;
        handle.await.unwrap();

        assert_eq!(page.field.state(), FieldState::Invalid);
        assert!(page.input.is_invalid());
        assert_eq!(page.input.error().as_deref(), Some(ALREADY_EXISTS_MESSAGE));
        assert!(!page.submit.is_enabled());
    }

    #[tokio::test]
    async fn test_new_name_enables_submit() {
        let page = page();

        let handle = page.field.on_input("Salary").unwrap();
        page.validator.answer("Salary", false).await;
        handle.await.unwrap();

        assert_eq!(page.field.state(), FieldState::Valid);
        assert!(!page.input.is_invalid());
        assert!(page.input.error().is_none());
        assert!(page.submit.is_enabled());
    }

    #[tokio::test]
    async fn test_slow_earlier_response_is_discarded() {
        let page = page();

        let rent = page.field.on_input("Rent").unwrap();
        let rent2 = page.field.on_input("Rent2").unwrap();

        page.validator.answer("Rent2", false).await;
        rent2.await.unwrap();
        assert!(page.submit.is_enabled());
        assert_eq!(page.field.state(), FieldState::Valid);

        page.validator.answer("Rent", true).await;
        rent.await.unwrap();

        assert_eq!(page.field.state(), FieldState::Valid);
        assert!(page.submit.is_enabled());
        assert!(page.input.error().is_none());
        assert!(!page.input.is_invalid());
        assert_eq!(page.validator.calls(), 2);
    }

    #[tokio::test]
    async fn test_any_arrival_order_applies_only_the_last_value() {
        let page = page();
        let values = ["R", "Re", "Ren", "Rent", "Rent2"];

        let handles: Vec<_> = values
            .iter()
            .map(|value| page.field.on_input(value).unwrap())
            .collect();

        // Answer newest first, and make every stale answer the opposite.
        for (index, value) in values.iter().enumerate().rev() {
            let is_last = index == values.len() - 1;
            page.validator.answer(value, !is_last).await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(page.field.state(), FieldState::Valid);
        assert!(page.submit.is_enabled());
        assert!(page.input.error().is_none());
    }

    #[tokio::test]
    async fn test_clearing_is_immediate_and_offline() {
        let page = page();

        let handle = page.field.on_input("Food").unwrap();
        page.validator.answer("Food", true).await;
        handle.await.unwrap();
        assert!(!page.submit.is_enabled());

        assert!(page.field.on_input("").is_none());

        assert_eq!(page.field.state(), FieldState::Empty);
        assert!(page.input.error().is_none());
        assert!(!page.input.is_invalid());
        assert!(page.submit.is_enabled());
        assert_eq!(page.validator.calls(), 1);
    }

    #[tokio::test]
    async fn test_clearing_supersedes_in_flight_check() {
        let page = page();

        let handle = page.field.on_input("Food").unwrap();
        assert!(page.field.on_input("   ").is_none());
        assert_eq!(page.field.state(), FieldState::Empty);

        page.validator.answer("Food", true).await;
        handle.await.unwrap();

        assert_eq!(page.field.state(), FieldState::Empty);
        assert!(page.input.error().is_none());
        assert!(page.submit.is_enabled());
    }

    #[tokio::test]
    async fn test_server_error_leaves_submit_untouched() {
        let page = page();

        let handle = page.field.on_input("Food").unwrap();
        page.validator.answer("Food", true).await;
        handle.await.unwrap();
        let changes = page.submit.changes();

        let handle = page.field.on_input("Foods").unwrap();
        page.validator
            .respond(
                "Foods",
                Err(HookError::ServerError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                }),
            )
            .await;
        handle.await.unwrap();

        assert!(!page.submit.is_enabled());
        assert_eq!(page.submit.changes(), changes);
        assert_eq!(page.field.state(), FieldState::Invalid);
        assert!(page.input.error().is_none());
    }

    #[tokio::test]
    async fn test_network_failure_does_not_stick_in_pending() {
        let page = page();

        let handle = page.field.on_input("Rent").unwrap();
        page.validator.answer("Rent", false).await;
        handle.await.unwrap();

        let handle = page.field.on_input("Rental").unwrap();
        assert_eq!(page.field.state(), FieldState::Pending);
        page.validator
            .respond("Rental", Err(HookError::NetworkFailure("refused".to_string())))
            .await;
        handle.await.unwrap();

        assert_eq!(page.field.state(), FieldState::Valid);
        assert!(page.submit.is_enabled());
    }

    #[tokio::test]
    async fn test_overlong_name_rejected_without_request() {
        let page = page();
        let name = "x".repeat(crate::models::CATEGORY_NAME_MAX_CHARS + 1);

        assert!(page.field.on_input(&name).is_none());

        assert_eq!(page.field.state(), FieldState::Invalid);
        assert!(page.input.is_invalid());
        assert!(page.input.error().unwrap().contains("150"));
        assert!(!page.submit.is_enabled());
        assert_eq!(page.validator.calls(), 0);
    }

    #[tokio::test]
    async fn test_value_is_trimmed_before_sending() {
        let page = page();

        let handle = page.field.on_input("  Rent ").unwrap();
        page.validator.answer("Rent", false).await;
        handle.await.unwrap();

        assert_eq!(page.field.state(), FieldState::Valid);
    }

    #[tokio::test]
    async fn test_custom_message() {
        let page = page_with(FieldOptions {
            exists_message: "Already taken.".to_string(),
            ..FieldOptions::default()
        });

        let handle = page.field.on_input("Food").unwrap();
        page.validator.answer("Food", true).await;
        handle.await.unwrap();

        assert_eq!(page.input.error().as_deref(), Some("Already taken."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_sends_only_the_settled_value() {
        let page = page_with(FieldOptions {
            debounce: Duration::from_millis(200),
            ..FieldOptions::default()
        });

        let first = page.field.on_input("R").unwrap();
        let second = page.field.on_input("Re").unwrap();
        let last = page.field.on_input("Rent").unwrap();

        first.await.unwrap();
        second.await.unwrap();

        page.validator.answer("Rent", false).await;
        last.await.unwrap();

        assert_eq!(page.validator.calls(), 1);
        assert_eq!(page.field.requests_sent(), 1);
        assert_eq!(page.field.state(), FieldState::Valid);
    }

    #[tokio::test]
    async fn test_name_with_tab_is_sent_to_server() {
        let page = page();

        let handle = page.field.on_input("Rent\tBills").unwrap();
        assert_eq!(page.field.state(), FieldState::Pending);

        page.validator.answer("Rent\tBills", false).await;
        handle.await.unwrap();

        assert_eq!(page.validator.calls(), 1);
        assert_eq!(page.field.state(), FieldState::Valid);
        assert!(page.input.error().is_none());
        assert!(page.submit.is_enabled());
    }

    #[test]
    fn test_clearing_works_outside_a_runtime() {
        let page = page();

        assert!(page.field.on_input("").is_none());
        assert_eq!(page.field.state(), FieldState::Empty);
        assert!(page.submit.is_enabled());
    }

    #[test]
    #[should_panic(expected = "Tokio 1.x runtime")]
    fn test_checking_outside_a_runtime_panics() {
        let page = page();
        let _ = page.field.on_input("Food");
    }

    /// One change: blank or not, and what the server says if asked.
    #[derive(Debug, Clone, Copy)]
    struct Edit {
        blank: bool,
        exists: bool,
    }

    fn value_for(index: usize, edit: Edit) -> String {
        if edit.blank {
            " ".repeat(index % 2)
        } else {
            format!("Cat{index}")
        }
    }

    /// Edits typed in order plus the order the server answers them in.
    fn arb_edits_and_arrivals() -> BoxedStrategy<(Vec<Edit>, Vec<usize>)> {
        let edit = (prop::bool::weighted(0.25), any::<bool>())
            .prop_map(|(blank, exists)| Edit { blank, exists });
        prop::collection::vec(edit, 1..8)
            .prop_flat_map(|edits| {
                let arrivals: Vec<usize> = (0..edits.len()).collect();
                (Just(edits), Just(arrivals).prop_shuffle())
            })
            .boxed()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Whatever order answers arrive in, only the last edit decides.
        #[test]
        fn prop_last_edit_decides((edits, arrivals) in arb_edits_and_arrivals()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();

            runtime.block_on(async {
                let page = page();

                let handles: Vec<_> = edits
                    .iter()
                    .enumerate()
                    .map(|(index, edit)| page.field.on_input(&value_for(index, *edit)))
                    .collect();

                for index in arrivals {
                    let edit = edits[index];
                    if !edit.blank {
                        page.validator.answer(&value_for(index, edit), edit.exists).await;
                    }
                }
                for handle in handles.into_iter().flatten() {
                    handle.await.unwrap();
                }

                let sent = edits.iter().filter(|edit| !edit.blank).count();
                assert_eq!(page.validator.calls(), sent);

                let Some(last) = edits.last().copied() else {
                    return;
                };
                match (last.blank, last.exists) {
                    (true, _) => {
                        assert_eq!(page.field.state(), FieldState::Empty);
                        assert!(page.input.error().is_none());
                        assert!(page.submit.is_enabled());
                    }
                    (false, true) => {
                        assert_eq!(page.field.state(), FieldState::Invalid);
                        assert_eq!(page.input.error().as_deref(), Some(ALREADY_EXISTS_MESSAGE));
                        assert!(!page.submit.is_enabled());
                    }
                    (false, false) => {
                        assert_eq!(page.field.state(), FieldState::Valid);
                        assert!(page.input.error().is_none());
                        assert!(page.submit.is_enabled());
                    }
                }
            });
        }
    }
}

//! Submit lifecycle of a data-entry screen.
//!
//! `Idle → Submitting → {SucceededTransient, FailedTransient} → Idle`. The
//! transient states last for the configured notice delay, driven by the
//! controller's single notifier timer. `TornDown` is terminal: a mutation
//! still in flight at teardown resolves without any further state change.

mod config;
mod effects;


use std::sync::Arc;

use parking_lot::Mutex;
use salesdesk_core::{AppError, RemoteError};
use salesdesk_domain::{ConfirmedEntity, FieldErrors, MutationOperation};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub use config::{DEFAULT_NOTICE_DELAY_MS, SubmissionConfig};
pub use effects::SuccessEffect;

use crate::{
    FormSession, ListCacheStore, ListCacheUpdater, Navigator, NoticeEvent, RemoteDataService,
    TransientNotifier,
};

/// Submit lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Ready to submit.
    Idle,
    /// Mutation in flight.
    Submitting,
    /// Mutation confirmed; success effects are playing out.
    SucceededTransient,
    /// Mutation failed; the failure message is shown.
    FailedTransient,
    /// The screen is gone; nothing changes any more.
    TornDown,
}

impl SubmissionState {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::SucceededTransient => "succeeded_transient",
            Self::FailedTransient => "failed_transient",
            Self::TornDown => "torn_down",
        }
    }

    fn accepts_submit(self) -> bool {
        matches!(self, Self::Idle | Self::FailedTransient)
    }
}

/// Result of one submit call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The form has errors; nothing was sent.
    Invalid(FieldErrors),
    /// A submission was already in flight or finishing; nothing was sent.
    Ignored(SubmissionState),
    /// The remote side confirmed the entity.
    Succeeded(ConfirmedEntity),
    /// The remote side rejected the mutation. The draft is kept.
    Failed(RemoteError),
}

/// Orchestrates validation, the mutation call, cache reconciliation, and
/// status messages for one screen.
pub struct SubmissionController {
    remote: Arc<dyn RemoteDataService>,
    cache_updater: ListCacheUpdater,
    navigator: Arc<dyn Navigator>,
    notifier: TransientNotifier,
    config: SubmissionConfig,
    state: Arc<Mutex<SubmissionState>>,
}

impl SubmissionController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(
        remote: Arc<dyn RemoteDataService>,
        cache: Arc<dyn ListCacheStore>,
        navigator: Arc<dyn Navigator>,
        config: SubmissionConfig,
    ) -> Self {
        Self {
            remote,
            cache_updater: ListCacheUpdater::new(cache),
            navigator,
            notifier: TransientNotifier::new(),
            config,
            state: Arc::new(Mutex::new(SubmissionState::Idle)),
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        *self.state.lock()
    }

    /// Returns the visible status message.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.notifier.text()
    }

    /// Subscribes to status message events.
    #[must_use]
    pub fn subscribe_notices(&self) -> broadcast::Receiver<NoticeEvent> {
        self.notifier.subscribe()
    }

    /// Submits the session's draft.
    ///
    /// Invalid forms and calls made while another submission is in flight
    /// return without contacting the remote side.
    pub async fn submit(&self, session: &FormSession) -> SubmitOutcome {
        let operation = session.operation();

        if !session.is_submittable() {
            debug!(
                operation = %operation,
                invalid_fields = session.errors().len(),
                "submit blocked by field errors"
            );
            return SubmitOutcome::Invalid(session.errors().clone());
        }

        let draft = match session.snapshot() {
            Ok(draft) => draft,
            Err(error) => {
                warn!(operation = %operation, error = %error, "failed to snapshot form draft");
                return SubmitOutcome::Invalid(session.errors().clone());
            }
        };

        {
            let mut state = self.state.lock();
            if !state.accepts_submit() {
                debug!(
                    operation = %operation,
                    state = state.as_str(),
                    "ignoring submit in the current state"
                );
                return SubmitOutcome::Ignored(*state);
            }
            *state = SubmissionState::Submitting;
        }

        // A retry after a failure supersedes the failure message and its timer.
        self.notifier.clear();
        info!(operation = %operation, "submitting draft");

        match self.remote.mutate(operation, &draft).await {
            Ok(confirmed) => {
                self.on_success(operation, &confirmed).await;
                SubmitOutcome::Succeeded(confirmed)
            }
            Err(error) => {
                self.on_failure(operation, &error);
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Ends the controller. The pending timer is cancelled, further submits
    /// are ignored, and a mutation still in flight shows no message, alert or
    /// navigation when it resolves. Idempotent.
    pub fn teardown(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), SubmissionState::TornDown);
        self.notifier.clear();

        if previous != SubmissionState::TornDown {
            debug!(from = previous.as_str(), "submission controller torn down");
        }
    }

    /// Moves to `next` unless the controller was torn down meanwhile.
    fn enter(&self, next: SubmissionState) -> bool {
        let mut state = self.state.lock();
        if *state == SubmissionState::TornDown {
            return false;
        }
        *state = next;
        true
    }

    async fn on_success(&self, operation: MutationOperation, confirmed: &ConfirmedEntity) {
        info!(operation = %operation, id = %confirmed.id(), "mutation confirmed");

        // The cached list is shared with sibling screens, so the merge runs
        // even when this screen is already gone.
        if let Some(query) = operation.merges_into() {
            match self.cache_updater.apply(query, confirmed.clone()).await {
                Ok(len) => debug!(query = %query, len, "cached list updated"),
                Err(AppError::CacheReadMissing(_)) => {
                    debug!(query = %query, "cached list not loaded; skipping merge");
                }
                Err(error) => {
                    warn!(query = %query, error = %error, "failed to update cached list");
                }
            }
        }

        if !self.enter(SubmissionState::SucceededTransient) {
            debug!(operation = %operation, "controller torn down; success effects skipped");
            return;
        }

        let effect = SuccessEffect::for_operation(operation, confirmed);
        if let Some((title, text)) = effect.alert() {
            self.navigator.alert(title, text);
        }
        if !effect.navigates_after_delay() {
            self.navigator.navigate(effect.navigation());
        }

        let state = Arc::clone(&self.state);
        let navigator = Arc::clone(&self.navigator);
        let deferred = effect
            .navigates_after_delay()
            .then_some(effect.navigation());
        self.notifier.show_then(
            effect.message().map(str::to_owned),
            self.config.notice_delay(),
            Box::new(move || {
                settle(&state, SubmissionState::SucceededTransient);
                if let Some(target) = deferred {
                    navigator.navigate(target);
                }
            }),
        );
    }

    fn on_failure(&self, operation: MutationOperation, error: &RemoteError) {
        warn!(operation = %operation, error = %error, "mutation rejected");

        if !self.enter(SubmissionState::FailedTransient) {
            debug!(operation = %operation, "controller torn down; failure message skipped");
            return;
        }

        let state = Arc::clone(&self.state);
        self.notifier.show_then(
            Some(error.user_message().to_owned()),
            self.config.notice_delay(),
            Box::new(move || settle(&state, SubmissionState::FailedTransient)),
        );
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Returns to idle if the controller is still in the transient state the timer was set for.
fn settle(state: &Mutex<SubmissionState>, expected: SubmissionState) {
    let mut state = state.lock();
    if *state == expected {
        *state = SubmissionState::Idle;
        debug!(from = expected.as_str(), "submission settled");
    }
}

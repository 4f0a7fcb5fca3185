//! Lifecycle of a console form: edit the draft, submit it once, report the
//! outcome, and reset to a fresh draft a short while after a success.
//!
//! Editing -> Submitting -> Succeeded -> (after `reset_delay`) -> Editing
//!                       \-> Failed -> Submitting on the next attempt
//!
//! The post-success reset cannot be cancelled.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::client::ApiError;
use crate::console::clock::Clock;

/// Shown when the HRMS API fails without saying why.
pub const GENERIC_FAILURE: &str = "An unexpected error occurred.";

/// The editable contents of a form.
pub trait Draft: Clone + Send + 'static {
    /// What the collaborator receives once the draft validates.
    type Payload: Send + 'static;

    const SUCCESS_MESSAGE: &'static str;

    fn fresh(today: NaiveDate) -> Self;

    fn validate(&self, today: NaiveDate) -> Result<Self::Payload, ValidationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} is not valid: {value:?}")]
    Invalid { field: &'static str, value: String },

    #[error("date {0} is in the future")]
    FutureDate(NaiveDate),
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("a submission is already in progress")]
    Busy,

    #[error("the form is about to reset after a successful submission")]
    ResetPending,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

/// Snapshot of a form for display.
#[derive(Debug, Clone, Serialize)]
pub struct FormView<D> {
    pub phase: FormPhase,
    pub draft: D,
    pub can_submit: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub reset_scheduled: bool,
    /// Number of successful submissions that have completed their reset.
    pub completed: u64,
}

#[derive(Debug)]
pub enum SubmitOutcome<T> {
    Succeeded(T),
    Failed(String),
}

struct FormState<D> {
    phase: FormPhase,
    draft: D,
    error: Option<String>,
    success: Option<String>,
    // Nothing aborts the reset yet; the handle is kept for abort-on-navigate.
    pending_reset: Option<AbortHandle>,
}

pub struct SubmissionFlow<D> {
    name: &'static str,
    state: Arc<Mutex<FormState<D>>>,
    clock: Arc<dyn Clock>,
    reset_delay: Duration,
    completed: Arc<watch::Sender<u64>>,
}

impl<D> Clone for SubmissionFlow<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
            reset_delay: self.reset_delay,
            completed: Arc::clone(&self.completed),
        }
    }
}

impl<D: Draft> SubmissionFlow<D> {
    pub fn new(name: &'static str, clock: Arc<dyn Clock>, reset_delay: Duration) -> Self {
        let state = FormState {
            phase: FormPhase::Editing,
            draft: D::fresh(clock.today()),
            error: None,
            success: None,
            pending_reset: None,
        };
        let (completed, _) = watch::channel(0);

        Self {
            name,
            state: Arc::new(Mutex::new(state)),
            clock,
            reset_delay,
            completed: Arc::new(completed),
        }
    }

    pub fn view(&self) -> FormView<D> {
        let state = self.state.lock();
        self.render(&state)
    }

    /// Receiver that changes each time a successful submission finishes its reset.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.completed.subscribe()
    }

    pub fn edit(&self, apply: impl FnOnce(&mut D)) -> Result<FormView<D>, FlowError> {
        let mut state = self.state.lock();
        ensure_open(state.phase)?;
        apply(&mut state.draft);
        Ok(self.render(&state))
    }

    /// Validates the draft and hands the payload to `send` exactly once.
    ///
    /// The call runs on its own task, so the form always settles in
    /// `Succeeded` or `Failed` even if the caller stops waiting.
    pub async fn submit<Fut, T>(
        &self,
        send: impl FnOnce(D::Payload) -> Fut,
    ) -> Result<SubmitOutcome<T>, FlowError>
    where
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
        T: Send + 'static,
    {
        let payload = {
            let mut state = self.state.lock();
            ensure_open(state.phase)?;
            if state.phase == FormPhase::Failed {
                state.phase = FormPhase::Editing;
                state.error = None;
            }
            let payload = state.draft.validate(self.clock.today())?;
            state.phase = FormPhase::Submitting;
            state.error = None;
            state.success = None;
            payload
        };
        debug!(form = self.name, "Submitting form");

        let call = send(payload);
        let flow = self.clone();
        let task = tokio::spawn(async move {
            let result = call.await;
            flow.settle(result)
        });

        match task.await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(form = self.name, error = %e, "Submission task did not finish");
                Ok(self.fail(GENERIC_FAILURE.to_owned()))
            }
        }
    }

    fn settle<T>(&self, result: Result<T, ApiError>) -> SubmitOutcome<T> {
        match result {
            Ok(created) => {
                let mut state = self.state.lock();
                state.phase = FormPhase::Succeeded;
                state.success = Some(D::SUCCESS_MESSAGE.to_owned());
                state.pending_reset = Some(self.schedule_reset());
                info!(
                    form = self.name,
                    delay_ms = self.reset_delay.as_millis() as u64,
                    "Submission succeeded"
                );
                SubmitOutcome::Succeeded(created)
            }
            Err(e) => {
                warn!(form = self.name, error = %e, "Submission rejected");
                self.fail(e.user_message(GENERIC_FAILURE))
            }
        }
    }

    fn fail<T>(&self, message: String) -> SubmitOutcome<T> {
        let mut state = self.state.lock();
        state.phase = FormPhase::Failed;
        state.error = Some(message.clone());
        SubmitOutcome::Failed(message)
    }

    fn schedule_reset(&self) -> AbortHandle {
        let flow = self.clone();
        let delay = self.reset_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            flow.reset();
        })
        .abort_handle()
    }

    fn reset(&self) {
        {
            let mut state = self.state.lock();
            state.draft = D::fresh(self.clock.today());
            state.phase = FormPhase::Editing;
            state.error = None;
            state.success = None;
            state.pending_reset = None;
        }
        self.completed.send_modify(|count| *count += 1);
        debug!(form = self.name, "Form reset");
    }

    fn render(&self, state: &FormState<D>) -> FormView<D> {
        let open = ensure_open(state.phase).is_ok();
        FormView {
            phase: state.phase,
            draft: state.draft.clone(),
            can_submit: open && state.draft.validate(self.clock.today()).is_ok(),
            error: state.error.clone(),
            success: state.success.clone(),
            reset_scheduled: state.pending_reset.is_some(),
            completed: *self.completed.borrow(),
        }
    }
}

fn ensure_open(phase: FormPhase) -> Result<(), FlowError> {
    match phase {
        FormPhase::Editing | FormPhase::Failed => Ok(()),
        FormPhase::Submitting => Err(FlowError::Busy),
        FormPhase::Succeeded => Err(FlowError::ResetPending),
    }
}

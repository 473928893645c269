//! Submission orchestration.
//!
//! One call to [`SubmissionOrchestrator::submit`] drives a full attempt:
//!
//! ```text
//! Idle -> Validating -> Enriching (reply, summary, actions) -> Persisting -> Succeeded
//!              |                 |                                  |
//!              +-----------------+------------> Failed <------------+
//! ```
//!
//! Succeeded and Failed fall back to Idle before `submit` returns. Only one
//! attempt can be in flight; a `submit` that arrives while another is running
//! is ignored without touching any collaborator.
//!
//! The enrichment calls are issued one at a time in a fixed order and the
//! first failure ends the attempt. They are independent of each other and
//! could be issued concurrently; the sequential order is kept so a failing
//! service is hit at most once per attempt.

use crate::enrichment::{EnrichmentClient, EnrichmentError};
use crate::notify::NotificationSink;
use crate::review::{
    validate, EnrichmentKind, PersistedReview, ReviewDraft, ReviewSubmission, SubmissionState,
    ValidationError,
};
use crate::store::{PersistenceError, ReviewStore};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const SUCCESS_MESSAGE: &str = "Review submitted successfully!";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to submit review. Please try again.";
/// Reply handed back when the generated reply is empty.
pub const DEFAULT_REPLY: &str = "Thank you for your feedback!";

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl SubmissionError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        let specific = match self {
            Self::Validation(err) => Some(err.to_string()),
            Self::Enrichment(err) => err.user_message().map(str::to_string),
            Self::Persistence(err) => err.user_message(),
        };
        specific.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
    }
}

/// Result of one `submit` call.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The record was stored; `reply` is the generated reply for the user.
    Submitted { reply: String },
    /// The attempt ended early. The error has already been notified.
    Failed(SubmissionError),
    /// Another submission was in flight; nothing happened.
    Ignored,
}

pub struct SubmissionOrchestrator {
    enricher: Box<dyn EnrichmentClient>,
    store: Box<dyn ReviewStore>,
    notifier: Box<dyn NotificationSink>,
    state: Mutex<SubmissionState>,
}

impl SubmissionOrchestrator {
    pub fn new(
        enricher: Box<dyn EnrichmentClient>,
        store: Box<dyn ReviewStore>,
        notifier: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            enricher,
            store,
            notifier,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    pub fn state(&self) -> SubmissionState {
        *lock_state(&self.state)
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.state().is_in_flight()
    }

    pub fn submit(&self, draft: &ReviewDraft) -> SubmitOutcome {
        let Some(flight) = InFlight::begin(&self.state) else {
            tracing::debug!("submission already in flight; ignoring submit");
            return SubmitOutcome::Ignored;
        };

        match self.run(&flight, draft) {
            Ok(reply) => {
                flight.transition(SubmissionState::Succeeded);
                self.notifier.notify_success(SUCCESS_MESSAGE);
                SubmitOutcome::Submitted { reply }
            }
            Err(err) => {
                flight.transition(SubmissionState::Failed);
                tracing::warn!(error = %err, "review submission failed");
                self.notifier.notify_error(&err.user_message());
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn run(&self, flight: &InFlight<'_>, draft: &ReviewDraft) -> Result<String, SubmissionError> {
        let submission = validate(draft)?;

        flight.transition(SubmissionState::Enriching);
        let record = self.enrich_all(&submission)?;

        flight.transition(SubmissionState::Persisting);
        self.store.persist(&record)?;
        tracing::info!(rating = record.rating, "review stored");

        Ok(record.reply.unwrap_or_else(|| DEFAULT_REPLY.to_string()))
    }

    /// Issue the three calls in order; the first failure ends the attempt.
    fn enrich_all(
        &self,
        submission: &ReviewSubmission,
    ) -> Result<PersistedReview, EnrichmentError> {
        let enrich = |kind: EnrichmentKind| {
            tracing::debug!(%kind, "requesting enrichment");
            self.enricher
                .enrich(submission.text(), submission.rating(), kind)
        };
        let reply = enrich(EnrichmentKind::Reply)?;
        let summary = enrich(EnrichmentKind::Summary)?;
        let recommended_actions = enrich(EnrichmentKind::RecommendedActions)?;
        Ok(PersistedReview::from_enrichment(
            submission,
            reply,
            summary,
            recommended_actions,
        ))
    }
}

fn lock_state(state: &Mutex<SubmissionState>) -> MutexGuard<'_, SubmissionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks the orchestrator busy for the lifetime of one attempt and puts it
/// back to Idle when dropped, including on unwind.
struct InFlight<'a> {
    state: &'a Mutex<SubmissionState>,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a Mutex<SubmissionState>) -> Option<Self> {
        let mut current = lock_state(state);
        if current.is_in_flight() {
            return None;
        }
        *current = SubmissionState::Validating;
        Some(Self { state })
    }

    fn transition(&self, next: SubmissionState) {
        let mut current = lock_state(self.state);
        tracing::debug!(from = ?*current, to = ?next, "submission state");
        *current = next;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *lock_state(self.state) = SubmissionState::Idle;
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

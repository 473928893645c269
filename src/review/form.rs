//! Input boundary for a review: star selection and the review text field.
//!
//! The form owns the draft. Submitting only lends it to the orchestrator, so
//! whatever the user entered is still there after a failure (or a success) and
//! can be resubmitted as is.
use super::types::{ReviewDraft, MAX_RATING};
use super::validate::ValidationError;
use crate::orchestrator::{SubmissionOrchestrator, SubmitOutcome};

/// Soft cap applied to the review text field.
pub const DEFAULT_MAX_REVIEW_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct ReviewForm {
    draft: ReviewDraft,
    max_chars: usize,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REVIEW_CHARS)
    }
}

impl ReviewForm {
    pub fn new(max_chars: usize) -> Self {
        Self {
            draft: ReviewDraft::default(),
            max_chars,
        }
    }

    /// Select a star. Values outside 1..=5 leave the draft unchanged.
    pub fn select_rating(&mut self, rating: u8) -> Result<(), ValidationError> {
        if rating == 0 || rating > MAX_RATING {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        self.draft.rating = rating;
        Ok(())
    }

    pub fn clear_rating(&mut self) {
        self.draft.rating = 0;
    }

    /// Replace the review text, keeping at most `max_chars` characters.
    pub fn set_text(&mut self, text: &str) {
        self.draft.text = text.chars().take(self.max_chars).collect();
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn submit(&self, orchestrator: &SubmissionOrchestrator) -> SubmitOutcome {
        orchestrator.submit(&self.draft)
    }
}

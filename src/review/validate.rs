use super::types::{ReviewDraft, ReviewSubmission, MAX_RATING};

/// Reasons a draft is refused before any collaborator is contacted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a star rating")]
    MissingRating,

    #[error("Please write a review")]
    EmptyText,

    #[error("Rating must be between 1 and {MAX_RATING} (got {0})")]
    RatingOutOfRange(u8),
}

/// Check a draft against the acceptance rules; the first failing rule wins.
///
/// The text is carried over untouched. Trimming happens when the record is
/// assembled for storage.
pub fn validate(draft: &ReviewDraft) -> Result<ReviewSubmission, ValidationError> {
    if draft.rating == 0 {
        return Err(ValidationError::MissingRating);
    }
    if draft.text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    if draft.rating > MAX_RATING {
        return Err(ValidationError::RatingOutOfRange(draft.rating));
    }
    Ok(ReviewSubmission::new_unchecked(
        draft.rating,
        draft.text.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_rating_is_rejected_first() {
        let err = validate(&ReviewDraft::new(0, "   ")).unwrap_err();
        assert_eq!(err, ValidationError::MissingRating);
        assert_eq!(err.to_string(), "Please select a star rating");
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        for text in ["", " ", "\n\t  "] {
            let err = validate(&ReviewDraft::new(3, text)).unwrap_err();
            assert_eq!(err, ValidationError::EmptyText, "text {text:?}");
        }
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let err = validate(&ReviewDraft::new(6, "ok")).unwrap_err();
        assert_eq!(err, ValidationError::RatingOutOfRange(6));
    }

    #[test]
    fn accepted_draft_keeps_text_as_entered() {
        for rating in 1..=MAX_RATING {
            let submission =
                validate(&ReviewDraft::new(rating, "  padded  ")).expect("valid draft");
            assert_eq!(submission.rating(), rating);
            assert_eq!(submission.text(), "  padded  ");
        }
    }
}

//! Review data model shared by the form, the orchestrator, and the stores.
use serde::{Deserialize, Serialize};

/// Highest selectable star rating.
pub const MAX_RATING: u8 = 5;

/// Raw values entered by the user; `rating == 0` means no star is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub text: String,
}

impl ReviewDraft {
    pub fn new(rating: u8, text: impl Into<String>) -> Self {
        Self {
            rating,
            text: text.into(),
        }
    }
}

/// A draft that passed validation. Only the validator constructs these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    rating: u8,
    text: String,
}

impl ReviewSubmission {
    pub(crate) fn new_unchecked(rating: u8, text: String) -> Self {
        Self { rating, text }
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// The review text exactly as entered (not trimmed).
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The three derived artifacts requested for every review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrichmentKind {
    #[serde(rename = "response")]
    Reply,
    #[serde(rename = "summary")]
    Summary,
    #[serde(rename = "actions")]
    RecommendedActions,
}

impl EnrichmentKind {
    /// Issue order used by the orchestrator.
    pub const ALL: [EnrichmentKind; 3] = [
        EnrichmentKind::Reply,
        EnrichmentKind::Summary,
        EnrichmentKind::RecommendedActions,
    ];

    /// Value of the `type` field in enrichment requests.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Reply => "response",
            Self::Summary => "summary",
            Self::RecommendedActions => "actions",
        }
    }
}

impl std::fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reply => write!(f, "reply"),
            Self::Summary => write!(f, "summary"),
            Self::RecommendedActions => write!(f, "recommended actions"),
        }
    }
}

/// The composite row written by a [`ReviewStore`](crate::store::ReviewStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedReview {
    pub rating: u8,
    #[serde(rename = "review")]
    pub text: String,
    #[serde(rename = "ai_response")]
    pub reply: Option<String>,
    #[serde(rename = "ai_summary")]
    pub summary: Option<String>,
    #[serde(rename = "ai_recommended_actions")]
    pub recommended_actions: Option<String>,
}

impl PersistedReview {
    /// Assemble the composite record from the three generated results.
    ///
    /// The review text is trimmed here; empty generated strings are stored as
    /// null.
    pub fn from_enrichment(
        submission: &ReviewSubmission,
        reply: String,
        summary: String,
        recommended_actions: String,
    ) -> Self {
        Self {
            rating: submission.rating(),
            text: submission.text().trim().to_string(),
            reply: non_empty(reply),
            summary: non_empty(summary),
            recommended_actions: non_empty(recommended_actions),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A persisted review read back from a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReview {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub review: PersistedReview,
}

/// Lifecycle of a single submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Enriching,
    Persisting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn is_in_flight(self) -> bool {
        self != Self::Idle
    }
}

//! Persistence for composite review records.
//!
//! A store receives the whole record in one call and writes it atomically;
//! there is no way to write part of a record.

mod rest;
mod sqlite;

pub use rest::RestReviewStore;
pub use sqlite::SqliteReviewStore;

use crate::review::{PersistedReview, StoredReview};

pub trait ReviewStore: Send + Sync {
    /// Write one composite record.
    fn persist(&self, review: &PersistedReview) -> Result<(), PersistenceError>;

    /// Most recently stored reviews, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<StoredReview>, PersistenceError>;
}

/// Errors that can occur while writing or reading reviews.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("store returned status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("store response could not be decoded: {0}")]
    Decode(String),
}

impl PersistenceError {
    /// Message suitable for the user, when one is available.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Sqlite(err) => Some(err.to_string()),
            Self::Io(err) => Some(err.to_string()),
            Self::Transport(message) => Some(message.clone()),
            Self::Status { message, .. } => message.clone(),
            Self::Decode(_) => None,
        }
    }
}

//! Local `SQLite` review table.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use super::{PersistenceError, ReviewStore};
use crate::review::{PersistedReview, StoredReview};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    review TEXT NOT NULL,
    ai_response TEXT,
    ai_summary TEXT,
    ai_recommended_actions TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

/// Reviews stored in a single `SQLite` file.
///
/// The connection sits behind a mutex so the store can be shared the same way
/// as the HTTP collaborators.
pub struct SqliteReviewStore {
    conn: Mutex<Connection>,
}

impl SqliteReviewStore {
    /// Opens (or creates) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Returns the default database path: `<data_dir>/review-enrich/reviews.sqlite`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("review-enrich").join("reviews.sqlite"))
    }

    fn with_connection(conn: Connection) -> Result<Self, PersistenceError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReviewStore for SqliteReviewStore {
    fn persist(&self, review: &PersistedReview) -> Result<(), PersistenceError> {
        self.conn().execute(
            "INSERT INTO reviews (rating, review, ai_response, ai_summary, ai_recommended_actions)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                review.rating,
                &review.text,
                &review.reply,
                &review.summary,
                &review.recommended_actions,
            ],
        )?;
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<StoredReview>, PersistenceError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT rating, review, ai_response, ai_summary, ai_recommended_actions, created_at
             FROM reviews ORDER BY id DESC LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map([limit], |row| {
            Ok(StoredReview {
                review: PersistedReview {
                    rating: row.get(0)?,
                    text: row.get(1)?,
                    reply: row.get(2)?,
                    summary: row.get(3)?,
                    recommended_actions: row.get(4)?,
                },
                created_at: row.get(5)?,
            })
        })?;
        let mut reviews = Vec::new();
        for row in rows {
            reviews.push(row?);
        }
        Ok(reviews)
    }
}

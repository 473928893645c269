//! Remote review table behind a PostgREST-style API.
//!
//! Inserts go to `POST <url>/rest/v1/<table>`; listing uses the same path
//! with `select`, `order` and `limit` query parameters.

use std::time::{Duration, Instant};

use super::{PersistenceError, ReviewStore};
use crate::review::{PersistedReview, StoredReview};
use crate::util::{message_from_body, truncate_string};

const SELECT_COLUMNS: &str =
    "rating,review,ai_response,ai_summary,ai_recommended_actions,created_at";

pub struct RestReviewStore {
    agent: ureq::Agent,
    base_url: String,
    table: String,
    api_key: Option<String>,
}

impl RestReviewStore {
    pub fn new(
        base_url: impl Into<String>,
        table: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into(),
            table: table.into(),
            api_key,
        }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }
}

fn transport(err: ureq::Error) -> PersistenceError {
    PersistenceError::Transport(err.to_string())
}

fn check_status(status: u16, body: &str) -> Result<(), PersistenceError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(PersistenceError::Status {
        status,
        message: message_from_body(body),
    })
}

impl ReviewStore for RestReviewStore {
    fn persist(&self, review: &PersistedReview) -> Result<(), PersistenceError> {
        let start = Instant::now();
        let mut request = self
            .agent
            .post(self.table_url())
            .header("Prefer", "return=minimal");
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key.as_str())
                .header("Authorization", format!("Bearer {key}"));
        }
        let mut response = request.send_json(review).map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(transport)?;
        tracing::info!(
            table = %self.table,
            status,
            elapsed_ms = start.elapsed().as_millis(),
            "review insert complete"
        );
        check_status(status, &body)
    }

    fn recent(&self, limit: usize) -> Result<Vec<StoredReview>, PersistenceError> {
        let mut request = self
            .agent
            .get(self.table_url())
            .query("select", SELECT_COLUMNS)
            .query("order", "created_at.desc")
            .query("limit", limit.to_string());
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key.as_str())
                .header("Authorization", format!("Bearer {key}"));
        }
        let mut response = request.call().map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(transport)?;
        check_status(status, &body)?;
        serde_json::from_str(&body).map_err(|err| {
            PersistenceError::Decode(format!("{err}; body: {}", truncate_string(&body, 200)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn store(url: &str) -> RestReviewStore {
        RestReviewStore::new(
            format!("{url}/"),
            "reviews",
            Some("service-key".to_string()),
            Duration::from_secs(5),
        )
    }

    fn sample() -> PersistedReview {
        PersistedReview {
            rating: 4,
            text: "fine".into(),
            reply: Some("Thanks".into()),
            summary: None,
            recommended_actions: Some("- nothing".into()),
        }
    }

    #[test]
    fn persist_inserts_one_row() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/rest/v1/reviews")
            .match_header("prefer", "return=minimal")
            .match_header("apikey", "service-key")
            .match_body(Matcher::Json(serde_json::json!({
                "rating": 4,
                "review": "fine",
                "ai_response": "Thanks",
                "ai_summary": null,
                "ai_recommended_actions": "- nothing"
            })))
            .with_status(201)
            .create();

        store(&server.url()).persist(&sample()).expect("persist review");
        mock.assert();
    }

    #[test]
    fn rejected_insert_surfaces_message() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/rest/v1/reviews")
            .with_status(400)
            .with_body(
                r#"{"code": "42501", "message": "new row violates row-level security policy"}"#,
            )
            .create();

        let err = store(&server.url()).persist(&sample()).unwrap_err();
        mock.assert();
        assert!(matches!(err, PersistenceError::Status { status: 400, .. }));
        assert_eq!(
            err.user_message().as_deref(),
            Some("new row violates row-level security policy")
        );
    }

    #[test]
    fn recent_queries_newest_rows() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/v1/reviews")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), SELECT_COLUMNS.into()),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .match_header("apikey", "service-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"rating": 5, "review": "Great service!", "ai_response": "R",
                     "ai_summary": "S", "ai_recommended_actions": "A",
                     "created_at": "2026-10-19T08:00:00Z"}]"#,
            )
            .create();

        let reviews = store(&server.url()).recent(5).expect("list reviews");
        mock.assert();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].review.text, "Great service!");
        assert_eq!(reviews[0].created_at.as_deref(), Some("2026-10-19T08:00:00Z"));
    }
}

//! Remote text-generation endpoint client.
//!
//! Every enrichment kind hits the same endpoint; the `type` field selects what
//! is generated:
//!
//! ```text
//! POST <url>
//! {"text": "...", "rating": 4, "type": "response" | "summary" | "actions"}
//!
//! 200 {"result": "..."}
//! 4xx/5xx {"error": "..."}
//! ```

use super::{EnrichmentClient, EnrichmentError};
use crate::review::EnrichmentKind;
use crate::util::{message_from_body, truncate_string};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Serialize)]
struct EnrichRequest<'a> {
    text: &'a str,
    rating: u8,
    #[serde(rename = "type")]
    kind: EnrichmentKind,
}

#[derive(Debug, Deserialize)]
struct EnrichResponse {
    #[serde(default)]
    result: Option<String>,
}

pub struct HttpEnrichmentClient {
    agent: ureq::Agent,
    url: String,
    api_key: Option<String>,
}

impl HttpEnrichmentClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            url: url.into(),
            api_key,
        }
    }
}

impl EnrichmentClient for HttpEnrichmentClient {
    fn enrich(
        &self,
        text: &str,
        rating: u8,
        kind: EnrichmentKind,
    ) -> Result<String, EnrichmentError> {
        let start = Instant::now();
        let transport = |err: ureq::Error| EnrichmentError::Transport {
            kind,
            message: err.to_string(),
        };

        let mut request = self.agent.post(self.url.as_str());
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key.as_str())
                .header("Authorization", format!("Bearer {key}"));
        }
        let mut response = request
            .send_json(&EnrichRequest { text, rating, kind })
            .map_err(transport)?;
        let status = response.status();
        let body = response.body_mut().read_to_string().map_err(transport)?;

        tracing::info!(
            kind = kind.wire_name(),
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            response_bytes = body.len(),
            "enrichment request complete"
        );

        if !status.is_success() {
            return Err(EnrichmentError::Status {
                kind,
                status: status.as_u16(),
                message: message_from_body(&body),
            });
        }

        let parsed: EnrichResponse =
            serde_json::from_str(&body).map_err(|err| EnrichmentError::Decode {
                kind,
                message: format!("{err}; body: {}", truncate_string(&body, 200)),
            })?;
        Ok(parsed.result.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(url: &str, api_key: Option<&str>) -> HttpEnrichmentClient {
        HttpEnrichmentClient::new(url, api_key.map(str::to_string), Duration::from_secs(5))
    }

    #[test]
    fn posts_text_rating_and_type() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_header("apikey", "anon-key")
            .match_header("authorization", "Bearer anon-key")
            .match_body(Matcher::Json(serde_json::json!({
                "text": "Great service!",
                "rating": 5,
                "type": "response"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result": "Thanks for visiting!"}"#)
            .create();

        let result = client(&server.url(), Some("anon-key"))
            .enrich("Great service!", 5, EnrichmentKind::Reply)
            .expect("enrich reply");
        assert_eq!(result, "Thanks for visiting!");
        mock.assert();
    }

    #[test]
    fn missing_result_is_an_empty_string() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .match_header("apikey", Matcher::Missing)
            .match_body(Matcher::PartialJson(serde_json::json!({"type": "summary"})))
            .with_status(200)
            .with_body(r#"{"result": null}"#)
            .create();

        let result = client(&server.url(), None)
            .enrich("fine", 3, EnrichmentKind::Summary)
            .expect("enrich summary");
        assert_eq!(result, "");
        mock.assert();
    }

    #[test]
    fn error_status_carries_service_message() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .with_status(500)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .create();

        let err = client(&server.url(), None)
            .enrich("fine", 3, EnrichmentKind::RecommendedActions)
            .unwrap_err();
        mock.assert();
        match &err {
            EnrichmentError::Status { kind, status, .. } => {
                assert_eq!(*kind, EnrichmentKind::RecommendedActions);
                assert_eq!(*status, 500);
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(err.user_message(), Some("Rate limit exceeded"));
    }

    #[test]
    fn undecodable_body_has_no_user_message() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("not json")
            .create();

        let err = client(&server.url(), None)
            .enrich("fine", 3, EnrichmentKind::Reply)
            .unwrap_err();
        mock.assert();
        assert!(matches!(err, EnrichmentError::Decode { .. }));
        assert_eq!(err.user_message(), None);
    }

    #[test]
    fn unreachable_endpoint_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
        let addr = listener.local_addr().expect("free port address");
        drop(listener);

        let err = client(&format!("http://{addr}"), None)
            .enrich("fine", 3, EnrichmentKind::Reply)
            .unwrap_err();
        assert!(matches!(err, EnrichmentError::Transport { .. }));
        assert!(err.user_message().is_some());
    }
}

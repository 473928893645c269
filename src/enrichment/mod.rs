//! Text-generation collaborators that produce the reply, summary, and
//! recommended actions for a review.
//!
//! Two backends are provided:
//!
//! - [`HttpEnrichmentClient`] posts `{text, rating, type}` to a remote
//!   endpoint and reads `{result}` back.
//! - [`CommandEnrichmentClient`] pipes a rendered prompt into a local LM
//!   command and reads the generated text from stdout.
//!
//! Neither retries. Each call yields exactly one success or one failure.

mod command;
mod http;

pub use command::CommandEnrichmentClient;
pub use http::HttpEnrichmentClient;

use crate::review::EnrichmentKind;

/// Produces one piece of derived content for a review.
pub trait EnrichmentClient: Send + Sync {
    fn enrich(&self, text: &str, rating: u8, kind: EnrichmentKind)
        -> Result<String, EnrichmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("{kind} request failed: {message}")]
    Transport {
        kind: EnrichmentKind,
        message: String,
    },

    #[error("{kind} service returned status {status}")]
    Status {
        kind: EnrichmentKind,
        status: u16,
        message: Option<String>,
    },

    #[error("{kind} response could not be decoded: {message}")]
    Decode {
        kind: EnrichmentKind,
        message: String,
    },

    #[error("{kind} command failed: {message}")]
    Command {
        kind: EnrichmentKind,
        message: String,
    },
}

impl EnrichmentError {
    pub fn kind(&self) -> EnrichmentKind {
        match self {
            Self::Transport { kind, .. }
            | Self::Status { kind, .. }
            | Self::Decode { kind, .. }
            | Self::Command { kind, .. } => *kind,
        }
    }

    /// Message suitable for the user, when the collaborator supplied one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Transport { message, .. } | Self::Command { message, .. } => Some(message),
            Self::Status { message, .. } => message.as_deref(),
            Self::Decode { .. } => None,
        }
    }
}

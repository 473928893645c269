//! Local LM command client.
//!
//! Runs a user-configured command once per enrichment kind, writing a
//! kind-specific prompt to its stdin and reading the generated text from its
//! stdout. Any tool that turns text into text works (`llm`, `ollama run`,
//! custom scripts).
//!
//! # Protocol
//!
//! - The command line is split with shell quoting rules.
//! - `REVIEW_ENRICH_KIND` is set to `response`, `summary` or `actions`.
//! - stdout is either the generated text or a JSON object `{"result": ...}`.
//! - A non-zero exit status fails the call with the trimmed stderr.

use super::{EnrichmentClient, EnrichmentError};
use crate::review::EnrichmentKind;
use crate::util::truncate_string;
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Environment variable telling the command which artifact is requested.
pub const KIND_ENV_VAR: &str = "REVIEW_ENRICH_KIND";

const MAX_STDERR_BYTES: usize = 500;

// Prompt templates loaded at compile time
const REPLY_PROMPT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/reply.md"));
const SUMMARY_PROMPT: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/summary.md"));
const ACTIONS_PROMPT: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/actions.md"));

#[derive(Debug, Clone)]
pub struct CommandEnrichmentClient {
    command: String,
}

impl CommandEnrichmentClient {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl EnrichmentClient for CommandEnrichmentClient {
    fn enrich(
        &self,
        text: &str,
        rating: u8,
        kind: EnrichmentKind,
    ) -> Result<String, EnrichmentError> {
        let prompt = build_prompt(kind, text, rating);
        let stdout = invoke_command(&self.command, &prompt, kind).map_err(|message| {
            EnrichmentError::Command { kind, message }
        })?;
        Ok(parse_response(&stdout))
    }
}

fn build_prompt(kind: EnrichmentKind, text: &str, rating: u8) -> String {
    let template = match kind {
        EnrichmentKind::Reply => REPLY_PROMPT,
        EnrichmentKind::Summary => SUMMARY_PROMPT,
        EnrichmentKind::RecommendedActions => ACTIONS_PROMPT,
    };
    template
        .replace("{rating}", &rating.to_string())
        .replace("{review}", text.trim())
}

/// Run the command with the prompt on stdin and return its stdout.
fn invoke_command(command: &str, prompt: &str, kind: EnrichmentKind) -> Result<String, String> {
    let args =
        shell_words::split(command).map_err(|err| format!("parse LM command {command:?}: {err}"))?;
    let Some((program, rest)) = args.split_first() else {
        return Err("LM command is empty".to_string());
    };

    let start = Instant::now();
    let mut child = Command::new(program)
        .args(rest)
        .env(KIND_ENV_VAR, kind.wire_name())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("spawn LM command {program}: {err}"))?;

    // A command that never reads stdin may already be gone; its exit status
    // decides the outcome.
    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(prompt.as_bytes()) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
            Err(err) => return Err(format!("write prompt to LM stdin: {err}")),
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|err| format!("wait for LM command: {err}"))?;

    tracing::info!(
        kind = kind.wire_name(),
        elapsed_ms = start.elapsed().as_millis(),
        prompt_bytes = prompt.len(),
        response_bytes = output.stdout.len(),
        "lm invoke complete"
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "LM command failed with {}: {}",
            output.status,
            truncate_string(stderr.trim(), MAX_STDERR_BYTES)
        ));
    }

    String::from_utf8(output.stdout).map_err(|err| format!("decode LM stdout as UTF-8: {err}"))
}

/// Accept either raw generated text or a `{"result": ...}` envelope.
fn parse_response(stdout: &str) -> String {
    let text = stdout.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        if let Some(result) = map.get("result") {
            return result.as_str().unwrap_or_default().trim().to_string();
        }
    }
    text.to_string()
}

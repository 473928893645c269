//! Application configuration.
//!
//! The config is a small schema-versioned JSON file selecting the enrichment
//! backend and the review store:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "enrichment": { "backend": "command", "command": "llm -m gpt-4o-mini" },
//!   "store": { "backend": "sqlite", "path": null },
//!   "max_review_chars": 500
//! }
//! ```
//!
//! A missing file means the defaults. Secrets can stay out of the file:
//! API keys fall back to `REVIEW_ENRICH_API_KEY` / `REVIEW_STORE_API_KEY`, and
//! the LM command resolves in priority order:
//! 1. `--enrich-command` CLI flag
//! 2. `enrichment.command` in the config file
//! 3. `REVIEW_ENRICH_COMMAND` environment variable
use crate::enrichment::{CommandEnrichmentClient, EnrichmentClient, HttpEnrichmentClient};
use crate::review::DEFAULT_MAX_REVIEW_CHARS;
use crate::store::{RestReviewStore, ReviewStore, SqliteReviewStore};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Current schema version for `config.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

pub const ENRICH_COMMAND_ENV: &str = "REVIEW_ENRICH_COMMAND";
pub const ENRICH_API_KEY_ENV: &str = "REVIEW_ENRICH_API_KEY";
pub const STORE_API_KEY_ENV: &str = "REVIEW_STORE_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TABLE: &str = "reviews";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub schema_version: u32,
    pub enrichment: EnrichmentConfig,
    pub store: StoreConfig,
    #[serde(default = "default_max_review_chars")]
    pub max_review_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum EnrichmentConfig {
    Http {
        url: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Command {
        #[serde(default)]
        command: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    Sqlite {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Rest {
        url: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_table")]
        table: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

fn default_max_review_chars() -> usize {
    DEFAULT_MAX_REVIEW_CHARS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

/// Build the default config: local LM command and a local `SQLite` store.
pub fn default_config() -> AppConfig {
    AppConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        enrichment: EnrichmentConfig::Command { command: None },
        store: StoreConfig::Sqlite { path: None },
        max_review_chars: DEFAULT_MAX_REVIEW_CHARS,
    }
}

/// Render a pretty JSON config stub for `init`.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&default_config()).context("serialize config stub")
}

/// Returns the default config path: `<config_dir>/review-enrich/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("review-enrich").join("config.json"))
}

/// Resolve the config path from the CLI flag or the platform default.
pub fn resolve_config_path(flag: Option<&Path>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path()
            .ok_or_else(|| anyhow!("no config directory available; pass --config")),
    }
}

/// Load and validate the config, falling back to defaults when the file is
/// missing.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "config not found; using defaults");
        return Ok(default_config());
    }
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: AppConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Persist a config to disk in a stable JSON format.
pub fn write_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.max_review_chars == 0 {
        return Err(anyhow!("max_review_chars must be greater than zero"));
    }
    match &config.enrichment {
        EnrichmentConfig::Http {
            url, timeout_secs, ..
        } => {
            validate_url(url, "enrichment.url")?;
            validate_timeout(*timeout_secs, "enrichment.timeout_secs")?;
        }
        EnrichmentConfig::Command { command } => {
            if command.as_deref().is_some_and(|c| c.trim().is_empty()) {
                return Err(anyhow!("enrichment.command must be non-empty when set"));
            }
        }
    }
    match &config.store {
        StoreConfig::Sqlite { .. } => {}
        StoreConfig::Rest {
            url,
            table,
            timeout_secs,
            ..
        } => {
            validate_url(url, "store.url")?;
            validate_timeout(*timeout_secs, "store.timeout_secs")?;
            if table.trim().is_empty() {
                return Err(anyhow!("store.table must be non-empty"));
            }
        }
    }
    Ok(())
}

fn validate_url(url: &str, label: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(anyhow!("{label} must be non-empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(anyhow!("{label} must be an http(s) URL (got {url:?})"));
    }
    Ok(())
}

fn validate_timeout(secs: u64, label: &str) -> Result<()> {
    if secs == 0 {
        return Err(anyhow!("{label} must be greater than zero"));
    }
    Ok(())
}

/// Resolve the LM command: CLI flag, then config, then environment.
pub fn resolve_enrich_command(
    flag: Option<&str>,
    configured: Option<&str>,
    env_value: Option<String>,
) -> Result<String> {
    [flag.map(str::to_string), configured.map(str::to_string), env_value]
        .into_iter()
        .flatten()
        .map(|command| command.trim().to_string())
        .find(|command| !command.is_empty())
        .ok_or_else(|| {
            anyhow!(
                "no LM command configured; pass --enrich-command, set enrichment.command, or set {ENRICH_COMMAND_ENV}"
            )
        })
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Build the enrichment backend described by the config.
pub fn build_enricher(
    config: &AppConfig,
    command_flag: Option<&str>,
) -> Result<Box<dyn EnrichmentClient>> {
    match &config.enrichment {
        EnrichmentConfig::Http {
            url,
            api_key,
            timeout_secs,
        } => {
            if command_flag.is_some() {
                tracing::warn!("--enrich-command ignored: enrichment backend is http");
            }
            let api_key = api_key.clone().or_else(|| env_var(ENRICH_API_KEY_ENV));
            Ok(Box::new(HttpEnrichmentClient::new(
                url.trim(),
                api_key,
                Duration::from_secs(*timeout_secs),
            )))
        }
        EnrichmentConfig::Command { command } => {
            let command = resolve_enrich_command(
                command_flag,
                command.as_deref(),
                env_var(ENRICH_COMMAND_ENV),
            )?;
            Ok(Box::new(CommandEnrichmentClient::new(command)))
        }
    }
}

/// Open the review store described by the config.
pub fn build_store(config: &AppConfig) -> Result<Box<dyn ReviewStore>> {
    match &config.store {
        StoreConfig::Sqlite { path } => {
            let path = match path {
                Some(path) => path.clone(),
                None => SqliteReviewStore::default_path()
                    .ok_or_else(|| anyhow!("no data directory available; set store.path"))?,
            };
            let store = SqliteReviewStore::open(&path)
                .with_context(|| format!("open review database {}", path.display()))?;
            Ok(Box::new(store))
        }
        StoreConfig::Rest {
            url,
            api_key,
            table,
            timeout_secs,
        } => {
            let api_key = api_key.clone().or_else(|| env_var(STORE_API_KEY_ENV));
            Ok(Box::new(RestReviewStore::new(
                url.trim(),
                table.trim(),
                api_key,
                Duration::from_secs(*timeout_secs),
            )))
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

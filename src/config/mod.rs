//! Configuration module for castpress.
//!
//! Configuration is loaded once at startup from a YAML file and/or
//! environment variables. Priority: YAML > ENV vars > .env values > defaults.
//! Missing or empty *required* values (API key, podcast id, voice mapping)
//! are rejected here, before the pipeline runs, so a misconfigured process
//! never reaches the network.
//!
//! # Example
//! ```rust,no_run
//! use castpress::config::AppConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = AppConfig::from_env()?;
//!
//! // Load from YAML file with environment variable fallback
//! let config = AppConfig::from_file(Path::new("castpress.yaml"))?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::synthesis::{
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    LISTENHUB_API_BASE,
};

// =============================================================================
// Environment variable names
// =============================================================================

/// ListenHub API key.
pub const ENV_API_KEY: &str = "CASTPRESS_API_KEY";
/// Target podcast identifier on the hosting platform.
pub const ENV_PODCAST_ID: &str = "CASTPRESS_PODCAST_ID";
/// Override for the ListenHub API base URL.
pub const ENV_API_BASE_URL: &str = "CASTPRESS_API_BASE_URL";
/// Voice used when the CLI does not name one.
pub const ENV_DEFAULT_VOICE: &str = "CASTPRESS_DEFAULT_VOICE";
/// Voice mapping as `name=speakerId` pairs separated by commas.
pub const ENV_VOICES: &str = "CASTPRESS_VOICES";
/// Directory where downloaded audio artifacts are written.
pub const ENV_OUTPUT_DIR: &str = "CASTPRESS_OUTPUT_DIR";
/// Directory holding the persisted browser session for the publish driver.
pub const ENV_SESSION_DIR: &str = "CASTPRESS_SESSION_DIR";
/// Publish driver invocation (program followed by arguments, whitespace split).
pub const ENV_PUBLISH_COMMAND: &str = "CASTPRESS_PUBLISH_COMMAND";
/// Seconds between synthesis job status polls.
pub const ENV_POLL_INTERVAL_SECS: &str = "CASTPRESS_POLL_INTERVAL_SECS";
/// Total polling budget in seconds before a job is abandoned.
pub const ENV_POLL_TIMEOUT_SECS: &str = "CASTPRESS_POLL_TIMEOUT_SECS";
/// Per-request HTTP timeout in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CASTPRESS_REQUEST_TIMEOUT_SECS";

/// Default publish driver program looked up on `PATH`.
pub const DEFAULT_PUBLISH_PROGRAM: &str = "castpress-publish";

/// Default artifact output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "episodes";

/// Default persisted browser session directory.
pub const DEFAULT_SESSION_DIR: &str = ".castpress/browser";

// =============================================================================
// Errors
// =============================================================================

/// Configuration failures. All of these are pre-flight and fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is absent or empty.
    #[error("missing required configuration value: {0}")]
    MissingValue(&'static str),

    /// A value is present but unusable.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    /// A voice name is not present in the mapping.
    #[error("unknown voice '{name}'; configured voices: {available:?}")]
    UnknownVoice {
        name: String,
        available: Vec<String>,
    },

    /// A voice name resolves to an empty speaker id.
    #[error("voice '{0}' is mapped to an empty speaker id; fill in the id from the provider console")]
    EmptySpeakerId(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected shape.
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

// =============================================================================
// YAML file shape
// =============================================================================

/// Publish driver section of the YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
struct PublishFileConfig {
    program: Option<String>,
    #[serde(default)]
    args: Vec<String>,
}

/// Polling section of the YAML file.
#[derive(Debug, Clone, Default, Deserialize)]
struct PollingFileConfig {
    interval_secs: Option<u64>,
    timeout_secs: Option<u64>,
}

/// Raw deserialized YAML configuration. Every field is optional here;
/// requiredness is enforced by [`AppConfig::validate`] after merging.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    podcast_id: Option<String>,
    api_base_url: Option<String>,
    default_voice: Option<String>,
    #[serde(default)]
    voices: HashMap<String, String>,
    output_dir: Option<PathBuf>,
    session_dir: Option<PathBuf>,
    #[serde(default)]
    publish: PublishFileConfig,
    #[serde(default)]
    polling: PollingFileConfig,
    request_timeout_secs: Option<u64>,
}

// =============================================================================
// AppConfig
// =============================================================================

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// ListenHub API key (required).
    pub api_key: String,
    /// Podcast identifier the publish driver targets (required).
    pub podcast_id: String,
    /// ListenHub API base URL.
    pub api_base_url: String,
    /// Voice used when the CLI does not name one.
    pub default_voice: Option<String>,
    /// Voice name to provider speakerId mapping (required, non-empty).
    pub voices: HashMap<String, String>,
    /// Directory where downloaded audio artifacts land.
    pub output_dir: PathBuf,
    /// Persisted browser session directory for the publish driver.
    pub session_dir: PathBuf,
    /// Publish driver program.
    pub publish_program: String,
    /// Extra arguments passed to the publish driver before the request args.
    pub publish_args: Vec<String>,
    /// Seconds between job status polls.
    pub poll_interval_secs: u64,
    /// Total polling budget in seconds.
    pub poll_timeout_secs: u64,
    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::base_from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to environment
    /// variables for values the file omits.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config = Self::base_from_env()?;
        config.apply_file(file);
        config.validate()?;
        Ok(config)
    }

    /// Environment-derived configuration with defaults, not yet validated.
    fn base_from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: env_string(ENV_API_KEY),
            podcast_id: env_string(ENV_PODCAST_ID),
            api_base_url: env_opt(ENV_API_BASE_URL)
                .unwrap_or_else(|| LISTENHUB_API_BASE.to_string()),
            default_voice: env_opt(ENV_DEFAULT_VOICE),
            voices: parse_voice_pairs(&env_string(ENV_VOICES))?,
            output_dir: env_opt(ENV_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            session_dir: env_opt(ENV_SESSION_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR)),
            publish_program: publish_command_program(),
            publish_args: publish_command_args(),
            poll_interval_secs: env_u64(ENV_POLL_INTERVAL_SECS, DEFAULT_POLL_INTERVAL_SECS)?,
            poll_timeout_secs: env_u64(ENV_POLL_TIMEOUT_SECS, DEFAULT_POLL_TIMEOUT_SECS)?,
            request_timeout_secs: env_u64(
                ENV_REQUEST_TIMEOUT_SECS,
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
        })
    }

    /// Overlay file values onto the environment-derived base. File wins.
    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.api_key {
            self.api_key = v;
        }
        if let Some(v) = file.podcast_id {
            self.podcast_id = v;
        }
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.default_voice {
            self.default_voice = Some(v);
        }
        if !file.voices.is_empty() {
            self.voices = file.voices;
        }
        if let Some(v) = file.output_dir {
            self.output_dir = v;
        }
        if let Some(v) = file.session_dir {
            self.session_dir = v;
        }
        if let Some(v) = file.publish.program {
            self.publish_program = v;
            self.publish_args = file.publish.args;
        }
        if let Some(v) = file.polling.interval_secs {
            self.poll_interval_secs = v;
        }
        if let Some(v) = file.polling.timeout_secs {
            self.poll_timeout_secs = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
    }

    /// Reject configurations the pipeline could only fail on later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingValue("api_key"));
        }
        if self.podcast_id.trim().is_empty() {
            return Err(ConfigError::MissingValue("podcast_id"));
        }
        if self.voices.is_empty() {
            return Err(ConfigError::MissingValue("voices"));
        }
        if self.publish_program.trim().is_empty() {
            return Err(ConfigError::MissingValue("publish.program"));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.poll_timeout_secs < self.poll_interval_secs {
            return Err(ConfigError::InvalidValue {
                field: "polling.timeout_secs",
                reason: format!(
                    "timeout ({}s) must be at least the polling interval ({}s)",
                    self.poll_timeout_secs, self.poll_interval_secs
                ),
            });
        }
        if let Some(name) = &self.default_voice {
            if !self.voices.contains_key(name) {
                return Err(ConfigError::InvalidValue {
                    field: "default_voice",
                    reason: format!("'{name}' is not present in the voice mapping"),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn env_string(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn env_opt(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn env_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env_opt(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: name,
            reason: format!("'{raw}' is not a non-negative integer"),
        }),
    }
}

/// Parse `name=speakerId` pairs separated by commas.
fn parse_voice_pairs(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut voices = HashMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((name, id)) if !name.trim().is_empty() => {
                voices.insert(name.trim().to_string(), id.trim().to_string());
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: ENV_VOICES,
                    reason: format!("expected 'name=speakerId', got '{pair}'"),
                });
            }
        }
    }
    Ok(voices)
}

fn publish_command_program() -> String {
    match env_opt(ENV_PUBLISH_COMMAND) {
        Some(raw) => raw
            .split_whitespace()
            .next()
            .unwrap_or(DEFAULT_PUBLISH_PROGRAM)
            .to_string(),
        None => DEFAULT_PUBLISH_PROGRAM.to_string(),
    }
}

fn publish_command_args() -> Vec<String> {
    match env_opt(ENV_PUBLISH_COMMAND) {
        Some(raw) => raw.split_whitespace().skip(1).map(String::from).collect(),
        None => Vec::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================

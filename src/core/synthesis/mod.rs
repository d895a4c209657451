//! ListenHub speech synthesis client.
//!
//! This module integrates the ListenHub OpenAPI speech endpoint: a creation
//! call submits script text for a given speaker, a status call reports job
//! progress, and a plain file fetch retrieves the finished audio. The
//! submodules follow the provider convention used across this codebase:
//!
//! - [`config`]: validated client configuration with builder methods
//! - [`messages`]: request/response wire types
//! - [`client`]: the HTTP client with submit/poll/download operations
//!
//! # Authentication
//!
//! Every API call except the audio fetch (result URLs are pre-signed) sends
//! `Authorization: Bearer <api_key>`.
//!
//! # Example
//!
//! ```rust,ignore
//! use castpress::core::synthesis::{SynthesisClient, SynthesisConfig};
//!
//! let config = SynthesisConfig::new("lh_sk_...");
//! let client = SynthesisClient::new(config)?;
//! let artifact = client
//!     .synthesize_to_file("Hello, world!", "voice-123", "episode.mp3".as_ref())
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod messages;

pub use client::{AudioArtifact, SubmitOutcome, SynthesisClient, SynthesisError};
pub use config::SynthesisConfig;
pub use messages::{JobStatus, SpeechData, SpeechEnvelope, TaskStatusResponse};

// =============================================================================
// API Constants
// =============================================================================

/// ListenHub OpenAPI base URL.
pub const LISTENHUB_API_BASE: &str = "https://api.marswave.ai/openapi/v1";

/// Speech creation endpoint path, relative to the base URL.
pub const SPEECH_PATH: &str = "/speech";

/// Task status endpoint path prefix; the job id is appended.
pub const TASK_PATH: &str = "/task";

/// Health probe endpoint path used by connection checks.
pub const HEALTH_PATH: &str = "/health";

// =============================================================================
// Polling defaults
// =============================================================================

/// Default seconds between job status polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default total polling budget in seconds before a job is abandoned.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 300;

/// Default per-request HTTP timeout in seconds.
///
/// Generous because the creation call may answer synchronously with the
/// finished audio URL for short scripts.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

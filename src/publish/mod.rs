//! Publishing agent interface.
//!
//! Uploading a finished episode means driving a browser against the hosting
//! platform's studio UI: logging in (manually, on first run), selecting the
//! audio file, filling in metadata and submitting. The pipeline does not do
//! any of that itself; it talks to a [`Publisher`] and ships a
//! [`DriverPublisher`] that delegates the browser work to an external
//! automation driver process holding a persisted [`SessionStore`].
//!
//! A publish call may block for an extended, human-in-the-loop duration and
//! carries no timeout. It may also fail when the platform UI changed in ways
//! the driver cannot detect; that failure is surfaced, never retried.

pub mod driver;
pub mod session;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use driver::DriverPublisher;
pub use session::SessionStore;

// =============================================================================
// Limits
// =============================================================================

/// Maximum episode description length accepted by the hosting platform.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

// =============================================================================
// Errors
// =============================================================================

/// Failures of the publishing agent. Fatal per run; commonly require manual
/// intervention such as re-authenticating in the driven browser.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The driver process could not be started.
    #[error("failed to spawn publish driver '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The driver ran but reported failure.
    #[error("publish driver exited unsuccessfully ({status})")]
    Driver { status: String },

    /// The session store directory could not be prepared or removed.
    #[error("session store error at {path}: {source}")]
    Session {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// PublishRequest
// =============================================================================

/// One episode upload, consumed exactly once. No retry state survives the
/// process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    /// Podcast the episode is created under.
    pub podcast_id: String,
    /// Local path of the finished audio artifact.
    pub audio_path: PathBuf,
    /// Episode title.
    pub title: String,
    /// Episode description (show notes), already truncated to
    /// [`MAX_DESCRIPTION_CHARS`].
    pub description: String,
}

impl PublishRequest {
    /// Builds a request, truncating the description to the platform limit on
    /// a character boundary.
    pub fn new(
        podcast_id: impl Into<String>,
        audio_path: impl Into<PathBuf>,
        title: impl Into<String>,
        description: &str,
    ) -> Self {
        Self {
            podcast_id: podcast_id.into(),
            audio_path: audio_path.into(),
            title: title.into(),
            description: truncate_chars(description, MAX_DESCRIPTION_CHARS),
        }
    }
}

/// Character-boundary-safe truncation (byte slicing would split multi-byte
/// text).
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

// =============================================================================
// Publisher trait
// =============================================================================

/// The capability the pipeline needs from a publishing agent.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Uploads one episode. May block indefinitely awaiting manual login.
    async fn publish(&self, request: &PublishRequest) -> Result<(), PublishError>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_keeps_short_description() {
        let request = PublishRequest::new("pod-1", "/tmp/a.mp3", "Ep1", "short notes");
        assert_eq!(request.description, "short notes");
    }

    #[test]
    fn test_request_truncates_long_description() {
        let long = "x".repeat(MAX_DESCRIPTION_CHARS + 100);
        let request = PublishRequest::new("pod-1", "/tmp/a.mp3", "Ep1", &long);
        assert_eq!(request.description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_request_truncates_on_char_boundary() {
        // Multi-byte characters: truncation must count chars, not bytes.
        let long = "好".repeat(MAX_DESCRIPTION_CHARS + 1);
        let request = PublishRequest::new("pod-1", "/tmp/a.mp3", "Ep1", &long);
        assert_eq!(request.description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(request.description.chars().all(|c| c == '好'));
    }

    #[test]
    fn test_truncate_exact_limit_untouched() {
        let exact = "y".repeat(MAX_DESCRIPTION_CHARS);
        assert_eq!(truncate_chars(&exact, MAX_DESCRIPTION_CHARS), exact);
    }
}

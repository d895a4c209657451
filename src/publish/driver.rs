//! External browser-automation driver publisher.
//!
//! Locating upload controls inside a third-party studio UI is the most
//! brittle part of this system and lives outside the crate: an external
//! driver (typically a Playwright script) receives the episode metadata and
//! the session directory on its command line and performs the UI steps. The
//! driver anchors interactive elements by nearby text, not pixel offsets, so
//! platform-specific selector lookups can be substituted without touching
//! this crate.
//!
//! Contract with the driver process:
//!
//! ```text
//! <program> [configured args...] \
//!     --session-dir <dir> --podcast-id <id> \
//!     --audio <file> --title <title> --description <text>
//! ```
//!
//! Exit status 0 means the episode was submitted; anything else is a
//! [`PublishError::Driver`]. Stdio is inherited so the operator can follow
//! the driver's progress and complete a manual login when asked.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use super::session::SessionStore;
use super::{PublishError, PublishRequest, Publisher};

/// Publishes episodes by spawning the configured driver process.
#[derive(Debug)]
pub struct DriverPublisher {
    program: String,
    args: Vec<String>,
    session: SessionStore,
}

impl DriverPublisher {
    /// Creates a publisher around a driver program and a session store.
    pub fn new(program: impl Into<String>, session: SessionStore) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            session,
        }
    }

    /// Adds fixed arguments placed before the per-request arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The driver program this publisher spawns.
    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Publisher for DriverPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<(), PublishError> {
        let first_run = self.session.ensure()?;
        if first_run {
            warn!(
                "no persisted session found; the driver will ask for a manual login in the \
                 opened browser"
            );
        }

        info!(
            program = %self.program,
            audio = %request.audio_path.display(),
            title = %request.title,
            "launching publish driver (no timeout applies to this step)"
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg("--session-dir")
            .arg(self.session.path())
            .arg("--podcast-id")
            .arg(&request.podcast_id)
            .arg("--audio")
            .arg(&request.audio_path)
            .arg("--title")
            .arg(&request.title)
            .arg("--description")
            .arg(&request.description)
            .status()
            .await
            .map_err(|source| PublishError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            info!("publish driver reported success");
            Ok(())
        } else {
            Err(PublishError::Driver {
                status: status.to_string(),
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

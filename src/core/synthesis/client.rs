//! ListenHub speech synthesis HTTP client.
//!
//! One synthesis job moves through a small state machine:
//!
//! ```text
//! submit() ──▶ accepted (taskId) ──▶ poll_until_done() ──▶ succeeded ──▶ download()
//!     │                                      │
//!     └──▶ completed synchronously ──────────┼──────────────────────────▶ download()
//!                                            └──▶ failed / timeout ──▶ error
//! ```
//!
//! Polling is a cooperative fixed-interval wait (`tokio::time::sleep`); there
//! is exactly one job in flight per pipeline run, so no scheduling machinery
//! is needed. Polling stops at the first terminal status observed and never
//! issues another status call afterwards.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use super::config::SynthesisConfig;
use super::messages::{ApiErrorBody, CreateSpeechRequest, JobStatus, SpeechEnvelope, TaskStatusResponse};
use super::{HEALTH_PATH, SPEECH_PATH, TASK_PATH};

// =============================================================================
// Errors
// =============================================================================

/// Failures of the synthesis client. All abort the current run.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Client-side configuration problem, caught before any network call.
    #[error("invalid synthesis configuration: {0}")]
    InvalidConfiguration(String),

    /// The creation call was rejected or returned a malformed body.
    #[error("speech submission failed: {0}")]
    Submission(String),

    /// The remote reported the job as failed, or polling itself broke down.
    #[error("synthesis job {job_id} failed: {reason}")]
    JobFailed { job_id: String, reason: String },

    /// The job never reached a terminal state within the polling budget.
    #[error("synthesis job {job_id} did not reach a terminal state within {budget_secs}s")]
    Timeout { job_id: String, budget_secs: u64 },

    /// The finished audio could not be fetched or written.
    #[error("audio download failed: {0}")]
    Download(String),
}

// =============================================================================
// Results
// =============================================================================

/// Outcome of a speech creation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service answered synchronously with the finished audio URL.
    Completed(String),

    /// The job was queued; poll with the contained job id.
    Accepted(String),
}

/// A downloaded audio file on local storage.
///
/// Owned by the orchestrator for the duration of the run; never cached or
/// reused across runs. Left on disk when a later publish step fails, for
/// manual inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// Destination path the audio was written to.
    pub path: PathBuf,
    /// Size of the written file in bytes.
    pub bytes: u64,
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the ListenHub speech API.
///
/// The underlying `reqwest::Client` is reused across requests for connection
/// pooling.
#[derive(Debug, Clone)]
pub struct SynthesisClient {
    config: SynthesisConfig,
    http: reqwest::Client,
}

impl SynthesisClient {
    /// Creates a client from a validated configuration.
    pub fn new(config: SynthesisConfig) -> Result<Self, SynthesisError> {
        config
            .validate()
            .map_err(SynthesisError::InvalidConfiguration)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                SynthesisError::InvalidConfiguration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { config, http })
    }

    /// Returns the configuration this client was built with.
    #[inline]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    fn speech_url(&self) -> String {
        format!("{}{}", self.config.base_url, SPEECH_PATH)
    }

    fn task_url(&self, job_id: &str) -> String {
        format!("{}{}/{}", self.config.base_url, TASK_PATH, job_id)
    }

    fn health_url(&self) -> String {
        format!("{}{}", self.config.base_url, HEALTH_PATH)
    }

    /// Submits script text for synthesis with the given speaker.
    ///
    /// Fails fast, before any network traffic, on an empty speaker id or
    /// empty text.
    pub async fn submit(
        &self,
        text: &str,
        speaker_id: &str,
    ) -> Result<SubmitOutcome, SynthesisError> {
        if speaker_id.trim().is_empty() {
            return Err(SynthesisError::InvalidConfiguration(
                "speaker id must not be empty".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(SynthesisError::InvalidConfiguration(
                "script text must not be empty".to_string(),
            ));
        }

        info!(
            text_chars = text.chars().count(),
            speaker_id = %abbreviate(speaker_id),
            "submitting speech creation request"
        );

        let request = CreateSpeechRequest::single(text, speaker_id);
        let response = self
            .http
            .post(self.speech_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SynthesisError::Submission(format!("request error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(Self::submission_error_from_response(status, &body));
        }

        let envelope: SpeechEnvelope = response
            .json()
            .await
            .map_err(|e| SynthesisError::Submission(format!("malformed response body: {e}")))?;

        if !envelope.is_accepted() {
            return Err(SynthesisError::Submission(format!(
                "provider rejected the request (code {}): {}",
                envelope.code,
                envelope.message.as_deref().unwrap_or("no message")
            )));
        }

        if let Some(url) = envelope.audio_url() {
            debug!("speech completed synchronously");
            return Ok(SubmitOutcome::Completed(url.to_string()));
        }
        if let Some(job_id) = envelope.task_id() {
            debug!(job_id, "speech job queued");
            return Ok(SubmitOutcome::Accepted(job_id.to_string()));
        }

        Err(SynthesisError::Submission(
            "response carried neither an audio URL nor a task id".to_string(),
        ))
    }

    /// Polls the job status endpoint until a terminal status or until the
    /// configured budget elapses. Returns the result audio URL on success.
    pub async fn poll_until_done(&self, job_id: &str) -> Result<String, SynthesisError> {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(job_id, attempt, "polling job status");

            let response = self
                .http
                .get(self.task_url(job_id))
                .bearer_auth(&self.config.api_key)
                .send()
                .await
                .map_err(|e| SynthesisError::JobFailed {
                    job_id: job_id.to_string(),
                    reason: format!("status request error: {e}"),
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(SynthesisError::JobFailed {
                    job_id: job_id.to_string(),
                    reason: format!("status request returned HTTP {status}"),
                });
            }

            let task: TaskStatusResponse = response.json().await.map_err(|e| {
                SynthesisError::JobFailed {
                    job_id: job_id.to_string(),
                    reason: format!("malformed status response: {e}"),
                }
            })?;

            match task.job_status() {
                Some(JobStatus::Succeeded) => {
                    info!(job_id, attempt, "synthesis job succeeded");
                    return task.audio_url.ok_or_else(|| SynthesisError::JobFailed {
                        job_id: job_id.to_string(),
                        reason: "job succeeded but the response carried no audio URL".to_string(),
                    });
                }
                Some(JobStatus::Failed) => {
                    return Err(SynthesisError::JobFailed {
                        job_id: job_id.to_string(),
                        reason: task
                            .error
                            .unwrap_or_else(|| "unspecified remote failure".to_string()),
                    });
                }
                Some(in_flight) => {
                    debug!(job_id, status = %in_flight, "job still in flight");
                }
                None => {
                    // Unrecognized status strings keep the job in flight; the
                    // budget below still bounds the wait.
                    warn!(job_id, status = %task.status, "unrecognized job status");
                }
            }

            if started.elapsed() + self.config.poll_interval > self.config.poll_timeout {
                return Err(SynthesisError::Timeout {
                    job_id: job_id.to_string(),
                    budget_secs: self.config.poll_timeout.as_secs(),
                });
            }
            sleep(self.config.poll_interval).await;
        }
    }

    /// Fetches the finished audio and writes it to `destination`.
    ///
    /// The body is fully collected before anything is written, so a
    /// non-success response or transfer error leaves no partial file behind.
    pub async fn download(
        &self,
        url: &str,
        destination: &Path,
    ) -> Result<AudioArtifact, SynthesisError> {
        debug!(url, destination = %destination.display(), "downloading audio artifact");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SynthesisError::Download(format!("request error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::Download(format!(
                "audio fetch returned HTTP {status}"
            )));
        }

        let bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Download(format!("transfer error: {e}")))?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    SynthesisError::Download(format!(
                        "failed to create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        tokio::fs::write(destination, &bytes).await.map_err(|e| {
            SynthesisError::Download(format!("failed to write {}: {e}", destination.display()))
        })?;

        info!(
            destination = %destination.display(),
            bytes = bytes.len(),
            "audio artifact downloaded"
        );

        Ok(AudioArtifact {
            path: destination.to_path_buf(),
            bytes: bytes.len() as u64,
        })
    }

    /// The composed submit → (poll) → download flow.
    pub async fn synthesize_to_file(
        &self,
        text: &str,
        speaker_id: &str,
        destination: &Path,
    ) -> Result<AudioArtifact, SynthesisError> {
        let audio_url = match self.submit(text, speaker_id).await? {
            SubmitOutcome::Completed(url) => url,
            SubmitOutcome::Accepted(job_id) => self.poll_until_done(&job_id).await?,
        };
        self.download(&audio_url, destination).await
    }

    /// Best-effort reachability probe against the health endpoint.
    ///
    /// Authentication failures still count as reachable; this only answers
    /// "is the service there".
    pub async fn check_connection(&self) -> bool {
        match self
            .http
            .get(self.health_url())
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                debug!(%status, "health probe answered");
                status.is_success()
                    || status == StatusCode::UNAUTHORIZED
                    || status == StatusCode::FORBIDDEN
            }
            Err(e) => {
                warn!("health probe failed: {e}");
                false
            }
        }
    }

    /// Converts a failed creation response into a descriptive error.
    fn submission_error_from_response(status: StatusCode, body: &[u8]) -> SynthesisError {
        let api_error = parse_api_error(body);

        let message = match (status.as_u16(), &api_error) {
            (401, Some(err)) => format!("authentication failed: {err}. Verify the API key."),
            (401, None) => "authentication failed. Verify the API key.".to_string(),

            (403, Some(err)) => format!("access denied: {err}. Check your plan and quota."),
            (403, None) => "access denied. Check your plan and quota.".to_string(),

            (429, Some(err)) => format!("rate limit exceeded: {err}"),
            (429, None) => "rate limit exceeded; retry after a short delay".to_string(),

            (500..=599, Some(err)) => format!("server error ({status}): {err}"),
            (500..=599, None) => format!("server error ({status}); retry later"),

            (_, Some(err)) => format!("API error ({status}): {err}"),
            (_, None) => format!("API request failed with status {status}"),
        };

        if let Some(err) = &api_error {
            warn!(status = status.as_u16(), error = %err, "speech creation rejected");
        }

        SynthesisError::Submission(message)
    }
}

/// Parses an API error body, returning it only when it carries content.
fn parse_api_error(body: &[u8]) -> Option<ApiErrorBody> {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(error) if error.message.is_some() || error.code.is_some() => Some(error),
        _ => None,
    }
}

/// Shortens long opaque ids for log lines.
fn abbreviate(id: &str) -> String {
    if id.chars().count() > 30 {
        let head: String = id.chars().take(30).collect();
        format!("{head}...")
    } else {
        id.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_client() -> SynthesisClient {
        let config = SynthesisConfig::new("test-key").with_base_url("http://localhost:9999/v1");
        SynthesisClient::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = SynthesisClient::new(SynthesisConfig::new(""));
        assert!(matches!(
            result,
            Err(SynthesisError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_endpoint_urls() {
        let client = test_client();
        assert_eq!(client.speech_url(), "http://localhost:9999/v1/speech");
        assert_eq!(
            client.task_url("task-42"),
            "http://localhost:9999/v1/task/task-42"
        );
        assert_eq!(client.health_url(), "http://localhost:9999/v1/health");
    }

    #[tokio::test]
    async fn test_submit_empty_speaker_id_fails_before_network() {
        // The base URL points nowhere reachable; an attempted request would
        // surface as Submission, not InvalidConfiguration.
        let client = test_client();
        let result = client.submit("some text", "  ").await;
        assert!(matches!(
            result,
            Err(SynthesisError::InvalidConfiguration(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_empty_text_fails_before_network() {
        let client = test_client();
        let result = client.submit("", "voice-123").await;
        assert!(matches!(
            result,
            Err(SynthesisError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_submission_error_401() {
        let err = SynthesisClient::submission_error_from_response(
            StatusCode::UNAUTHORIZED,
            br#"{"message": "invalid api key"}"#,
        );
        let msg = err.to_string();
        assert!(msg.contains("authentication failed"));
        assert!(msg.contains("invalid api key"));
    }

    #[test]
    fn test_submission_error_429() {
        let err =
            SynthesisClient::submission_error_from_response(StatusCode::TOO_MANY_REQUESTS, b"");
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn test_submission_error_500() {
        let err = SynthesisClient::submission_error_from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            b"not json",
        );
        assert!(err.to_string().contains("server error"));
    }

    #[test]
    fn test_submission_error_generic() {
        let err = SynthesisClient::submission_error_from_response(
            StatusCode::IM_A_TEAPOT,
            b"{}",
        );
        assert!(err.to_string().contains("418"));
    }

    #[test]
    fn test_parse_api_error_requires_content() {
        assert!(parse_api_error(b"{}").is_none());
        assert!(parse_api_error(b"not json").is_none());
        assert!(parse_api_error(br#"{"message": "boom"}"#).is_some());
        assert!(parse_api_error(br#"{"code": 7}"#).is_some());
    }

    #[test]
    fn test_abbreviate_long_ids() {
        let long = "voice-clone-0123456789012345678901234567890123456789";
        let short = abbreviate(long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 33);

        assert_eq!(abbreviate("voice-123"), "voice-123");
    }

    #[test]
    fn test_config_accessor_roundtrip() {
        let config = SynthesisConfig::new("test-key")
            .with_base_url("http://localhost:1/api")
            .with_poll_interval(Duration::from_millis(10));
        let client = SynthesisClient::new(config).unwrap();
        assert_eq!(client.config().poll_interval, Duration::from_millis(10));
    }
}

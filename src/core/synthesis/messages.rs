//! ListenHub API message types.
//!
//! Request and response structures for the speech creation endpoint, the
//! task status endpoint, and the best-effort error body parsed from failed
//! responses.

use serde::{Deserialize, Serialize};

// =============================================================================
// Job Status
// =============================================================================

/// Remote-reported lifecycle state of one synthesis job.
///
/// Created by submission, observed by polling reads, terminal on
/// [`Succeeded`](Self::Succeeded) or [`Failed`](Self::Failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Accepted but not yet picked up.
    Pending,
    /// Synthesis in progress.
    Processing,
    /// Finished; the audio URL is available.
    Succeeded,
    /// Finished unsuccessfully; a reason may accompany it.
    Failed,
}

impl JobStatus {
    /// Maps a remote status string onto the enum.
    ///
    /// Returns `None` for status strings this client does not recognize;
    /// callers treat those as still-in-flight rather than failing the job.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pending" | "queued" | "created" => Some(Self::Pending),
            "processing" | "running" | "in_progress" => Some(Self::Processing),
            "completed" | "succeeded" | "success" => Some(Self::Succeeded),
            "failed" | "error" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Canonical name for logging.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Whether polling stops at this status.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Speech creation
// =============================================================================

/// One narrated segment of a speech creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechScript {
    /// Text to synthesize.
    pub content: String,
    /// Provider speaker id selecting the voice.
    #[serde(rename = "speakerId")]
    pub speaker_id: String,
}

/// Body of `POST /speech`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpeechRequest {
    /// Narrated segments; this pipeline always submits exactly one.
    pub scripts: Vec<SpeechScript>,
}

impl CreateSpeechRequest {
    /// Builds a single-segment request.
    pub fn single(content: impl Into<String>, speaker_id: impl Into<String>) -> Self {
        Self {
            scripts: vec![SpeechScript {
                content: content.into(),
                speaker_id: speaker_id.into(),
            }],
        }
    }
}

/// Payload of a successful speech creation response.
///
/// Short scripts complete synchronously and carry `audioUrl` directly;
/// longer ones are queued and carry a `taskId` to poll.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechData {
    /// Immediate result URL (synchronous completion).
    #[serde(rename = "audioUrl", alias = "url", default)]
    pub audio_url: Option<String>,

    /// Queued job id to poll.
    #[serde(rename = "taskId", default)]
    pub task_id: Option<String>,
}

/// Response envelope of the speech creation endpoint: `code` 0 means the
/// request was accepted, anything else is a provider-side rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechEnvelope {
    /// Provider status code; 0 = accepted.
    #[serde(default)]
    pub code: i64,

    /// Human-readable rejection reason, when present.
    #[serde(default)]
    pub message: Option<String>,

    /// Result payload.
    #[serde(default)]
    pub data: Option<SpeechData>,

    /// Top-level result URL fallback emitted by older API revisions.
    #[serde(rename = "audioUrl", default)]
    pub audio_url: Option<String>,
}

impl SpeechEnvelope {
    /// Whether the provider accepted the request.
    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.code == 0
    }

    /// Result URL, wherever the provider put it.
    pub fn audio_url(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.audio_url.as_deref())
            .or(self.audio_url.as_deref())
    }

    /// Queued job id, when the request did not complete synchronously.
    pub fn task_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.task_id.as_deref())
    }
}

// =============================================================================
// Task status
// =============================================================================

/// Response of `GET /task/{taskId}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskStatusResponse {
    /// Remote status string; see [`JobStatus::parse`].
    #[serde(default)]
    pub status: String,

    /// Result URL, present once the job succeeded.
    #[serde(alias = "audioUrl", default)]
    pub audio_url: Option<String>,

    /// Failure reason, when the job failed.
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskStatusResponse {
    /// Parsed status; `None` for unrecognized strings.
    pub fn job_status(&self) -> Option<JobStatus> {
        JobStatus::parse(&self.status)
    }
}

// =============================================================================
// Error body
// =============================================================================

/// Best-effort parse of a failed API response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Error message, under whichever key the provider used.
    #[serde(default, alias = "error", alias = "error_message")]
    pub message: Option<String>,

    /// Provider error code, when present.
    #[serde(default)]
    pub code: Option<i64>,
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.message, self.code) {
            (Some(msg), Some(code)) => write!(f, "{msg} (code {code})"),
            (Some(msg), None) => write!(f, "{msg}"),
            (None, Some(code)) => write!(f, "code {code}"),
            (None, None) => write!(f, "unknown error"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_parse_known() {
        assert_eq!(JobStatus::parse("pending"), Some(JobStatus::Pending));
        assert_eq!(JobStatus::parse("queued"), Some(JobStatus::Pending));
        assert_eq!(JobStatus::parse("processing"), Some(JobStatus::Processing));
        assert_eq!(JobStatus::parse("running"), Some(JobStatus::Processing));
        assert_eq!(JobStatus::parse("completed"), Some(JobStatus::Succeeded));
        assert_eq!(JobStatus::parse("succeeded"), Some(JobStatus::Succeeded));
        assert_eq!(JobStatus::parse("failed"), Some(JobStatus::Failed));
        assert_eq!(JobStatus::parse("error"), Some(JobStatus::Failed));
    }

    #[test]
    fn test_job_status_parse_case_insensitive() {
        assert_eq!(JobStatus::parse("COMPLETED"), Some(JobStatus::Succeeded));
        assert_eq!(JobStatus::parse("Processing"), Some(JobStatus::Processing));
    }

    #[test]
    fn test_job_status_parse_unknown() {
        assert_eq!(JobStatus::parse("transcoding"), None);
        assert_eq!(JobStatus::parse(""), None);
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_create_speech_request_serialization() {
        let request = CreateSpeechRequest::single("Hello world", "voice-123");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["scripts"][0]["content"], "Hello world");
        assert_eq!(json["scripts"][0]["speakerId"], "voice-123");
    }

    #[test]
    fn test_envelope_synchronous_completion() {
        let json = r#"{"code": 0, "data": {"audioUrl": "https://cdn.example/audio.mp3"}}"#;
        let envelope: SpeechEnvelope = serde_json::from_str(json).unwrap();

        assert!(envelope.is_accepted());
        assert_eq!(envelope.audio_url(), Some("https://cdn.example/audio.mp3"));
        assert!(envelope.task_id().is_none());
    }

    #[test]
    fn test_envelope_queued_task() {
        let json = r#"{"code": 0, "data": {"taskId": "task-42"}}"#;
        let envelope: SpeechEnvelope = serde_json::from_str(json).unwrap();

        assert!(envelope.is_accepted());
        assert!(envelope.audio_url().is_none());
        assert_eq!(envelope.task_id(), Some("task-42"));
    }

    #[test]
    fn test_envelope_data_url_alias() {
        let json = r#"{"code": 0, "data": {"url": "https://cdn.example/a.mp3"}}"#;
        let envelope: SpeechEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.audio_url(), Some("https://cdn.example/a.mp3"));
    }

    #[test]
    fn test_envelope_top_level_url_fallback() {
        let json = r#"{"code": 0, "audioUrl": "https://cdn.example/b.mp3"}"#;
        let envelope: SpeechEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.audio_url(), Some("https://cdn.example/b.mp3"));
    }

    #[test]
    fn test_envelope_rejection() {
        let json = r#"{"code": 1401, "message": "invalid api key"}"#;
        let envelope: SpeechEnvelope = serde_json::from_str(json).unwrap();

        assert!(!envelope.is_accepted());
        assert_eq!(envelope.message.as_deref(), Some("invalid api key"));
    }

    #[test]
    fn test_task_status_response_fields() {
        let json = r#"{"status": "completed", "audio_url": "https://cdn.example/c.mp3"}"#;
        let response: TaskStatusResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.job_status(), Some(JobStatus::Succeeded));
        assert_eq!(response.audio_url.as_deref(), Some("https://cdn.example/c.mp3"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_task_status_camel_case_alias() {
        let json = r#"{"status": "completed", "audioUrl": "https://cdn.example/d.mp3"}"#;
        let response: TaskStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.audio_url.as_deref(), Some("https://cdn.example/d.mp3"));
    }

    #[test]
    fn test_task_status_failure_reason() {
        let json = r#"{"status": "failed", "error": "text too long"}"#;
        let response: TaskStatusResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.job_status(), Some(JobStatus::Failed));
        assert_eq!(response.error.as_deref(), Some("text too long"));
    }

    #[test]
    fn test_api_error_body_display() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"message": "quota exceeded", "code": 429}"#).unwrap();
        assert_eq!(body.to_string(), "quota exceeded (code 429)");

        let body: ApiErrorBody = serde_json::from_str(r#"{"error": "bad request"}"#).unwrap();
        assert_eq!(body.to_string(), "bad request");

        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.to_string(), "unknown error");
    }
}

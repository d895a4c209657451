//! Pipeline orchestrator.
//!
//! Sequences one episode end to end: parse the script, resolve the voice,
//! synthesize and download the audio, publish. Execution is strictly
//! sequential (every step depends on the previous result) and fail-fast:
//! the first error aborts the run, and a failed synthesis never reaches
//! the publish step. A failed publish leaves the downloaded artifact on disk
//! for manual retry.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::core::document::ScriptDocument;
use crate::core::synthesis::{AudioArtifact, SynthesisClient, SynthesisConfig};
use crate::core::voices::VoiceMap;
use crate::error::PipelineError;
use crate::publish::{PublishRequest, Publisher};

/// Title used when neither the document nor its filename yields one.
const FALLBACK_TITLE: &str = "untitled-episode";

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// The downloaded audio artifact.
    pub artifact: AudioArtifact,
    /// Episode title that was published.
    pub title: String,
    /// Length of the published description in characters.
    pub description_chars: usize,
}

/// The document-to-episode orchestrator.
pub struct Pipeline<P> {
    synthesis: SynthesisClient,
    voices: VoiceMap,
    publisher: P,
    podcast_id: String,
    output_dir: PathBuf,
}

impl<P: Publisher> Pipeline<P> {
    /// Assembles a pipeline from its collaborators.
    pub fn new(
        synthesis: SynthesisClient,
        voices: VoiceMap,
        publisher: P,
        podcast_id: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            synthesis,
            voices,
            publisher,
            podcast_id: podcast_id.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Assembles a pipeline from the application configuration.
    pub fn from_config(config: &AppConfig, publisher: P) -> Result<Self, PipelineError> {
        let synthesis_config = SynthesisConfig::new(config.api_key.clone())
            .with_base_url(config.api_base_url.clone())
            .with_poll_interval(Duration::from_secs(config.poll_interval_secs))
            .with_poll_timeout(Duration::from_secs(config.poll_timeout_secs))
            .with_request_timeout(Duration::from_secs(config.request_timeout_secs));
        let synthesis = SynthesisClient::new(synthesis_config)?;

        Ok(Self::new(
            synthesis,
            VoiceMap::new(config.voices.clone()),
            publisher,
            config.podcast_id.clone(),
            config.output_dir.clone(),
        ))
    }

    /// Runs one episode through the full pipeline.
    pub async fn run(
        &self,
        document_path: &Path,
        voice_name: &str,
    ) -> Result<PublishResult, PipelineError> {
        info!(document = %document_path.display(), "step 1/4: parsing script document");
        let document = ScriptDocument::from_file(document_path).await?;
        let title = document
            .title
            .clone()
            .unwrap_or_else(|| default_title(document_path));

        info!(voice = voice_name, "step 2/4: resolving voice profile");
        let speaker_id = self.voices.resolve(voice_name)?.to_string();

        info!("step 3/4: synthesizing audio");
        let destination = self
            .output_dir
            .join(format!("episode-{}.mp3", Uuid::new_v4()));
        let artifact = self
            .synthesis
            .synthesize_to_file(&document.body, &speaker_id, &destination)
            .await?;

        info!(title = %title, "step 4/4: publishing episode");
        let request = PublishRequest::new(
            self.podcast_id.clone(),
            artifact.path.clone(),
            title.clone(),
            &document.body,
        );
        let description_chars = request.description.chars().count();

        if let Err(e) = self.publisher.publish(&request).await {
            // The artifact is deliberately left in place for manual retry.
            warn!(
                artifact = %artifact.path.display(),
                "publish failed; downloaded audio kept for inspection"
            );
            return Err(e.into());
        }

        info!(
            artifact = %artifact.path.display(),
            bytes = artifact.bytes,
            "episode published"
        );

        Ok(PublishResult {
            artifact,
            title,
            description_chars,
        })
    }
}

/// Filename-derived default title for documents without a title section.
fn default_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_title_from_file_stem() {
        assert_eq!(default_title(Path::new("/tmp/episode-01.md")), "episode-01");
        assert_eq!(default_title(Path::new("script.txt")), "script");
    }

    #[test]
    fn test_default_title_fallback() {
        assert_eq!(default_title(Path::new("/")), FALLBACK_TITLE);
        assert_eq!(default_title(Path::new("..")), FALLBACK_TITLE);
    }
}

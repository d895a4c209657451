//! Top-level error type for the castpress pipeline.
//!
//! Each layer of the crate defines its own error enum (`ConfigError`,
//! `ParseError`, `SynthesisError`, `PublishError`); this module sums them so
//! the orchestrator and the CLI deal with a single type. Every variant is
//! fatal for the current run: nothing is retried or downgraded to a warning.

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::document::ParseError;
use crate::core::synthesis::SynthesisError;
use crate::publish::PublishError;

/// Any failure that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Pre-flight configuration failure (missing key, unknown voice, ...).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The script document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Speech synthesis failed (submission, remote job, timeout or download).
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The publishing agent reported failure.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

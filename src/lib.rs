pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod publish;

// Re-export commonly used items for convenience
pub use crate::config::{AppConfig, ConfigError};
pub use crate::core::document::{ParseError, ScriptDocument};
pub use crate::core::synthesis::{SynthesisClient, SynthesisConfig, SynthesisError};
pub use crate::core::voices::VoiceMap;
pub use crate::error::PipelineError;
pub use crate::pipeline::{Pipeline, PublishResult};
pub use crate::publish::{PublishError, PublishRequest, Publisher, SessionStore};

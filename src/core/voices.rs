//! Voice profile resolution.
//!
//! Synthesis requests are made with an opaque provider speaker id, but
//! operators work with human-readable voice names. `VoiceMap` owns the
//! name-to-id mapping and fails fast, before any network call, when a name
//! is unknown or mapped to an empty id, so a guaranteed-invalid request never
//! costs a round trip.

use std::collections::HashMap;

use crate::config::ConfigError;

/// Mapping of human-readable voice names to provider speaker ids.
#[derive(Debug, Clone, Default)]
pub struct VoiceMap {
    voices: HashMap<String, String>,
}

impl VoiceMap {
    /// Creates a voice map from a name → speakerId mapping.
    pub fn new(voices: HashMap<String, String>) -> Self {
        Self { voices }
    }

    /// Resolves a voice name to its speaker id.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::UnknownVoice`] when the name is not in the mapping
    ///   (the error lists the configured names).
    /// * [`ConfigError::EmptySpeakerId`] when the mapped id is empty.
    pub fn resolve(&self, name: &str) -> Result<&str, ConfigError> {
        let speaker_id = self
            .voices
            .get(name)
            .ok_or_else(|| ConfigError::UnknownVoice {
                name: name.to_string(),
                available: self.names(),
            })?;

        if speaker_id.trim().is_empty() {
            return Err(ConfigError::EmptySpeakerId(name.to_string()));
        }

        Ok(speaker_id)
    }

    /// Configured voice names, sorted for stable listing output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.voices.keys().cloned().collect();
        names.sort();
        names
    }

    /// Iterates `(name, speaker_id)` pairs in name order.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .voices
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }

    /// Number of configured voices.
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    /// Whether no voices are configured.
    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

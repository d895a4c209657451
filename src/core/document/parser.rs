//! Section extraction for episode scripts.
//!
//! A script looks like:
//!
//! ```text
//! ## Title
//! The Day the Servers Slept
//!
//! ## Body
//! Welcome back to the show. Today we ...
//! ```
//!
//! The body section is required; the title section is optional (callers fall
//! back to a filename-derived title). When a heading appears more than once,
//! the first occurrence is authoritative.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use super::{BODY_HEADING, TITLE_HEADING};

/// Errors raised while turning raw text into a [`ScriptDocument`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The required `## Body` heading is absent.
    #[error("document is missing the '## {BODY_HEADING}' section")]
    MissingBody,

    /// The body heading exists but the section contains no text.
    #[error("document '## {BODY_HEADING}' section is empty")]
    EmptyBody,

    /// The document file could not be read.
    #[error("failed to read document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builds the extraction regex for one heading.
///
/// The captured content runs from the line after the heading up to the next
/// `##` heading line or end of input. `(?s)` lets `.` span lines, `(?m)`
/// anchors the heading to a line start, `(?i)` tolerates heading case.
fn section_regex(heading: &str) -> Regex {
    Regex::new(&format!(
        r"(?sim)^##[ \t]*{heading}[ \t\r]*$\n?(.*?)(?:\n##|\z)"
    ))
    .expect("section heading pattern is valid")
}

static TITLE_RE: Lazy<Regex> = Lazy::new(|| section_regex(TITLE_HEADING));
static BODY_RE: Lazy<Regex> = Lazy::new(|| section_regex(BODY_HEADING));

/// A parsed episode script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDocument {
    /// Trimmed title section content, if the section exists and is non-blank.
    pub title: Option<String>,
    /// Trimmed body section content. Always non-empty.
    pub body: String,
    /// The unparsed input, kept for diagnostics.
    pub raw: String,
}

impl ScriptDocument {
    /// Parse raw script text. Pure; no side effects.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let body = match extract_section(&BODY_RE, raw) {
            None => return Err(ParseError::MissingBody),
            Some(body) if body.is_empty() => return Err(ParseError::EmptyBody),
            Some(body) => body,
        };

        let title = extract_section(&TITLE_RE, raw).filter(|t| !t.is_empty());

        debug!(
            title_chars = title.as_deref().map(|t| t.chars().count()).unwrap_or(0),
            body_chars = body.chars().count(),
            "parsed script document"
        );

        Ok(Self {
            title,
            body,
            raw: raw.to_string(),
        })
    }

    /// Read and parse a script file.
    pub async fn from_file(path: &Path) -> Result<Self, ParseError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ParseError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&raw)
    }
}

/// First-match section extraction, trimmed.
fn extract_section(re: &Regex, raw: &str) -> Option<String> {
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

// =============================================================================
// Tests
// =============================================================================

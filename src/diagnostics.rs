//! Structured, leveled events returned by the pipeline stages.
//!
//! Stages never log on their own. They hand back a list of [`Diagnostic`]s next
//! to their primary result and the caller decides what to do with them; the
//! [`crate::pipeline`] forwards them to `tracing` via [`Diagnostic::emit`].

use std::fmt;

use serde::Serialize;

/// How loud a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Warning,
}

/// Non-fatal observations made while processing a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A pattern match could not be decoded as UTF-8 and was skipped.
    ExtractionWarning { offset: usize, preview: String },
    /// Extraction found no asset paths at all.
    EmptyExtraction,
    /// More than one character code matched a path; the first one was used.
    ClassificationAmbiguity { path: String, codes: Vec<String> },
    /// A path listing line is not a valid asset path and was skipped.
    InvalidListingLine { line_no: usize, line: String },
}

impl Diagnostic {
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::ExtractionWarning { .. } => Level::Warning,
            Diagnostic::EmptyExtraction => Level::Warning,
            Diagnostic::ClassificationAmbiguity { .. } => Level::Debug,
            Diagnostic::InvalidListingLine { .. } => Level::Warning,
        }
    }

    /// Forwards the diagnostic to `tracing`, tagged with the input it came from.
    pub fn emit(&self, source: &str) {
        match self.level() {
            Level::Warning => tracing::warn!(source, "{}", self),
            Level::Debug => tracing::debug!(source, "{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ExtractionWarning { offset, preview } => {
                write!(f, "skipped non UTF-8 match at offset {}: {}", offset, preview)
            }
            Diagnostic::EmptyExtraction => {
                write!(f, "no asset paths found; check the catalog format or the key")
            }
            Diagnostic::ClassificationAmbiguity { path, codes } => {
                let used = codes.first().map(String::as_str).unwrap_or_default();
                let codes = codes.join(", ");
                write!(f, "'{}' matches several codes ({}), using '{}'", path, codes, used)
            }
            Diagnostic::InvalidListingLine { line_no, line } => {
                write!(f, "listing line {} is not an asset path: {:?}", line_no, line)
            }
        }
    }
}

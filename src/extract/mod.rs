//! # Path Extraction
//!
//! Recovers logical asset paths (`Assets/...`) from a decompressed catalog.
//!
//! The catalog is a binary serialization, so the scan is byte-oriented: it
//! looks for the literal `Assets/` prefix followed by path-safe characters
//! (`A-Z a-z 0-9 . _ - /`) and takes the longest run. Matches may be surrounded
//! by arbitrary binary structure. Duplicates collapse into a [`PathSet`].

pub mod listing;

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::common::{self, AssetPath, PathSet};
use crate::diagnostics::Diagnostic;

static ASSET_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&common::asset_path_pattern()).expect("static asset path pattern")
});

const PREVIEW_BYTES: usize = 64;

/// The paths recovered from one buffer plus whatever was noticed on the way.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub paths: PathSet,
    pub diagnostics: Vec<Diagnostic>,
}

/// Scans `buffer` for asset paths.
///
/// Never fails: undecodable matches are skipped with an
/// [`Diagnostic::ExtractionWarning`], and an empty result is reported as
/// [`Diagnostic::EmptyExtraction`] for the caller to judge.
pub fn extract(buffer: &[u8]) -> Extraction {
    let mut extraction = Extraction::default();

    for m in ASSET_PATH_PATTERN.find_iter(buffer) {
        match std::str::from_utf8(m.as_bytes()) {
            Ok(s) => {
                extraction.paths.insert(AssetPath::from_match(s.to_string()));
            }
            Err(_) => extraction.diagnostics.push(Diagnostic::ExtractionWarning {
                offset: m.start(),
                preview: preview(m.as_bytes()),
            }),
        }
    }

    if extraction.paths.is_empty() {
        extraction.diagnostics.push(Diagnostic::EmptyExtraction);
    }
    extraction
}

fn preview(bytes: &[u8]) -> String {
    let cut = &bytes[..bytes.len().min(PREVIEW_BYTES)];
    String::from_utf8_lossy(cut).into_owned()
}

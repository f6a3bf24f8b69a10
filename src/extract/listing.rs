//! Path listings: the sorted, one-path-per-line text form of a [`PathSet`].
//!
//! `assetdiff extract` writes these so a catalog only has to be decrypted once;
//! `analyze --listing` and `compare --listing` read them back.

use super::Extraction;
use crate::common::{AssetPath, PathSet};
use crate::diagnostics::Diagnostic;

/// Renders `paths` sorted, one per line, with a trailing newline.
pub fn write_listing(paths: &PathSet) -> String {
    let mut out = String::new();
    for path in paths.sorted() {
        out.push_str(path.as_str());
        out.push('\n');
    }
    out
}

/// Parses a listing. Blank lines are ignored, surrounding whitespace is
/// trimmed, and lines that are not asset paths are skipped with a diagnostic.
pub fn parse_listing(text: &str) -> Extraction {
    let mut extraction = Extraction::default();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match AssetPath::parse(line) {
            Some(path) => {
                extraction.paths.insert(path);
            }
            None => extraction.diagnostics.push(Diagnostic::InvalidListingLine {
                line_no: idx + 1,
                line: line.to_string(),
            }),
        }
    }

    if extraction.paths.is_empty() {
        extraction.diagnostics.push(Diagnostic::EmptyExtraction);
    }
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_is_sorted_with_trailing_newline() {
        let set: PathSet = ["Assets/b.png", "Assets/a.png"]
            .into_iter()
            .filter_map(AssetPath::parse)
            .collect();
        assert_eq!(write_listing(&set), "Assets/a.png\nAssets/b.png\n");
        assert_eq!(write_listing(&PathSet::new()), "");
    }

    #[test]
    fn parse_skips_blanks_and_reports_garbage() {
        let ex = parse_listing("Assets/a.png\r\n\n  Assets/b.png  \nnot a path\nAssets/a.png\n");
        assert_eq!(ex.paths.len(), 2);
        assert_eq!(
            ex.diagnostics,
            vec![Diagnostic::InvalidListingLine { line_no: 4, line: "not a path".to_string() }]
        );
    }

    #[test]
    fn parse_of_written_listing_gives_back_the_set() {
        let set: PathSet = ["Assets/x/y.asset", "Assets/z.mat"]
            .into_iter()
            .filter_map(AssetPath::parse)
            .collect();
        assert_eq!(parse_listing(&write_listing(&set)).paths, set);
    }
}

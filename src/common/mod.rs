//! Common types shared by the extraction, comparison and report stages.

use std::collections::hash_set;
use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Literal prefix every logical asset path starts with.
pub const ASSET_PREFIX: &str = "Assets/";

/// Characters allowed after the prefix.
const PATH_CHARS: &str = "[-_a-zA-Z0-9./]+";

/// Unanchored pattern matching one asset path, shared with the byte scanner.
pub(crate) fn asset_path_pattern() -> String {
    format!("{}{}", regex::escape(ASSET_PREFIX), PATH_CHARS)
}

/// Anchored form of the extraction pattern, used to validate a single path.
static ASSET_PATH_EXACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}$", asset_path_pattern())).expect("static asset path pattern")
});

/// A logical asset path such as `Assets/chars/c001_icon.png`.
///
/// Only constructible from a string that fully matches the asset path pattern,
/// so an `AssetPath` is never empty and never contains bytes outside the
/// path-safe set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetPath(String);

impl AssetPath {
    /// Validates `s` and wraps it. Returns `None` when it is not an asset path.
    pub fn parse(s: &str) -> Option<Self> {
        if ASSET_PATH_EXACT.is_match(s) {
            Some(AssetPath(s.to_string()))
        } else {
            None
        }
    }

    /// Wraps a string the caller already matched against the extraction pattern.
    pub(crate) fn from_match(s: String) -> Self {
        debug_assert!(ASSET_PATH_EXACT.is_match(&s));
        AssetPath(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for AssetPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// An unordered set of asset paths. Sorting happens only when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet {
    paths: HashSet<AssetPath>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a path, returning `false` if it was already present.
    pub fn insert(&mut self, path: AssetPath) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &AssetPath) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, AssetPath> {
        self.paths.iter()
    }

    /// Paths in lexicographic order.
    pub fn sorted(&self) -> Vec<&AssetPath> {
        let mut v: Vec<&AssetPath> = self.paths.iter().collect();
        v.sort();
        v
    }
}

impl FromIterator<AssetPath> for PathSet {
    fn from_iter<I: IntoIterator<Item = AssetPath>>(iter: I) -> Self {
        PathSet { paths: iter.into_iter().collect() }
    }
}

impl Extend<AssetPath> for PathSet {
    fn extend<I: IntoIterator<Item = AssetPath>>(&mut self, iter: I) {
        self.paths.extend(iter);
    }
}

impl IntoIterator for PathSet {
    type Item = AssetPath;
    type IntoIter = hash_set::IntoIter<AssetPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a AssetPath;
    type IntoIter = hash_set::Iter<'a, AssetPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

//! # Classification and Reports
//!
//! Turns a [`PathSet`] into a [`ReportTree`] grouped by squad and character:
//!
//! 1. **Keyword filter**: keep a path when the keyword is a case-insensitive
//!    substring of it.
//! 2. **Classification**: a path belongs to the first character code, in
//!    lexicographic code order, that appears in it as `_code_` or `/code/`
//!    (case-insensitive).
//! 3. **Squad/character filter**: classified paths outside the requested
//!    squads or characters are dropped. Unclassified paths go to the
//!    [`UNCLASSIFIED_SQUAD`] bucket, but only when no squad or character filter
//!    is active.
//!
//! Rendering lives in [`render`].

mod render;

pub use render::{render, render_json, NO_RESULTS};

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::common::{AssetPath, PathSet};
use crate::diagnostics::Diagnostic;
use crate::directory::{Character, CharacterDirectory};

/// Squad bucket for paths that match no known character code.
pub const UNCLASSIFIED_SQUAD: &str = "unclassified";
/// The single character bucket inside [`UNCLASSIFIED_SQUAD`].
pub const UNCLASSIFIED_CHARACTER: &str = "unclassified assets";

/// Optional restrictions applied while building a report.
///
/// Empty selections and blank keywords mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    squads: Option<BTreeSet<String>>,
    characters: Option<BTreeSet<String>>,
    keyword: Option<String>,
}

impl ReportFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_squads<I, S>(mut self, squads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.squads = non_empty_set(squads);
        self
    }

    pub fn with_characters<I, S>(mut self, characters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.characters = non_empty_set(characters);
        self
    }

    pub fn with_keyword<S: Into<String>>(mut self, keyword: Option<S>) -> Self {
        self.keyword = keyword.map(Into::into).filter(|k| !k.trim().is_empty());
        self
    }

    /// True when a squad or character filter is active.
    pub fn is_restricted(&self) -> bool {
        self.squads.is_some() || self.characters.is_some()
    }

    fn admits(&self, character: &Character) -> bool {
        let squad_ok = self.squads.as_ref().map_or(true, |s| s.contains(&character.squad));
        let name_ok = self.characters.as_ref().map_or(true, |c| c.contains(&character.name));
        squad_ok && name_ok
    }
}

fn non_empty_set<I, S>(items: I) -> Option<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: BTreeSet<String> = items
        .into_iter()
        .map(Into::into)
        .filter(|s| !s.is_empty())
        .collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

/// squad → character name → paths, every level kept in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReportTree {
    squads: BTreeMap<String, BTreeMap<String, Vec<AssetPath>>>,
}

impl ReportTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `path` under `squad`/`name`, keeping the path list sorted.
    pub fn push(&mut self, squad: &str, name: &str, path: AssetPath) {
        let paths = self
            .squads
            .entry(squad.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default();
        if let Err(at) = paths.binary_search(&path) {
            paths.insert(at, path);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.squads.is_empty()
    }

    /// Number of paths across all squads.
    pub fn total(&self) -> usize {
        self.squads.values().flat_map(BTreeMap::values).map(Vec::len).sum()
    }

    pub fn squad(&self, squad: &str) -> Option<&BTreeMap<String, Vec<AssetPath>>> {
        self.squads.get(squad)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Vec<AssetPath>>)> {
        self.squads.iter().map(|(s, chars)| (s.as_str(), chars))
    }
}

/// A report tree and the diagnostics gathered while building it.
#[derive(Debug, Clone, Default)]
pub struct BuiltReport {
    pub tree: ReportTree,
    pub diagnostics: Vec<Diagnostic>,
}

struct CodeNeedle<'d> {
    code: &'d str,
    underscored: String,
    slashed: String,
    character: &'d Character,
}

/// Filters and classifies `paths` into a [`ReportTree`].
pub fn build_report(
    paths: &PathSet,
    directory: &CharacterDirectory,
    filters: &ReportFilters,
) -> BuiltReport {
    let needles: Vec<CodeNeedle<'_>> = directory
        .iter()
        .map(|(code, character)| {
            let lower = code.to_lowercase();
            CodeNeedle {
                code,
                underscored: format!("_{}_", lower),
                slashed: format!("/{}/", lower),
                character,
            }
        })
        .collect();
    let keyword = filters.keyword.as_deref().map(str::to_lowercase);

    let mut built = BuiltReport::default();
    for path in paths.sorted() {
        let lower = path.as_str().to_lowercase();
        if let Some(k) = &keyword {
            if !lower.contains(k.as_str()) {
                continue;
            }
        }

        let mut matches = needles
            .iter()
            .filter(|n| lower.contains(&n.underscored) || lower.contains(&n.slashed));

        match matches.next() {
            Some(first) => {
                let others: Vec<&str> = matches.map(|n| n.code).collect();
                if !others.is_empty() {
                    let mut codes = vec![first.code.to_string()];
                    codes.extend(others.into_iter().map(str::to_string));
                    built.diagnostics.push(Diagnostic::ClassificationAmbiguity {
                        path: path.to_string(),
                        codes,
                    });
                }
                if filters.admits(first.character) {
                    built.tree.push(&first.character.squad, &first.character.name, path.clone());
                }
            }
            None if !filters.is_restricted() => {
                built.tree.push(UNCLASSIFIED_SQUAD, UNCLASSIFIED_CHARACTER, path.clone());
            }
            None => {}
        }
    }
    built
}

//! Character/squad reference table.
//!
//! Loaded from a CSV file with one row per character. Three columns are
//! required; they are found by header name, so column order and extra columns
//! do not matter. The game's own sheet uses Korean headers, English aliases are
//! accepted too:
//!
//! | column | headers accepted        |
//! |--------|-------------------------|
//! | code   | `게임코드`, `code`       |
//! | name   | `캐릭터명(K)`, `name`    |
//! | squad  | `소속 부대`, `squad`     |

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::error::DirectoryError;

struct Column {
    label: &'static str,
    aliases: &'static [&'static str],
}

const CODE_COLUMN: Column = Column {
    label: "code (게임코드)",
    aliases: &["게임코드", "code"],
};
const NAME_COLUMN: Column = Column {
    label: "name (캐릭터명(K))",
    aliases: &["캐릭터명(K)", "name"],
};
const SQUAD_COLUMN: Column = Column {
    label: "squad (소속 부대)",
    aliases: &["소속 부대", "squad"],
};

/// A character as listed in the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub name: String,
    pub squad: String,
}

/// Why a row was not added to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowConflict {
    DuplicateCode { code: String },
    NameInOtherSquad { name: String, squad: String, existing: String },
}

impl fmt::Display for RowConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowConflict::DuplicateCode { code } => write!(f, "code '{}' is already defined", code),
            RowConflict::NameInOtherSquad { name, squad, existing } => {
                write!(f, "'{}' cannot join squad '{}', already in '{}'", name, squad, existing)
            }
        }
    }
}

/// Lookup from character code to character, plus squad membership.
///
/// Codes iterate in lexicographic order, which makes classification
/// reproducible. The directory is read-only once built and can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct CharacterDirectory {
    characters: BTreeMap<String, Character>,
    squads: BTreeMap<String, Vec<String>>,
}

impl CharacterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the table at `path`.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        if !path.exists() {
            return Err(DirectoryError::NotFound { path: path.to_path_buf() });
        }
        let file = File::open(path)
            .map_err(|source| DirectoryError::Io { path: path.to_path_buf(), source })?;
        let directory = Self::from_reader(file)?;
        tracing::info!(
            characters = directory.len(),
            squads = directory.squads.len(),
            "loaded character table '{}'",
            path.display()
        );
        Ok(directory)
    }

    /// Like [`load`](Self::load), but any failure is logged and an empty
    /// directory is returned, so every path ends up unclassified.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(directory) => directory,
            Err(e) => {
                tracing::error!("{}; continuing without character data", e);
                Self::default()
            }
        }
    }

    /// Parses CSV from any reader. The first row must be the header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DirectoryError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let find = |col: &Column| {
            headers.iter().position(|h| {
                let h = h.trim_start_matches('\u{feff}').trim();
                col.aliases.iter().any(|a| a.eq_ignore_ascii_case(h))
            })
        };
        let found = (find(&CODE_COLUMN), find(&NAME_COLUMN), find(&SQUAD_COLUMN));
        let (code_idx, name_idx, squad_idx) = match found {
            (Some(c), Some(n), Some(s)) => (c, n, s),
            (c, n, s) => {
                let missing = [(c, &CODE_COLUMN), (n, &NAME_COLUMN), (s, &SQUAD_COLUMN)]
                    .into_iter()
                    .filter(|(idx, _)| idx.is_none())
                    .map(|(_, col)| col.label)
                    .collect();
                return Err(DirectoryError::MissingColumns { missing });
            }
        };

        let mut directory = Self::default();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let field = |idx: usize| record.get(idx).map(str::trim).filter(|v| !v.is_empty());
            let fields = (field(code_idx), field(name_idx), field(squad_idx));
            let (Some(code), Some(name), Some(squad)) = fields else {
                tracing::warn!(row = row + 2, "skipping incomplete character row");
                continue;
            };
            if let Err(conflict) = directory.insert(code, name, squad) {
                tracing::warn!(row = row + 2, "skipping character row: {}", conflict);
            }
        }
        Ok(directory)
    }

    /// Adds one character. Codes must be unique and a name belongs to a single squad.
    pub fn insert(&mut self, code: &str, name: &str, squad: &str) -> Result<(), RowConflict> {
        if self.characters.contains_key(code) {
            return Err(RowConflict::DuplicateCode { code: code.to_string() });
        }
        if let Some(existing) = self.squad_of(name) {
            if existing != squad {
                return Err(RowConflict::NameInOtherSquad {
                    name: name.to_string(),
                    squad: squad.to_string(),
                    existing: existing.to_string(),
                });
            }
        }

        self.characters.insert(
            code.to_string(),
            Character { name: name.to_string(), squad: squad.to_string() },
        );
        let members = self.squads.entry(squad.to_string()).or_default();
        if !members.iter().any(|m| m == name) {
            members.push(name.to_string());
        }
        Ok(())
    }

    fn squad_of(&self, name: &str) -> Option<&str> {
        self.squads
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == name))
            .map(|(squad, _)| squad.as_str())
    }

    pub fn lookup(&self, code: &str) -> Option<&Character> {
        self.characters.get(code)
    }

    /// Codes and characters in lexicographic code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Character)> {
        self.characters.iter().map(|(code, c)| (code.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// All squad names, sorted.
    pub fn squads(&self) -> Vec<&str> {
        self.squads.keys().map(String::as_str).collect()
    }

    /// Sorted character names of the given squads, or of every squad when
    /// `squads` is `None` or empty. Unknown squads contribute nothing.
    pub fn characters_in(&self, squads: Option<&[String]>) -> Vec<&str> {
        let mut names: Vec<&str> = match squads {
            Some(wanted) if !wanted.is_empty() => wanted
                .iter()
                .filter_map(|s| self.squads.get(s))
                .flatten()
                .map(String::as_str)
                .collect(),
            _ => self.squads.values().flatten().map(String::as_str).collect(),
        };
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KOREAN_CSV: &str = "\u{feff}게임코드,캐릭터명(K),소속 부대,비고\n\
        rkayamori,Ruka,31A,lead\n\
        ykuromura,Yuki,31A,\n\
        mtojo,Tsukasa,31B,\n";

    #[test]
    fn loads_korean_headers_with_bom() {
        let dir = CharacterDirectory::from_reader(KOREAN_CSV.as_bytes()).unwrap();
        assert_eq!(dir.len(), 3);
        let tsukasa = Character { name: "Tsukasa".into(), squad: "31B".into() };
        assert_eq!(dir.lookup("mtojo"), Some(&tsukasa));
        assert_eq!(dir.squads(), vec!["31A", "31B"]);
    }

    #[test]
    fn loads_english_headers_in_any_order() {
        let csv = "Squad,Code,Name\n31C,c001,Alice\n";
        let dir = CharacterDirectory::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dir.lookup("c001").map(|c| c.name.as_str()), Some("Alice"));
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = CharacterDirectory::from_reader("code,name\nc001,Alice\n".as_bytes())
            .unwrap_err();
        match err {
            DirectoryError::MissingColumns { missing } => {
                assert_eq!(missing, vec![SQUAD_COLUMN.label])
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn undecodable_record_is_a_csv_error() {
        let csv: &[u8] = b"code,name,squad\nc001,Alice,31A\nc002,\xff\xfe,31A\n";
        let err = CharacterDirectory::from_reader(csv).unwrap_err();
        assert!(matches!(err, DirectoryError::Csv(_)), "unexpected error: {}", err);
    }

    #[test]
    fn load_or_empty_falls_back_on_missing_file() {
        let dir = CharacterDirectory::load_or_empty(Path::new("/nonexistent/character_info.csv"));
        assert!(dir.is_empty());
        assert!(matches!(
            CharacterDirectory::load(Path::new("/nonexistent/character_info.csv")),
            Err(DirectoryError::NotFound { .. })
        ));
    }

    #[test]
    fn conflicting_rows_are_skipped() {
        let csv = "code,name,squad\n\
            c001,Alice,31A\n\
            c001,Bob,31A\n\
            c002,Alice,31B\n\
            c003,Alice,31A\n\
            c004,,31A\n";
        let dir = CharacterDirectory::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.lookup("c001").map(|c| c.name.as_str()), Some("Alice"));
        assert_eq!(dir.lookup("c003").map(|c| c.squad.as_str()), Some("31A"));
        assert_eq!(dir.characters_in(None), vec!["Alice"]);
    }

    #[test]
    fn insert_rejects_conflicts() {
        let mut dir = CharacterDirectory::new();
        dir.insert("a", "Ann", "S1").unwrap();
        assert_eq!(
            dir.insert("a", "Other", "S1"),
            Err(RowConflict::DuplicateCode { code: "a".into() })
        );
        assert!(matches!(dir.insert("b", "Ann", "S2"), Err(RowConflict::NameInOtherSquad { .. })));
    }

    #[test]
    fn characters_by_squad() {
        let dir = CharacterDirectory::from_reader(KOREAN_CSV.as_bytes()).unwrap();
        assert_eq!(dir.characters_in(None), vec!["Ruka", "Tsukasa", "Yuki"]);
        assert_eq!(dir.characters_in(Some(&[][..])), vec!["Ruka", "Tsukasa", "Yuki"]);
        assert_eq!(dir.characters_in(Some(&["31A".to_string()][..])), vec!["Ruka", "Yuki"]);
        assert!(dir.characters_in(Some(&["nope".to_string()][..])).is_empty());
    }

    #[test]
    fn codes_iterate_in_lexicographic_order() {
        let mut dir = CharacterDirectory::new();
        dir.insert("zz", "Z", "S").unwrap();
        dir.insert("aa", "A", "S").unwrap();
        dir.insert("mm", "M", "S").unwrap();
        let codes: Vec<&str> = dir.iter().map(|(c, _)| c).collect();
        assert_eq!(codes, vec!["aa", "mm", "zz"]);
    }
}

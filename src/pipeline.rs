//! # Catalog Pipeline
//!
//! Chains the stages for one catalog (decrypt → decompress → extract) and builds
//! single-catalog and comparison reports on top of them.
//!
//! This is the only layer that touches the filesystem or logs. Stage
//! diagnostics are forwarded to `tracing` here and also handed back to the
//! caller inside the results.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::common::PathSet;
use crate::compare;
use crate::crypto::{self, KeyMaterial};
use crate::decompress;
use crate::diagnostics::Diagnostic;
use crate::directory::CharacterDirectory;
use crate::error::{CatalogError, StageError};
use crate::extract::{self, listing, Extraction};
use crate::report::{self, ReportFilters, ReportTree};

/// Where a set of asset paths comes from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// An encrypted catalog, decoded with the given key material.
    Catalog { path: PathBuf, key: KeyMaterial },
    /// A path listing previously written by `assetdiff extract`.
    Listing { path: PathBuf },
}

impl CatalogSource {
    pub fn path(&self) -> &Path {
        match self {
            CatalogSource::Catalog { path, .. } | CatalogSource::Listing { path } => path,
        }
    }

    /// The file name, used in titles and log lines.
    pub fn label(&self) -> String {
        file_label(self.path())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A finished report, ready to be rendered.
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub tree: ReportTree,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn to_text(&self) -> String {
        report::render(&self.tree, &self.title)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut doc = report::render_json(&self.tree, &self.title);
        doc["diagnostics"] = serde_json::json!(self.diagnostics);
        doc
    }
}

/// Decrypts, inflates and scans one catalog held in memory.
///
/// All or nothing: on error no partial path set is produced.
pub fn decode_catalog(raw: Vec<u8>, key: &KeyMaterial) -> Result<Extraction, StageError> {
    let encrypted_len = raw.len();
    let plaintext = crypto::decrypt(raw, key)?;
    tracing::debug!(encrypted_len, decrypted_len = plaintext.len(), "decrypted catalog");

    let inflated = decompress::decompress(&plaintext)?;
    drop(plaintext);
    tracing::debug!(inflated_len = inflated.len(), "decompressed catalog");

    Ok(extract::extract(&inflated))
}

/// Reads a whole input file into memory.
pub fn read_input(path: &Path) -> Result<Vec<u8>, CatalogError> {
    fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CatalogError::InputNotFound { path: path.to_path_buf() },
        _ => CatalogError::Io { path: path.to_path_buf(), source },
    })
}

/// Produces the path set of one source, logging its diagnostics.
pub fn load_paths(source: &CatalogSource) -> Result<Extraction, CatalogError> {
    let label = source.label();
    tracing::info!("reading '{}'", label);

    let raw = read_input(source.path())?;
    let extraction = match source {
        CatalogSource::Catalog { path, key } => {
            decode_catalog(raw, key)
                .map_err(|source| CatalogError::Decode { file: path.clone(), source })?
        }
        CatalogSource::Listing { path } => {
            let text = String::from_utf8(raw).map_err(|e| CatalogError::Io {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })?;
            listing::parse_listing(&text)
        }
    };

    for d in &extraction.diagnostics {
        d.emit(&label);
    }
    tracing::info!(paths = extraction.paths.len(), "extracted asset paths from '{}'", label);
    Ok(extraction)
}

/// Report over every path of a single catalog.
pub fn single_report(
    source: &CatalogSource,
    directory: &CharacterDirectory,
    filters: &ReportFilters,
) -> Result<Report, CatalogError> {
    let extraction = load_paths(source)?;
    let title = format!("'{}' analysis", source.label());
    Ok(assemble(title, &extraction.paths, extraction.diagnostics, directory, filters))
}

/// Report over the paths present in `new` but not in `old`.
///
/// The two sources are decoded concurrently; each decode is independent.
pub fn comparison_report(
    new: &CatalogSource,
    old: &CatalogSource,
    directory: &CharacterDirectory,
    filters: &ReportFilters,
) -> Result<Report, CatalogError> {
    if new.path() == old.path() {
        return Err(CatalogError::SameInput { path: new.path().to_path_buf() });
    }

    tracing::info!("comparing '{}' against '{}'", new.label(), old.label());
    let (new_paths, old_paths) = rayon::join(|| load_paths(new), || load_paths(old));
    let (new_paths, old_paths) = match (new_paths, old_paths) {
        (Ok(new_paths), Ok(old_paths)) => (new_paths, old_paths),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => return Err(e),
        (Err(e), Err(other)) => {
            tracing::error!("{}", other);
            return Err(e);
        }
    };

    let added = compare::diff(&new_paths.paths, &old_paths.paths);
    tracing::info!(added = added.len(), "comparison finished");

    let mut diagnostics = new_paths.diagnostics;
    diagnostics.extend(old_paths.diagnostics);
    let title = format!("'{}' vs '{}' comparison", new.label(), old.label());
    Ok(assemble(title, &added, diagnostics, directory, filters))
}

fn assemble(
    title: String,
    paths: &PathSet,
    mut diagnostics: Vec<Diagnostic>,
    directory: &CharacterDirectory,
    filters: &ReportFilters,
) -> Report {
    let built = report::build_report(paths, directory, filters);
    for d in &built.diagnostics {
        d.emit(&title);
    }
    diagnostics.extend(built.diagnostics);
    Report { title, tree: built.tree, diagnostics }
}

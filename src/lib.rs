//! # assetdiff Core Library
//!
//! Recovers internal asset paths from encrypted, gzip-compressed game asset
//! catalogs and reports what was added between two catalog versions, grouped by
//! squad and character.
//!
//! It backs the `assetdiff` command-line application, and every stage is also
//! usable on its own over in-memory buffers.
//!
//! ## Key Modules
//!
//! - [`crypto`]: AES-CBC decryption with PKCS#7 padding.
//! - [`decompress`]: gzip inflation.
//! - [`extract`]: byte-level scan for `Assets/...` paths, and path listings.
//! - [`compare`]: set difference between two catalog versions.
//! - [`report`]: keyword/squad/character filtering, classification and rendering.
//! - [`directory`]: the character/squad reference table.
//! - [`pipeline`]: file-level orchestration of all of the above.
//!
//! ## Examples
//!
//! ```no_run
//! use assetdiff::crypto::KeyMaterial;
//! use assetdiff::directory::CharacterDirectory;
//! use assetdiff::pipeline::{comparison_report, CatalogSource};
//! use assetdiff::report::ReportFilters;
//!
//! let key = KeyMaterial::from_hex(
//!     "000102030405060708090a0b0c0d0e0f",
//!     "0f0e0d0c0b0a09080706050403020100",
//! )?;
//! let new = CatalogSource::Catalog { path: "catalog_new.bin".into(), key: key.clone() };
//! let old = CatalogSource::Catalog { path: "catalog_old.bin".into(), key };
//! let report = comparison_report(&new, &old, &CharacterDirectory::new(), &ReportFilters::new())?;
//! println!("{}", report.to_text());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod cli_runner;
pub mod common;
pub mod compare;
pub mod crypto;
pub mod decompress;
pub mod diagnostics;
pub mod directory;
pub mod error;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use common::{AssetPath, PathSet};
pub use error::{CatalogError, DecompressionError, DecryptionError, StageError};

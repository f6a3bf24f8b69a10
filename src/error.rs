use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn caller-supplied hex strings into AES key material.
#[derive(Debug, Error)]
pub enum KeyMaterialError {
    /// The key or IV string is not valid hexadecimal.
    #[error("{which} is not valid hex: {source}")]
    Hex {
        which: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    /// The key does not have an AES key size (16, 24 or 32 bytes).
    #[error("AES key must be 16, 24 or 32 bytes, got {len}")]
    KeyLength { len: usize },

    /// The IV is not exactly one AES block.
    #[error("AES IV must be 16 bytes, got {len}")]
    IvLength { len: usize },
}

/// Errors raised while decrypting a catalog blob.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecryptionError {
    /// The ciphertext is empty or not a whole number of AES blocks.
    #[error("ciphertext length {len} is not a positive multiple of the AES block size")]
    InvalidLength { len: usize },

    /// PKCS#7 padding did not validate. Usually a wrong key/IV or a corrupted file.
    #[error("bad PKCS#7 padding (wrong key/IV or corrupted catalog)")]
    BadPadding,
}

/// Errors raised while inflating the decrypted plaintext.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecompressionError {
    /// Gzip header, body, trailer or checksum validation failed.
    #[error("corrupt gzip stream: {reason}")]
    CorruptStream { reason: String },
}

/// A failure inside the decrypt → decompress part of the pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageError {
    #[error("decryption failed: {0}")]
    Decryption(#[from] DecryptionError),

    #[error("decompression failed: {0}")]
    Decompression(#[from] DecompressionError),
}

/// Errors raised while loading the character reference table.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The reference file does not exist.
    #[error("character table not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on character table '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed character table: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required columns are absent from the header row.
    #[error("character table is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<&'static str> },
}

/// The primary error type for catalog-level operations.
///
/// Every variant that concerns a specific input names the offending file, so a
/// batch run can report the failure and move on to the next catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The input file does not exist.
    #[error("input file not found: '{}'", path.display())]
    InputNotFound { path: PathBuf },

    /// An I/O error occurred while reading an input file.
    #[error("I/O error on path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog could not be decrypted or decompressed.
    #[error("'{}' could not be decoded: {source}", file.display())]
    Decode {
        file: PathBuf,
        #[source]
        source: StageError,
    },

    /// A comparison was requested between a file and itself.
    #[error("cannot compare '{}' with itself; pick two different catalogs", path.display())]
    SameInput { path: PathBuf },

    #[error(transparent)]
    KeyMaterial(#[from] KeyMaterialError),
}

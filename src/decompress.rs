//! Gzip inflation of decrypted catalogs.

use std::io::Read;

use flate2::bufread::GzDecoder;

use crate::error::DecompressionError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn corrupt(reason: impl Into<String>) -> DecompressionError {
    DecompressionError::CorruptStream { reason: reason.into() }
}

/// Inflates a gzip stream, including every member of a multi-member file.
///
/// NUL bytes between or after members are skipped, as gzip tools do for
/// block-padded files. Anything else after a member must start a new one.
///
/// A wrong key that still happens to produce valid padding yields garbage
/// here, which is rejected as a corrupt stream rather than returned.
pub fn decompress(plaintext: &[u8]) -> Result<Vec<u8>, DecompressionError> {
    if !plaintext.starts_with(&GZIP_MAGIC) {
        return Err(corrupt("missing gzip magic bytes"));
    }

    let mut out = Vec::with_capacity(plaintext.len().saturating_mul(4));
    let mut rest = plaintext;
    loop {
        let mut member = GzDecoder::new(rest);
        member.read_to_end(&mut out).map_err(|e| corrupt(e.to_string()))?;
        rest = member.into_inner();

        let padding = rest.iter().take_while(|&&b| b == 0).count();
        rest = &rest[padding..];
        if rest.is_empty() {
            return Ok(out);
        }
        if !rest.starts_with(&GZIP_MAGIC) {
            let reason = format!("{} bytes of trailing data after gzip member", rest.len());
            return Err(corrupt(reason));
        }
    }
}

//! Cryptography module for decrypting catalog blobs.
//!
//! Catalogs are AES-CBC encrypted with PKCS#7 padding. The key size picks the
//! AES variant (128, 192 or 256 bits); the IV is always one block.

use std::fmt;

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::generic_array::GenericArray;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};

use crate::error::{DecryptionError, KeyMaterialError};

pub const BLOCK_SIZE: usize = 16; // AES block size, for every key size
const IV_SIZE: usize = 16;

#[derive(Clone)]
enum AesKey {
    Aes128([u8; 16]),
    Aes192([u8; 24]),
    Aes256([u8; 32]),
}

/// The AES key and IV a catalog was encrypted with.
///
/// Lengths are checked on construction, so a `KeyMaterial` can always drive a
/// cipher. The bytes never show up in `Debug` output.
#[derive(Clone)]
pub struct KeyMaterial {
    key: AesKey,
    iv: [u8; IV_SIZE],
}

impl KeyMaterial {
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, KeyMaterialError> {
        let key = match key.len() {
            16 => key.try_into().ok().map(AesKey::Aes128),
            24 => key.try_into().ok().map(AesKey::Aes192),
            32 => key.try_into().ok().map(AesKey::Aes256),
            _ => None,
        }
        .ok_or(KeyMaterialError::KeyLength { len: key.len() })?;
        let iv: [u8; IV_SIZE] = iv
            .try_into()
            .map_err(|_| KeyMaterialError::IvLength { len: iv.len() })?;
        Ok(Self { key, iv })
    }

    /// Decodes hex strings (surrounding whitespace ignored) into key material.
    pub fn from_hex(key_hex: &str, iv_hex: &str) -> Result<Self, KeyMaterialError> {
        let key = hex::decode(key_hex.trim())
            .map_err(|source| KeyMaterialError::Hex { which: "key", source })?;
        let iv = hex::decode(iv_hex.trim())
            .map_err(|source| KeyMaterialError::Hex { which: "iv", source })?;
        Self::new(&key, &iv)
    }

    /// Key size in bits.
    pub fn bits(&self) -> usize {
        match self.key {
            AesKey::Aes128(_) => 128,
            AesKey::Aes192(_) => 192,
            AesKey::Aes256(_) => 256,
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial").field("bits", &self.bits()).finish_non_exhaustive()
    }
}

/// Decrypts a catalog blob and strips its PKCS#7 padding.
///
/// The buffer is consumed and decrypted in place. A length that is not a
/// positive multiple of [`BLOCK_SIZE`] is rejected before the cipher runs.
pub fn decrypt(mut ciphertext: Vec<u8>, key: &KeyMaterial) -> Result<Vec<u8>, DecryptionError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(DecryptionError::InvalidLength { len: ciphertext.len() });
    }

    let iv = GenericArray::from(key.iv);
    let unpadded = match &key.key {
        AesKey::Aes128(k) => cbc::Decryptor::<Aes128>::new(&GenericArray::from(*k), &iv)
            .decrypt_padded_mut::<Pkcs7>(&mut ciphertext)
            .map(|plain| plain.len()),
        AesKey::Aes192(k) => cbc::Decryptor::<Aes192>::new(&GenericArray::from(*k), &iv)
            .decrypt_padded_mut::<Pkcs7>(&mut ciphertext)
            .map(|plain| plain.len()),
        AesKey::Aes256(k) => cbc::Decryptor::<Aes256>::new(&GenericArray::from(*k), &iv)
            .decrypt_padded_mut::<Pkcs7>(&mut ciphertext)
            .map(|plain| plain.len()),
    };
    let plain_len = unpadded.map_err(|_| DecryptionError::BadPadding)?;

    ciphertext.truncate(plain_len);
    Ok(ciphertext)
}

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use aes::Aes128;
use assetdiff::crypto::KeyMaterial;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use flate2::write::GzEncoder;
use flate2::Compression;

pub const KEY_HEX: &str = "2b7e151628aed2a6abf7158809cf4f3c";
pub const IV_HEX: &str = "000102030405060708090a0b0c0d0e0f";
pub const OTHER_KEY_HEX: &str = "603deb1015ca71be2b73aef0857d7781";

pub const CHARACTER_CSV: &str = "게임코드,캐릭터명(K),소속 부대\n\
    RKayamori,Ruka,31A\n\
    YIzumi,Yuki,31A\n\
    MTojo,Tsukasa,31B\n";

pub fn key() -> KeyMaterial {
    KeyMaterial::from_hex(KEY_HEX, IV_HEX).unwrap()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// AES-128-CBC + PKCS#7 with the fixture key. Test fixtures only.
pub fn encrypt(plain: &[u8]) -> Vec<u8> {
    let key: [u8; 16] = hex::decode(KEY_HEX).unwrap().try_into().unwrap();
    let iv: [u8; 16] = hex::decode(IV_HEX).unwrap().try_into().unwrap();
    cbc::Encryptor::<Aes128>::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plain)
}

/// Builds a catalog blob the way the game ships it: gzip, then encrypt.
pub fn seal_catalog(content: &[u8]) -> Vec<u8> {
    encrypt(&gzip(content))
}

/// Serialized-looking catalog content embedding the given paths in binary noise.
pub fn catalog_content(paths: &[&str]) -> Vec<u8> {
    let mut out = vec![0x01, 0x00, 0x00, 0x00, 0xfe];
    for (i, p) in paths.iter().enumerate() {
        out.extend_from_slice(&(p.len() as u32).to_le_bytes());
        out.extend_from_slice(p.as_bytes());
        out.extend_from_slice(&[0x00, i as u8, 0x80, 0xff]);
    }
    out
}

pub fn write_catalog(dir: &Path, name: &str, paths: &[&str]) -> PathBuf {
    write_file(dir, name, &seal_catalog(&catalog_content(paths)))
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

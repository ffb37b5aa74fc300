//! AES-256-GCM authenticated encryption with a detached tag.
//!
//! The vault layout keeps the tag in front of the ciphertext, so this
//! module hands the three parts back separately instead of the usual
//! `ciphertext || tag` blob.

use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce, Tag};

use crate::errors::{LakError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of a single `encrypt` call.
pub struct Sealed {
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` with a 32-byte `key` under a fresh random nonce.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| LakError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, b"", &mut buffer)
        .map_err(|e| LakError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut sealed = Sealed {
        nonce: [0u8; NONCE_LEN],
        tag: [0u8; TAG_LEN],
        ciphertext: buffer,
    };
    sealed.nonce.copy_from_slice(&nonce);
    sealed.tag.copy_from_slice(&tag);
    Ok(sealed)
}

/// Decrypt and authenticate.  Any failure, including a bad key length,
/// is reported as `WrongPasswordOrCorrupt`; no plaintext escapes.
pub fn decrypt(key: &[u8], nonce: &[u8], tag: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN || tag.len() != TAG_LEN {
        return Err(LakError::WrongPasswordOrCorrupt);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| LakError::WrongPasswordOrCorrupt)?;

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            b"",
            &mut buffer,
            Tag::from_slice(tag),
        )
        .map_err(|_| LakError::WrongPasswordOrCorrupt)?;

    Ok(buffer)
}

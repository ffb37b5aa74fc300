//! The encrypted vault envelope.
//!
//! A `.lak` file is a single base64 string (standard alphabet, padded)
//! wrapping this fixed-offset byte layout:
//!
//! ```text
//! [salt: 16 bytes][nonce: 12 bytes][GCM tag: 16 bytes][ciphertext: N bytes]
//! ```
//!
//! - **Salt**: random per encryption, feeds PBKDF2.  Not secret.
//! - **Nonce**: random per encryption.  Because the salt (and therefore
//!   the key) is fresh every time, a nonce is never reused under a key.
//! - **Tag**: AES-256-GCM authentication tag, checked before any
//!   plaintext is released.
//! - **Ciphertext**: the serialized dataset.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::crypto::{self, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::errors::{LakError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const SALT_END: usize = SALT_LEN;
const NONCE_END: usize = SALT_END + NONCE_LEN;

/// Bytes in front of the ciphertext: 16 (salt) + 12 (nonce) + 16 (tag).
pub const HEADER_LEN: usize = NONCE_END + TAG_LEN;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` under `password` and return the printable envelope.
pub fn encrypt(password: &[u8], plaintext: &[u8]) -> Result<String> {
    let salt = crypto::generate_salt();
    let key = crypto::derive_key(password, &salt)?;
    let sealed = crypto::encrypt(key.as_slice(), plaintext)?;

    let mut buf = Vec::with_capacity(HEADER_LEN + sealed.ciphertext.len());
    buf.extend_from_slice(&salt); // 16 bytes
    buf.extend_from_slice(&sealed.nonce); // 12 bytes
    buf.extend_from_slice(&sealed.tag); // 16 bytes
    buf.extend_from_slice(&sealed.ciphertext);

    tracing::debug!(
        plaintext_len = plaintext.len(),
        envelope_len = buf.len(),
        "sealed vault envelope"
    );

    Ok(BASE64.encode(buf))
}

/// Decrypt a printable envelope produced by `encrypt`.
///
/// Fails with `Format` when the text is not base64 or is shorter than the
/// fixed header, and with `WrongPasswordOrCorrupt` when authentication
/// fails.
pub fn decrypt(password: &[u8], envelope: &str) -> Result<Vec<u8>> {
    let data = BASE64
        .decode(envelope.trim())
        .map_err(|e| LakError::Format(format!("envelope is not valid base64: {e}")))?;

    if data.len() < HEADER_LEN {
        return Err(LakError::Format(format!(
            "envelope is {} bytes, shorter than the {HEADER_LEN}-byte header",
            data.len()
        )));
    }

    let salt = &data[..SALT_END];
    let nonce = &data[SALT_END..NONCE_END];
    let tag = &data[NONCE_END..HEADER_LEN];
    let ciphertext = &data[HEADER_LEN..];

    let key = crypto::derive_key(password, salt)?;
    let plaintext = crypto::decrypt(key.as_slice(), nonce, tag, ciphertext)?;

    tracing::debug!(plaintext_len = plaintext.len(), "opened vault envelope");
    Ok(plaintext)
}

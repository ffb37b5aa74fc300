//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is not stored in the vault file, so it is a fixed
//! constant shared by encryption and decryption.  Changing it makes every
//! existing vault unreadable.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::errors::{LakError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 round count used for every vault.
pub const KDF_ITERATIONS: u32 = 600_000;

/// Derive a 32-byte key from a password and salt.
///
/// The same password + salt always produce the same key.  The key is
/// returned in a `Zeroizing` buffer so it is wiped when dropped.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if salt.len() != SALT_LEN {
        return Err(LakError::KeyDerivationFailed(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, KDF_ITERATIONS, &mut *key);
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let k1 = derive_key(b"hunter2", &salt).unwrap();
        let k2 = derive_key(b"hunter2", &salt).unwrap();
        assert_eq!(*k1, *k2);
    }

    #[test]
    fn derive_key_depends_on_salt() {
        let k1 = derive_key(b"hunter2", &[1u8; SALT_LEN]).unwrap();
        let k2 = derive_key(b"hunter2", &[2u8; SALT_LEN]).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn derive_key_rejects_short_salt() {
        assert!(derive_key(b"pw", &[0u8; 8]).is_err());
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}

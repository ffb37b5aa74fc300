//! Cryptographic primitives for Lock and Key.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption with a detached tag (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)

pub mod encryption;
pub mod kdf;

pub use encryption::{decrypt, encrypt, Sealed, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, generate_salt, KDF_ITERATIONS, KEY_LEN, SALT_LEN};

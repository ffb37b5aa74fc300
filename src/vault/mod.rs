//! Vault module — the encrypted dataset.
//!
//! This module provides:
//! - The `.lak` envelope: salt, nonce, tag, ciphertext (`envelope`)
//! - Atomic vault file reads and writes (`file`)
//! - `Entry`, `Group` and friends (`model`)
//! - The in-memory relational `VaultStore` (`store`)
//! - Schema creation and validation (`schema`)
//! - Glob name filters (`glob`)

pub mod envelope;
pub mod file;
pub mod glob;
pub mod model;
pub mod schema;
mod session;
pub mod store;

// Re-export the most commonly used items.
pub use file::{open_vault, save_vault};
pub use glob::GlobPattern;
pub use model::{Entry, EntryDraft, EntryFilter, EntryRow, Group, Icon};
pub use store::VaultStore;

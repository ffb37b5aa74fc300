pub mod bridge;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod passgen;
pub mod vault;

//! Random password generation and a rough strength estimate.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{LakError, Result};

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const EXTRA: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
const URL_EXTRA: &str = "-_~.";

const CYRILLIC_LOWER: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюя";
const CYRILLIC_UPPER: &str = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

/// Pool size credited when a password contains a character outside every
/// known class.
const UNKNOWN_POOL: usize = 255;
const MAX_ENTROPY: f64 = 100.0;

/// Named character sets for `generate_password`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    Alphanumeric,
    #[default]
    Full,
    Urlsafe,
}

impl Charset {
    pub fn chars(self) -> Vec<char> {
        let parts: &[&str] = match self {
            Charset::Alphanumeric => &[LOWERCASE, UPPERCASE, DIGITS],
            Charset::Full => &[LOWERCASE, UPPERCASE, DIGITS, EXTRA],
            Charset::Urlsafe => &[LOWERCASE, UPPERCASE, URL_EXTRA],
        };
        parts.iter().flat_map(|p| p.chars()).collect()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Charset::Alphanumeric => "alphanumeric",
            Charset::Full => "full",
            Charset::Urlsafe => "urlsafe",
        };
        f.write_str(name)
    }
}

impl FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alphanumeric" => Ok(Charset::Alphanumeric),
            "full" => Ok(Charset::Full),
            "urlsafe" => Ok(Charset::Urlsafe),
            other => Err(format!(
                "unknown charset '{other}' (expected alphanumeric, full or urlsafe)"
            )),
        }
    }
}

/// Draw `length` characters uniformly from `charset` using the OS-seeded
/// thread RNG.
pub fn generate_password(charset: &[char], length: usize) -> Result<String> {
    if charset.is_empty() {
        return Err(LakError::Validation("password charset".into()));
    }
    let mut rng = rand::rng();
    Ok((0..length)
        .map(|_| charset[rng.random_range(0..charset.len())])
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Poor,
    Weak,
    Ok,
    Strong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::Poor => "poor",
            Strength::Weak => "weak",
            Strength::Ok => "ok",
            Strength::Strong => "strong",
        };
        f.write_str(label)
    }
}

/// Rate a password by its estimated entropy in bits (capped at 100).
pub fn evaluate_password(password: &str) -> (Strength, f64) {
    let length = password.chars().count() as f64;
    let entropy = (length * (pool_size(password) as f64).log2()).min(MAX_ENTROPY);

    let strength = match entropy {
        e if e >= 75.0 => Strength::Strong,
        e if e >= 50.0 => Strength::Ok,
        e if e >= 25.0 => Strength::Weak,
        _ => Strength::Poor,
    };
    (strength, entropy)
}

/// Sum of the sizes of every character class present in `password`.
fn pool_size(password: &str) -> usize {
    let lower = |c: char| LOWERCASE.contains(c);
    let upper = |c: char| UPPERCASE.contains(c);
    let digit = |c: char| DIGITS.contains(c);
    let extra = |c: char| EXTRA.contains(c);
    let cyrillic = |c: char| CYRILLIC_LOWER.contains(c) || CYRILLIC_UPPER.contains(c);

    let classes: [(&dyn Fn(char) -> bool, usize); 5] = [
        (&lower, 26),
        (&upper, 26),
        (&digit, 10),
        (&extra, EXTRA.len()),
        (&cyrillic, 66),
    ];

    let mut pool: usize = classes
        .iter()
        .filter(|(member, _)| password.chars().any(member))
        .map(|(_, size)| size)
        .sum();

    let unknown = password
        .chars()
        .any(|c| !classes.iter().any(|(member, _)| member(c)));
    if unknown {
        pool += UNKNOWN_POOL;
    }
    pool.max(1)
}

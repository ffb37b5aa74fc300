//! `lak generate` — print a random password and its strength.

use crate::cli::{output, settings};
use crate::errors::Result;
use crate::passgen::{evaluate_password, generate_password, Charset};

/// Execute the `generate` command.
pub fn execute(length: Option<usize>, charset: Option<Charset>) -> Result<()> {
    let settings = settings()?;
    let length = length.unwrap_or(settings.generator_length);
    let charset = charset.unwrap_or(settings.generator_charset);

    let password = generate_password(&charset.chars(), length)?;
    let (strength, entropy) = evaluate_password(&password);

    println!("{password}");
    output::tip(&format!("{charset}, {length} characters: {strength} ({entropy:.1} bits)"));

    Ok(())
}

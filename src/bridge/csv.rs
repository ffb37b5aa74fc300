//! Minimal RFC 4180 quoting for the tabular dump.
//!
//! Fields containing a comma, a double quote, CR or LF are wrapped in
//! double quotes with inner quotes doubled.  Everything else is written
//! bare.  A quoted field may span lines.

use std::fmt::Write;

use crate::errors::{LakError, Result};

/// Append one record (with trailing newline) to `out`.
pub fn write_record(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if needs_quotes(field) {
            let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n'])
}

/// `true` when `text` ends inside a quoted field, i.e. the record
/// continues on the next line.
///
/// Escaped quotes come in pairs, so the parity of the quote count is
/// enough.
pub fn is_unterminated(text: &str) -> bool {
    text.chars().filter(|&c| c == '"').count() % 2 == 1
}

/// Split one complete record into its fields.
pub fn parse_record(record: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = record.chars().peekable();
    let mut in_quotes = false;
    let mut was_quoted = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                other => field.push(other),
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                was_quoted = false;
            }
            '"' if field.is_empty() && !was_quoted => {
                in_quotes = true;
                was_quoted = true;
            }
            '"' => {
                return Err(LakError::Format(format!(
                    "stray quote in record: {}",
                    abbreviate(record)
                )));
            }
            _ if was_quoted => {
                return Err(LakError::Format(format!(
                    "text after closing quote in record: {}",
                    abbreviate(record)
                )));
            }
            other => field.push(other),
        }
    }

    if in_quotes {
        return Err(LakError::Format(format!(
            "unterminated quoted field in record: {}",
            abbreviate(record)
        )));
    }

    fields.push(field);
    Ok(fields)
}

/// Error messages must not echo a whole row: it may hold a secret.
fn abbreviate(record: &str) -> String {
    let head: String = record.chars().take(12).collect();
    format!("{head}…")
}

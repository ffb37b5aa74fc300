//! Glob patterns for entry-name search.
//!
//! User patterns use `*` (any run of characters, including none) and `?`
//! (exactly one character).  They are compiled into a small token list
//! and matched in Rust, so `%`, `_` and every other character are plain
//! literals no matter which engine runs the query.  Matching is
//! case-insensitive over the full Unicode range.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Name of the SQL function `register` installs: `glob_match(pattern, text)`.
pub const SQL_FUNCTION: &str = "glob_match";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyRun,
    AnyChar,
}

/// A compiled, lowercased glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    tokens: Vec<Token>,
}

impl GlobPattern {
    pub fn compile(pattern: &str) -> Self {
        let mut tokens = Vec::with_capacity(pattern.len());
        for c in pattern.to_lowercase().chars() {
            let token = match c {
                '*' => Token::AnyRun,
                '?' => Token::AnyChar,
                other => Token::Literal(other),
            };
            // Consecutive `*` collapse into one.
            if token == Token::AnyRun && tokens.last() == Some(&Token::AnyRun) {
                continue;
            }
            tokens.push(token);
        }
        Self { tokens }
    }

    /// Whole-string match (the pattern is anchored at both ends).
    pub fn matches(&self, text: &str) -> bool {
        let text: Vec<char> = text.to_lowercase().chars().collect();
        let tokens = &self.tokens;

        let (mut t, mut p) = (0usize, 0usize);
        // Position of the last `*` seen and the text index it resumed at.
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            match tokens.get(p) {
                Some(Token::AnyRun) => {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                Some(Token::AnyChar) => {
                    p += 1;
                    t += 1;
                    continue;
                }
                Some(Token::Literal(c)) if *c == text[t] => {
                    p += 1;
                    t += 1;
                    continue;
                }
                _ => {}
            }

            match backtrack {
                Some((star, resumed)) => {
                    p = star + 1;
                    t = resumed + 1;
                    backtrack = Some((star, resumed + 1));
                }
                None => return false,
            }
        }

        tokens[p..].iter().all(|token| *token == Token::AnyRun)
    }
}

/// Install `glob_match(pattern, text)` on a connection.
pub fn register(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        SQL_FUNCTION,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let pattern: String = ctx.get(0)?;
            let text: Option<String> = ctx.get(1)?;
            Ok(text.is_some_and(|t| GlobPattern::compile(&pattern).matches(&t)))
        },
    )
}

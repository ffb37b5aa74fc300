//! Entry and Group records as the store hands them out.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used by the `lastAccess` column.  It is the same
/// layout SQLite's `CURRENT_TIMESTAMP` produces.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    /// Stored verbatim: it has to come back out.
    pub secret: String,
    pub login: Option<String>,
    pub website: Option<String>,
    pub group_id: Option<i64>,
    /// UTC time of creation or last edit.
    pub last_access: Option<NaiveDateTime>,
}

/// A named, iconified label that entries can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub icon: Icon,
}

/// An entry joined with its owning group's display fields.
///
/// Entries without a group (or whose group is gone) carry `None` in both
/// group fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub entry: Entry,
    pub group_name: Option<String>,
    pub group_icon: Option<Icon>,
}

/// The mutable fields of an entry, used by both add and edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub name: String,
    pub secret: String,
    pub login: Option<String>,
    pub website: Option<String>,
    pub group_id: Option<i64>,
}

impl EntryDraft {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: secret.into(),
            ..Self::default()
        }
    }

    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

impl From<&Entry> for EntryDraft {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            secret: entry.secret.clone(),
            login: entry.login.clone(),
            website: entry.website.clone(),
            group_id: entry.group_id,
        }
    }
}

/// Filters for `VaultStore::list_entries`.  Both are optional and combine
/// with AND.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive glob on the entry name (`*` and `?`).
    pub text: Option<String>,
    pub group_id: Option<i64>,
}

impl EntryFilter {
    pub fn text(mut self, pattern: impl Into<String>) -> Self {
        self.text = Some(pattern.into());
        self
    }

    pub fn group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }
}

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

/// Group icon tokens.  Anything unrecognized falls back to `Key`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    #[default]
    Key,
    Controller,
    Database,
    Domino,
    Globe,
    Mail,
    Percent,
    Person,
    Terminal,
}

impl Icon {
    pub const ALL: [Icon; 9] = [
        Icon::Key,
        Icon::Controller,
        Icon::Database,
        Icon::Domino,
        Icon::Globe,
        Icon::Mail,
        Icon::Percent,
        Icon::Person,
        Icon::Terminal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Key => "key",
            Icon::Controller => "controller",
            Icon::Database => "database",
            Icon::Domino => "domino",
            Icon::Globe => "globe",
            Icon::Mail => "mail",
            Icon::Percent => "percent",
            Icon::Person => "person",
            Icon::Terminal => "terminal",
        }
    }

    /// Lenient lookup used for stored values: unknown or missing tokens
    /// become `Key`.
    pub fn from_token(token: Option<&str>) -> Self {
        token.and_then(|t| t.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Icon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Icon::ALL
            .into_iter()
            .find(|icon| icon.as_str() == wanted)
            .ok_or_else(|| format!("unknown icon '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_tokens_roundtrip() {
        for icon in Icon::ALL {
            assert_eq!(icon.as_str().parse::<Icon>().unwrap(), icon);
        }
    }

    #[test]
    fn icon_parse_is_case_insensitive() {
        assert_eq!("Globe".parse::<Icon>().unwrap(), Icon::Globe);
    }

    #[test]
    fn unknown_icon_falls_back_to_key() {
        assert_eq!(Icon::from_token(Some("unicorn")), Icon::Key);
        assert_eq!(Icon::from_token(None), Icon::Key);
    }

    #[test]
    fn draft_builder_sets_optional_fields() {
        let draft = EntryDraft::new("Mail", "p@ss").login("me").group(3);
        assert_eq!(draft.login.as_deref(), Some("me"));
        assert_eq!(draft.website, None);
        assert_eq!(draft.group_id, Some(3));
    }
}

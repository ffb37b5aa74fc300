//! Plain-text export and import of a vault dataset.
//!
//! The export format is UTF-8 text with up to two sections:
//!
//! ```text
//! # Entries:
//! secretId,name,secret,login,website,groupId,lastAccess
//! 1,Mail,hunter2,me@example.com,,1,2024-05-01 10:00:00
//!
//! # Groups:
//! groupId,name,iconId
//! 1,Personal,mail
//! ```
//!
//! The first line after a marker is that section's header.  A section is
//! left out when its table is empty.  **Secrets are written in clear
//! text**: whoever exports is responsible for the file.

pub mod csv;

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::params;

use crate::errors::{LakError, Result};
use crate::vault::model::{EntryDraft, EntryFilter, Icon, TIMESTAMP_FORMAT};
use crate::vault::store::{ensure_group, non_empty, validate_entry, validate_group_name};
use crate::vault::VaultStore;

pub const ENTRIES_MARKER: &str = "# Entries:";
pub const GROUPS_MARKER: &str = "# Groups:";

pub const ENTRY_COLUMNS: [&str; 7] = [
    "secretId",
    "name",
    "secret",
    "login",
    "website",
    "groupId",
    "lastAccess",
];
pub const GROUP_COLUMNS: [&str; 3] = ["groupId", "name", "iconId"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Entries,
    Groups,
}

impl Section {
    fn columns(self) -> &'static [&'static str] {
        match self {
            Section::Entries => &ENTRY_COLUMNS,
            Section::Groups => &GROUP_COLUMNS,
        }
    }
}

/// One entry row from an import.  `id: None` means "insert with a fresh id".
#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryRecord {
    id: Option<i64>,
    draft: EntryDraft,
    last_access: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupRecord {
    id: Option<i64>,
    name: String,
    icon: Icon,
}

#[derive(Debug, Default)]
struct Parsed {
    entries: Vec<EntryRecord>,
    groups: Vec<GroupRecord>,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Render the whole dataset as sectioned CSV text.
pub fn dump(store: &VaultStore) -> Result<String> {
    let entries = store.list_entries(&EntryFilter::default())?;
    let groups = store.list_groups()?;
    let mut out = String::new();

    if !entries.is_empty() {
        out.push_str(ENTRIES_MARKER);
        out.push('\n');
        csv::write_record(&mut out, &ENTRY_COLUMNS);
        for row in &entries {
            let e = &row.entry;
            let id = e.id.to_string();
            let group = e.group_id.map(|g| g.to_string()).unwrap_or_default();
            let last_access = e
                .last_access
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default();
            csv::write_record(
                &mut out,
                &[
                    id.as_str(),
                    e.name.as_str(),
                    e.secret.as_str(),
                    e.login.as_deref().unwrap_or_default(),
                    e.website.as_deref().unwrap_or_default(),
                    group.as_str(),
                    last_access.as_str(),
                ],
            );
        }
        out.push('\n');
    }

    if !groups.is_empty() {
        out.push_str(GROUPS_MARKER);
        out.push('\n');
        csv::write_record(&mut out, &GROUP_COLUMNS);
        for g in &groups {
            let id = g.id.to_string();
            csv::write_record(&mut out, &[id.as_str(), g.name.as_str(), g.icon.as_str()]);
        }
        out.push('\n');
    }

    tracing::debug!(entries = entries.len(), groups = groups.len(), "dumped dataset");
    Ok(out)
}

/// Write `dump(store)` to `path`.
pub fn dump_to_file(store: &VaultStore, path: &Path) -> Result<()> {
    let text = dump(store)?;
    fs::write(path, text)?;

    // Secrets are in clear text: owner-only on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    tracing::info!(path = %path.display(), "exported plain dataset");
    Ok(())
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Upsert every row of `text` into `store` and return the number of rows
/// applied.
///
/// Rows carrying an id replace the row with that id; rows without one are
/// inserted with a fresh id.  Nothing is applied unless every row is valid.
/// The store is marked dirty on success, even when no rows were applied.
pub fn restore(store: &VaultStore, text: &str) -> Result<usize> {
    let parsed = parse(text)?;

    for group in &parsed.groups {
        validate_group_name(&group.name)?;
    }
    for entry in &parsed.entries {
        validate_entry(&entry.draft)?;
    }

    let mut session = store.session();
    session.querying(|ctx| {
        for group in &parsed.groups {
            ctx.execute(
                "INSERT INTO groups (groupId, name, iconId) VALUES (?1, ?2, ?3)
                 ON CONFLICT(groupId) DO UPDATE
                 SET name = excluded.name, iconId = excluded.iconId",
                params![group.id, group.name, group.icon.as_str()],
            )?;
        }

        for entry in &parsed.entries {
            let draft = &entry.draft;
            if let Some(group_id) = draft.group_id {
                ensure_group(ctx, group_id)?;
            }
            ctx.execute(
                "INSERT INTO secrets (secretId, name, secret, login, website, groupId, lastAccess)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, COALESCE(?7, CURRENT_TIMESTAMP))
                 ON CONFLICT(secretId) DO UPDATE
                 SET name = excluded.name, secret = excluded.secret,
                     login = excluded.login, website = excluded.website,
                     groupId = excluded.groupId, lastAccess = excluded.lastAccess",
                params![
                    entry.id,
                    draft.name,
                    draft.secret,
                    non_empty(&draft.login),
                    non_empty(&draft.website),
                    draft.group_id,
                    entry.last_access,
                ],
            )?;
        }
        Ok(())
    })?;
    session.mark_dirty();

    let applied = parsed.entries.len() + parsed.groups.len();
    tracing::info!(
        entries = parsed.entries.len(),
        groups = parsed.groups.len(),
        "restored plain dataset"
    );
    Ok(applied)
}

/// Read `path` and `restore` it.
pub fn restore_from_file(store: &VaultStore, path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(LakError::NotFound(format!("Import file {}", path.display())));
    }
    let text = fs::read_to_string(path)?;
    restore(store, &text)
}

fn parse(text: &str) -> Result<Parsed> {
    let mut parsed = Parsed::default();
    let mut section: Option<Section> = None;
    let mut header: Option<Vec<String>> = None;
    // A record whose quoted field continues on the following line(s).
    let mut pending: Option<String> = None;

    // Split on '\n' only: a '\r' inside a quoted field is data.
    for raw in text.split('\n') {
        if let Some(mut record) = pending.take() {
            record.push('\n');
            record.push_str(raw);
            if csv::is_unterminated(&record) {
                pending = Some(record);
            } else if let Some(section) = section {
                let record = record.strip_suffix('\r').unwrap_or(&record);
                accept(&mut parsed, section, &mut header, record)?;
            }
            continue;
        }
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        let trimmed = line.trim();
        if trimmed.starts_with(ENTRIES_MARKER) {
            section = Some(Section::Entries);
            header = None;
            continue;
        }
        if trimmed.starts_with(GROUPS_MARKER) {
            section = Some(Section::Groups);
            header = None;
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(current) = section else {
            continue;
        };

        if csv::is_unterminated(line) {
            pending = Some(raw.to_string());
        } else {
            accept(&mut parsed, current, &mut header, line)?;
        }
    }

    if pending.is_some() {
        return Err(LakError::Format(
            "unterminated quoted field at end of input".into(),
        ));
    }
    Ok(parsed)
}

/// Handle one complete record: the first one in a section is its header.
fn accept(
    parsed: &mut Parsed,
    section: Section,
    header: &mut Option<Vec<String>>,
    record: &str,
) -> Result<()> {
    let fields = csv::parse_record(record)?;

    let Some(columns) = header.as_deref() else {
        *header = Some(check_header(section, fields)?);
        return Ok(());
    };

    if fields.len() != columns.len() {
        return Err(LakError::Format(format!(
            "row has {} fields, header has {}",
            fields.len(),
            columns.len()
        )));
    }

    let row = Row { columns, fields: &fields };
    match section {
        Section::Entries => parsed.entries.push(EntryRecord {
            id: row.id("secretId")?,
            draft: EntryDraft {
                name: row.text("name").to_string(),
                secret: row.text("secret").to_string(),
                login: row.optional("login"),
                website: row.optional("website"),
                group_id: row.id("groupId")?,
            },
            last_access: row.timestamp("lastAccess")?,
        }),
        Section::Groups => parsed.groups.push(GroupRecord {
            id: row.id("groupId")?,
            name: row.text("name").to_string(),
            icon: Icon::from_token(row.optional("iconId").as_deref()),
        }),
    }
    Ok(())
}

fn check_header(section: Section, fields: Vec<String>) -> Result<Vec<String>> {
    let known = section.columns();
    for (i, name) in fields.iter().enumerate() {
        if !known.contains(&name.as_str()) {
            return Err(LakError::Format(format!("unknown column '{name}'")));
        }
        if fields[..i].contains(name) {
            return Err(LakError::Format(format!("duplicate column '{name}'")));
        }
    }
    Ok(fields)
}

/// Field lookup by column name.  Absent columns read as empty.
struct Row<'a> {
    columns: &'a [String],
    fields: &'a [String],
}

impl Row<'_> {
    fn text(&self, column: &str) -> &str {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.fields[i].as_str())
            .unwrap_or_default()
    }

    fn optional(&self, column: &str) -> Option<String> {
        Some(self.text(column))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn id(&self, column: &str) -> Result<Option<i64>> {
        let value = self.text(column).trim();
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse()
            .map(Some)
            .map_err(|_| LakError::Format(format!("{column} is not an integer: '{value}'")))
    }

    fn timestamp(&self, column: &str) -> Result<Option<String>> {
        let value = self.text(column).trim();
        if value.is_empty() {
            return Ok(None);
        }
        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .map(|_| Some(value.to_string()))
            .map_err(|_| LakError::Format(format!("{column} is not a timestamp: '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_dumps_nothing() {
        let store = VaultStore::new().unwrap();
        assert_eq!(dump(&store).unwrap(), "");
    }

    #[test]
    fn groups_only_store_omits_entries_section() {
        let store = VaultStore::new().unwrap();
        store.add_group("Work", Icon::Terminal).unwrap();
        let text = dump(&store).unwrap();
        assert!(!text.contains(ENTRIES_MARKER));
        assert_eq!(text, "# Groups:\ngroupId,name,iconId\n1,Work,terminal\n\n");
    }

    #[test]
    fn nulls_become_empty_fields() {
        let store = VaultStore::new().unwrap();
        store.add_entry(&EntryDraft::new("Mail", "pw")).unwrap();
        let text = dump(&store).unwrap();
        let row = text.lines().nth(2).unwrap();
        assert!(row.starts_with("1,Mail,pw,,,,"));
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let store = VaultStore::new().unwrap();
        let text = "# exported by hand\n\n# Groups:\ngroupId,name,iconId\n# note\n\n7,Games,controller\n";
        assert_eq!(restore(&store, text).unwrap(), 1);
        assert_eq!(store.get_group(7).unwrap().unwrap().icon, Icon::Controller);
    }

    #[test]
    fn missing_id_inserts_fresh_row() {
        let store = VaultStore::new().unwrap();
        store.add_entry(&EntryDraft::new("first", "1")).unwrap();
        restore(&store, "# Entries:\nname,secret\nsecond,2\n").unwrap();
        let names: Vec<_> = store
            .list_entries(&EntryFilter::default())
            .unwrap()
            .into_iter()
            .map(|r| (r.entry.id, r.entry.name))
            .collect();
        assert_eq!(names, vec![(1, "first".into()), (2, "second".into())]);
    }

    #[test]
    fn existing_id_is_replaced() {
        let store = VaultStore::new().unwrap();
        store.add_entry(&EntryDraft::new("old", "1")).unwrap();
        restore(&store, "# Entries:\nsecretId,name,secret\n1,new,2\n").unwrap();
        let entry = store.get_entry(1).unwrap().unwrap();
        assert_eq!(entry.name, "new");
        assert_eq!(entry.secret, "2");
        assert_eq!(store.entry_count().unwrap(), 1);
    }

    #[test]
    fn replacing_a_group_keeps_its_entries() {
        let store = VaultStore::new().unwrap();
        let gid = store.add_group("Old", Icon::Key).unwrap();
        let eid = store.add_entry(&EntryDraft::new("a", "1").group(gid)).unwrap();
        restore(&store, "# Groups:\ngroupId,name,iconId\n1,New,mail\n").unwrap();
        assert_eq!(store.get_entry(eid).unwrap().unwrap().group_id, Some(gid));
        assert_eq!(store.get_group(gid).unwrap().unwrap().name, "New");
    }

    #[test]
    fn entry_may_reference_group_defined_later() {
        let store = VaultStore::new().unwrap();
        let text = "# Entries:\nsecretId,name,secret,groupId\n1,a,1,3\n\n# Groups:\ngroupId,name,iconId\n3,Later,\n";
        restore(&store, text).unwrap();
        assert_eq!(store.get_entry(1).unwrap().unwrap().group_id, Some(3));
        assert_eq!(store.get_group(3).unwrap().unwrap().icon, Icon::Key);
    }

    #[test]
    fn dangling_group_reference_rolls_back() {
        let store = VaultStore::new().unwrap();
        let text = "# Groups:\ngroupId,name,iconId\n1,G,key\n\n# Entries:\nname,secret,groupId\na,1,99\n";
        let err = restore(&store, text).unwrap_err();
        assert!(matches!(err, LakError::NotFound(_)));
        assert!(store.list_groups().unwrap().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn unknown_column_is_format_error() {
        let store = VaultStore::new().unwrap();
        let err = restore(&store, "# Entries:\nname,secret,color\na,1,red\n").unwrap_err();
        assert!(matches!(err, LakError::Format(_)));
    }

    #[test]
    fn short_row_is_format_error() {
        let store = VaultStore::new().unwrap();
        let err = restore(&store, "# Entries:\nname,secret\nlonely\n").unwrap_err();
        assert!(matches!(err, LakError::Format(_)));
    }

    #[test]
    fn bad_id_is_format_error() {
        let store = VaultStore::new().unwrap();
        let err = restore(&store, "# Groups:\ngroupId,name\nabc,G\n").unwrap_err();
        assert!(matches!(err, LakError::Format(_)));
    }

    #[test]
    fn missing_secret_is_validation_error() {
        let store = VaultStore::new().unwrap();
        let err = restore(&store, "# Entries:\nname\nonly-a-name\n").unwrap_err();
        assert!(matches!(err, LakError::Validation(_)));
        assert_eq!(store.entry_count().unwrap(), 0);
    }

    #[test]
    fn zero_rows_still_marks_dirty() {
        let store = VaultStore::new().unwrap();
        assert_eq!(restore(&store, "").unwrap(), 0);
        assert!(store.is_dirty());
    }

    #[test]
    fn quoted_multiline_secret_survives() {
        let source = VaultStore::new().unwrap();
        source
            .add_entry(&EntryDraft::new("key, \"ssh\"", "line one\nline two"))
            .unwrap();
        let text = dump(&source).unwrap();

        let target = VaultStore::new().unwrap();
        restore(&target, &text).unwrap();
        let entry = target.get_entry(1).unwrap().unwrap();
        assert_eq!(entry.name, "key, \"ssh\"");
        assert_eq!(entry.secret, "line one\nline two");
    }

    #[test]
    fn unterminated_quote_is_format_error() {
        let store = VaultStore::new().unwrap();
        let err = restore(&store, "# Entries:\nname,secret\na,\"open\n").unwrap_err();
        assert!(matches!(err, LakError::Format(_)));
    }

    #[test]
    fn restore_from_missing_file_is_not_found() {
        let store = VaultStore::new().unwrap();
        let err = restore_from_file(&store, Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LakError::NotFound(_)));
    }
}

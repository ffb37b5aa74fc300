//! The in-memory vault dataset.
//!
//! `VaultStore` owns one in-memory SQLite database holding the `secrets`
//! and `groups` tables.  It knows nothing about passwords or files: it
//! turns into a byte blob with `to_serialized` and comes back with
//! `from_serialized`, and the envelope layer encrypts that blob.

use std::path::Path;
use std::ptr::NonNull;

use chrono::{NaiveDateTime, Utc};
use rusqlite::serialize::OwnedData;
use rusqlite::types::ValueRef;
use rusqlite::{ffi, params, Connection, DatabaseName, OpenFlags, OptionalExtension, Row};

use crate::errors::{LakError, Result};

use super::glob;
use super::model::{Entry, EntryDraft, EntryFilter, EntryRow, Group, Icon, TIMESTAMP_FORMAT};
use super::schema;
use super::session::{QueryContext, Session, SharedDataset};

const ENTRY_SELECT: &str = "
    SELECT e.secretId, e.name, e.secret, e.login, e.website, e.groupId, e.lastAccess,
           g.name, g.iconId
    FROM secrets e
    LEFT JOIN groups g ON g.groupId = e.groupId";

/// The vault dataset.  Share it behind an `Arc` if several parts of an
/// application need it; every call takes its own short-lived session.
pub struct VaultStore {
    shared: SharedDataset,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create an empty dataset with the fixed schema.
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init(&conn)?;
        tracing::debug!("created empty vault dataset");
        Self::from_connection(conn)
    }

    /// Rebuild a dataset from the bytes `to_serialized` produced.
    ///
    /// Fails with `Format` if the bytes are not a database of the
    /// expected schema.
    pub fn from_serialized(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(LakError::Format("dataset snapshot is empty".into()));
        }

        let mut conn = Connection::open_in_memory()?;
        load_image(&mut conn, bytes)?;
        schema::validate(&conn)?;

        let store = Self::from_connection(conn)?;
        tracing::debug!(bytes = bytes.len(), "loaded vault dataset from snapshot");
        Ok(store)
    }

    /// Open an unencrypted dataset file (a bare SQLite database) and copy
    /// it into memory.  The file is opened read-only and never modified.
    pub fn from_external_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LakError::NotFound(format!("Dataset file {}", path.display())));
        }

        let source = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| LakError::Format(format!("cannot open {}: {e}", path.display())))?;

        let image = source
            .serialize(DatabaseName::Main)
            .map_err(|e| LakError::Format(format!("{} is not a dataset: {e}", path.display())))?;

        tracing::info!(path = %path.display(), "importing unencrypted dataset file");
        Self::from_serialized(&image)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::configure(&conn)?;
        glob::register(&conn)?;
        Ok(Self {
            shared: SharedDataset::new(conn),
        })
    }

    pub(crate) fn session(&self) -> Session<'_> {
        self.shared.session()
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Snapshot the whole committed dataset (schema and rows) as bytes.
    pub fn to_serialized(&self) -> Result<Vec<u8>> {
        let session = self.session();
        let image = session.conn().serialize(DatabaseName::Main)?;
        Ok(image.to_vec())
    }

    // ------------------------------------------------------------------
    // Dirty flag
    // ------------------------------------------------------------------

    /// `true` when the dataset changed since it was loaded or last
    /// marked persisted.
    pub fn is_dirty(&self) -> bool {
        self.session().is_dirty()
    }

    /// Record that the current contents were saved.  Call only after the
    /// encrypted file was written successfully.
    pub fn mark_persisted(&self) {
        self.session().mark_clean();
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Insert a new entry and return its id.
    pub fn add_entry(&self, draft: &EntryDraft) -> Result<i64> {
        validate_entry(draft)?;

        let mut session = self.session();
        let id = session.querying(|ctx| {
            if let Some(group_id) = draft.group_id {
                ensure_group(ctx, group_id)?;
            }
            ctx.execute(
                "INSERT INTO secrets (name, secret, login, website, groupId, lastAccess)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    draft.name,
                    draft.secret,
                    non_empty(&draft.login),
                    non_empty(&draft.website),
                    draft.group_id,
                    now(),
                ],
            )?;
            Ok(ctx.last_insert_rowid())
        })?;
        session.mark_dirty();

        tracing::debug!(entry_id = id, "added entry");
        Ok(id)
    }

    /// Replace every mutable field of entry `id`.
    pub fn edit_entry(&self, id: i64, draft: &EntryDraft) -> Result<()> {
        validate_entry(draft)?;

        let mut session = self.session();
        session.querying(|ctx| {
            if let Some(group_id) = draft.group_id {
                ensure_group(ctx, group_id)?;
            }
            let changed = ctx.execute(
                "UPDATE secrets
                 SET name = ?1, secret = ?2, login = ?3, website = ?4,
                     groupId = ?5, lastAccess = ?6
                 WHERE secretId = ?7",
                params![
                    draft.name,
                    draft.secret,
                    non_empty(&draft.login),
                    non_empty(&draft.website),
                    draft.group_id,
                    now(),
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(LakError::entry_not_found(id));
            }
            Ok(())
        })?;
        session.mark_dirty();

        tracing::debug!(entry_id = id, "edited entry");
        Ok(())
    }

    /// Remove entry `id`.  A missing id is a no-op and does not touch the
    /// dirty flag.
    pub fn delete_entry(&self, id: i64) -> Result<()> {
        let mut session = self.session();
        let removed = session.querying(|ctx| {
            Ok(ctx.execute("DELETE FROM secrets WHERE secretId = ?1", [id])?)
        })?;
        if removed > 0 {
            session.mark_dirty();
            tracing::debug!(entry_id = id, "deleted entry");
        }
        Ok(())
    }

    pub fn get_entry(&self, id: i64) -> Result<Option<Entry>> {
        let session = self.session();
        let entry = session
            .conn()
            .query_row(
                &format!("{ENTRY_SELECT} WHERE e.secretId = ?1"),
                [id],
                |row| entry_row(row).map(|r| r.entry),
            )
            .optional()?;
        Ok(entry)
    }

    /// List entries ordered by id, joined with their group's name and icon.
    ///
    /// An empty text filter is the same as no text filter.
    pub fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<EntryRow>> {
        let text = filter.text.as_deref().filter(|t| !t.is_empty());

        let session = self.session();
        let mut stmt = session.conn().prepare(&format!(
            "{ENTRY_SELECT}
             WHERE (?1 IS NULL OR e.groupId = ?1)
               AND (?2 IS NULL OR {}(?2, e.name))
             ORDER BY e.secretId",
            glob::SQL_FUNCTION
        ))?;
        let rows = stmt.query_map(params![filter.group_id, text], entry_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    pub fn add_group(&self, name: &str, icon: Icon) -> Result<i64> {
        validate_group_name(name)?;

        let mut session = self.session();
        let id = session.querying(|ctx| {
            ctx.execute(
                "INSERT INTO groups (name, iconId) VALUES (?1, ?2)",
                params![name, icon.as_str()],
            )?;
            Ok(ctx.last_insert_rowid())
        })?;
        session.mark_dirty();

        tracing::debug!(group_id = id, icon = %icon, "added group");
        Ok(id)
    }

    pub fn edit_group(&self, id: i64, name: &str, icon: Icon) -> Result<()> {
        validate_group_name(name)?;

        let mut session = self.session();
        session.querying(|ctx| {
            let changed = ctx.execute(
                "UPDATE groups SET name = ?1, iconId = ?2 WHERE groupId = ?3",
                params![name, icon.as_str(), id],
            )?;
            if changed == 0 {
                return Err(LakError::group_not_found(id));
            }
            Ok(())
        })?;
        session.mark_dirty();

        tracing::debug!(group_id = id, "edited group");
        Ok(())
    }

    pub fn get_group(&self, id: i64) -> Result<Option<Group>> {
        let session = self.session();
        let group = session
            .conn()
            .query_row(
                "SELECT groupId, name, iconId FROM groups WHERE groupId = ?1",
                [id],
                group_row,
            )
            .optional()?;
        Ok(group)
    }

    /// Delete group `id`, orphaning (never deleting) its entries.
    ///
    /// The orphaning update and the delete commit together.  A missing id
    /// is a no-op.
    pub fn delete_group(&self, id: i64) -> Result<()> {
        let mut session = self.session();
        let (orphaned, removed) = session.querying(|ctx| {
            let orphaned = ctx.execute(
                "UPDATE secrets SET groupId = NULL WHERE groupId = ?1",
                [id],
            )?;
            let removed = ctx.execute("DELETE FROM groups WHERE groupId = ?1", [id])?;
            Ok((orphaned, removed))
        })?;

        if orphaned > 0 || removed > 0 {
            session.mark_dirty();
            tracing::debug!(group_id = id, orphaned, "deleted group");
        }
        Ok(())
    }

    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let session = self.session();
        let mut stmt = session
            .conn()
            .prepare("SELECT groupId, name, iconId FROM groups ORDER BY groupId")?;
        let rows = stmt.query_map([], group_row)?;

        let mut groups = Vec::new();
        for row in rows {
            groups.push(row?);
        }
        Ok(groups)
    }

    /// Number of entries, for status lines.
    pub fn entry_count(&self) -> Result<usize> {
        let session = self.session();
        let count: i64 = session
            .conn()
            .query_row("SELECT COUNT(*) FROM secrets", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Helpers shared with the import bridge
// ---------------------------------------------------------------------------

/// Fail with `NotFound` unless group `id` exists.
pub(crate) fn ensure_group(ctx: &QueryContext<'_>, id: i64) -> Result<()> {
    let exists = ctx
        .query_row("SELECT 1 FROM groups WHERE groupId = ?1", [id], |_| Ok(()))
        .optional()?;
    exists.ok_or_else(|| LakError::group_not_found(id))
}

pub(crate) fn validate_entry(draft: &EntryDraft) -> Result<()> {
    validate_required("entry name", &draft.name)?;
    validate_required("entry secret", &draft.secret)
}

pub(crate) fn validate_group_name(name: &str) -> Result<()> {
    validate_required("group name", name)
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(LakError::Validation(field.to_string()));
    }
    Ok(())
}

/// Optional text fields are stored as NULL rather than "".
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Current UTC time in the `lastAccess` column layout.
pub(crate) fn now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(value: ValueRef<'_>) -> Option<NaiveDateTime> {
    match value {
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).ok()?;
            NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).ok()
        }
        _ => None,
    }
}

fn entry_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    let group_name: Option<String> = row.get(7)?;
    let group_icon = group_name
        .as_ref()
        .map(|_| row.get::<_, Option<String>>(8))
        .transpose()?
        .map(|token| Icon::from_token(token.as_deref()));

    Ok(EntryRow {
        entry: Entry {
            id: row.get(0)?,
            name: row.get(1)?,
            secret: row.get(2)?,
            login: row.get(3)?,
            website: row.get(4)?,
            group_id: row.get(5)?,
            last_access: parse_timestamp(row.get_ref(6)?),
        },
        group_name,
        group_icon,
    })
}

fn group_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    let icon: Option<String> = row.get(2)?;
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: Icon::from_token(icon.as_deref()),
    })
}

/// Replace the connection's main database with a copy of `image`.
fn load_image(conn: &mut Connection, image: &[u8]) -> Result<()> {
    let data = sqlite_copy(image)?;
    conn.deserialize(DatabaseName::Main, data, false)
        .map_err(|e| LakError::Format(format!("dataset snapshot rejected: {e}")))
}

/// Copy `image` into a buffer owned by SQLite's allocator, the only kind
/// `Connection::deserialize` accepts.
fn sqlite_copy(image: &[u8]) -> Result<OwnedData> {
    let size = image.len();
    let len = u64::try_from(size)
        .map_err(|_| LakError::Format("dataset snapshot is too large".into()))?;

    // SAFETY: sqlite3_malloc64 returns either null or a fresh allocation
    // of `len` bytes owned by SQLite's allocator.
    let raw = unsafe { ffi::sqlite3_malloc64(len) }.cast::<u8>();
    let ptr = NonNull::new(raw)
        .ok_or_else(|| LakError::Format("cannot allocate dataset snapshot".into()))?;

    // SAFETY: `ptr` points to `size` writable bytes that do not overlap
    // `image`, and was allocated by sqlite3_malloc64 as OwnedData requires.
    Ok(unsafe {
        std::ptr::copy_nonoverlapping(image.as_ptr(), ptr.as_ptr(), size);
        OwnedData::from_raw_nonnull(ptr, size)
    })
}

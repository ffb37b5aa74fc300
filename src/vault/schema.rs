//! The fixed dataset schema.
//!
//! Table and column names match the files written by earlier releases,
//! so a bare database from one of them opens without conversion.

use rusqlite::Connection;

use crate::errors::{LakError, Result};

/// Version marker written into `db_version` for new datasets.
pub const SCHEMA_VERSION: &str = "0.0.1";

const CREATE_SQL: &str = "
CREATE TABLE secrets (
    secretId INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    secret TEXT NOT NULL,
    login TEXT,
    website TEXT,
    groupId INTEGER,
    lastAccess TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY(groupId) REFERENCES groups(groupId) ON DELETE SET NULL
);
CREATE TABLE groups (
    groupId INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    iconId TEXT DEFAULT 'key'
);
CREATE TABLE db_version (
    version TEXT NOT NULL,
    upgradedAt TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
";

/// Columns every valid dataset must carry, per table.
const EXPECTED: &[(&str, &[&str])] = &[
    (
        "secrets",
        &[
            "secretId",
            "name",
            "secret",
            "login",
            "website",
            "groupId",
            "lastAccess",
        ],
    ),
    ("groups", &["groupId", "name", "iconId"]),
    ("db_version", &["version"]),
];

/// Create the tables and the version row on an empty connection.
pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_SQL)?;
    conn.execute(
        "INSERT INTO db_version (version) VALUES (?1)",
        [SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Connection-level settings applied to every dataset connection.
///
/// Foreign keys are off by default in SQLite; switching them on makes the
/// `ON DELETE SET NULL` clause fire however a group row disappears.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}

/// Check that `conn` holds a dataset of the expected schema.
///
/// Any engine error here (including "file is not a database") means the
/// bytes were not a dataset, so everything maps to `Format`.
pub fn validate(conn: &Connection) -> Result<()> {
    for (table, columns) in EXPECTED {
        let present = table_columns(conn, table)
            .map_err(|e| LakError::Format(format!("unreadable dataset: {e}")))?;

        if present.is_empty() {
            return Err(LakError::Format(format!("missing table '{table}'")));
        }
        for column in *columns {
            if !present.iter().any(|c| c == column) {
                return Err(LakError::Format(format!(
                    "table '{table}' is missing column '{column}'"
                )));
            }
        }
    }

    let versions: i64 = conn
        .query_row("SELECT COUNT(*) FROM db_version", [], |row| row.get(0))
        .map_err(|e| LakError::Format(format!("unreadable version marker: {e}")))?;
    if versions == 0 {
        return Err(LakError::Format("missing schema version marker".into()));
    }

    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let rows = stmt.query_map([table], |row| row.get::<_, String>(0))?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_schema_validates() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();
        assert!(validate(&conn).is_ok());
    }

    #[test]
    fn empty_database_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(validate(&conn), Err(LakError::Format(_))));
    }

    #[test]
    fn missing_column_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE secrets (secretId INTEGER PRIMARY KEY, name TEXT);
             CREATE TABLE groups (groupId INTEGER PRIMARY KEY, name TEXT, iconId TEXT);
             CREATE TABLE db_version (version TEXT);
             INSERT INTO db_version VALUES ('0.0.1');",
        )
        .unwrap();
        let err = validate(&conn).unwrap_err();
        assert!(err.to_string().contains("secret"));
    }

    #[test]
    fn version_row_is_written() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();
        let v: String = conn
            .query_row("SELECT version FROM db_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(v, SCHEMA_VERSION);
    }
}

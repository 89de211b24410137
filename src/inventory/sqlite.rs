use crate::error::Error;
use crate::inventory::InventorySource;
use crate::model::{FileRecord, SourceTag};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, warn};

/// Inventory backed by the SQLite database the original tooling writes
/// (`files`, `sonarr_files`, `plex_files` tables).
///
/// A connection is opened per `load` call; `rusqlite::Connection` is not
/// `Sync`, and the three snapshots are fetched from parallel workers.
pub struct SqliteInventory {
    db_path: String,
}

impl SqliteInventory {
    pub fn open(db_path: &str) -> Self {
        SqliteInventory {
            db_path: db_path.to_string(),
        }
    }

    fn connect(&self, source: SourceTag) -> Result<Connection, Error> {
        Connection::open(&self.db_path)
            .map_err(|e| Error::unavailable(source, format!("{}: {}", self.db_path, e)))
    }
}

impl InventorySource for SqliteInventory {
    fn load(&self, source: SourceTag) -> Result<Vec<FileRecord>, Error> {
        let conn = self.connect(source)?;
        let records = match source {
            SourceTag::Files => load_files(&conn),
            SourceTag::Sonarr => load_sonarr(&conn),
            SourceTag::Plex => load_plex(&conn),
        }
        .map_err(|e| Error::unavailable(source, e.to_string()))?;

        debug!("{}: loaded {} records from {}", source, records.len(), self.db_path);
        Ok(records)
    }
}

fn load_files(conn: &Connection) -> rusqlite::Result<Vec<FileRecord>> {
    let mut stmt = conn.prepare(
        "SELECT filename, filepath, creation_date, added_date, removed_date FROM files",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(FileRecord {
            filename: row.get(0)?,
            parent_path: row.get(1)?,
            created_at: parse_timestamp(row.get::<_, Option<String>>(2)?),
            added_at: parse_timestamp(row.get::<_, Option<String>>(3)?),
            removed_at: parse_removal(row.get::<_, Option<String>>(4)?),
        })
    })?;
    rows.collect()
}

fn load_sonarr(conn: &Connection) -> rusqlite::Result<Vec<FileRecord>> {
    let mut stmt =
        conn.prepare("SELECT file_path, added_date, removed_date FROM sonarr_files")?;
    let rows = stmt.query_map([], |row| {
        let file_path: String = row.get(0)?;
        // Sonarr stores one full path column; split at the last separator.
        // A separator-free path degrades to an empty parent, which the
        // engine skips as malformed.
        let (parent_path, filename) = match file_path.rsplit_once('/') {
            Some((parent, name)) => (parent.to_string(), name.to_string()),
            None => (String::new(), file_path),
        };
        Ok(FileRecord {
            parent_path,
            filename,
            created_at: None,
            added_at: parse_timestamp(row.get::<_, Option<String>>(1)?),
            removed_at: parse_removal(row.get::<_, Option<String>>(2)?),
        })
    })?;
    rows.collect()
}

fn load_plex(conn: &Connection) -> rusqlite::Result<Vec<FileRecord>> {
    let mut stmt =
        conn.prepare("SELECT filename, filepath, added_date, removed_date FROM plex_files")?;
    let rows = stmt.query_map([], |row| {
        Ok(FileRecord {
            filename: row.get(0)?,
            parent_path: row.get(1)?,
            created_at: None,
            added_at: parse_timestamp(row.get::<_, Option<String>>(2)?),
            removed_at: parse_removal(row.get::<_, Option<String>>(3)?),
        })
    })?;
    rows.collect()
}

/// Timestamps are RFC 3339 text written by `datetime.isoformat()`.
fn parse_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            warn!("Unparseable timestamp '{}': {}", raw, e);
            None
        }
    }
}

/// Liveness depends on `removed_date` being NULL, not on it parsing. A
/// non-NULL garbage value still marks the record removed, pinned to the
/// epoch.
fn parse_removal(raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            warn!("Unparseable removed_date '{}': {}", raw, e);
            Some(DateTime::UNIX_EPOCH)
        }
    }
}

use crate::api::models::{HistoryEntry, Sender};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no data directory available")]
    NoDataDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

fn db_path() -> Option<PathBuf> {
    Some(crate::config::project_dirs()?.data_dir().join("cache.sqlite"))
}

fn open_conn() -> Result<Connection, StorageError> {
    let path = db_path().ok_or(StorageError::NoDataDir)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(Connection::open(path)?)
}

// Caching chat history so the history page has something to show while the
// backend is slow or offline.
pub fn init() -> Result<(), StorageError> {
    create_schema(&open_conn()?)
}

pub fn upsert_history(entries: &[HistoryEntry], limit: usize) -> Result<(), StorageError> {
    let mut conn = open_conn()?;
    upsert_history_in(&mut conn, entries, limit)
}

pub fn cached_history(limit: usize) -> Result<Vec<HistoryEntry>, StorageError> {
    cached_history_in(&open_conn()?, limit)
}

pub(crate) fn create_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS history (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            content TEXT NOT NULL,
            timestamp TEXT,
            seq INTEGER NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Replaces cached rows with `entries` (backend order) and keeps only the
/// newest `limit` rows.
pub(crate) fn upsert_history_in(
    conn: &mut Connection,
    entries: &[HistoryEntry],
    limit: usize,
) -> Result<(), StorageError> {
    let tx = conn.transaction()?;
    let base: i64 = tx.query_row("SELECT COALESCE(MAX(seq), 0) FROM history", [], |row| row.get(0))?;
    for (idx, e) in entries.iter().enumerate() {
        tx.execute(
            r#"
            INSERT INTO history (id, kind, content, timestamp, seq)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                kind=excluded.kind,
                content=excluded.content,
                timestamp=excluded.timestamp,
                seq=excluded.seq
            "#,
            params![
                e.id,
                e.kind.as_str(),
                e.content,
                e.timestamp,
                base + idx as i64 + 1
            ],
        )?;
    }
    tx.execute(
        "DELETE FROM history WHERE seq NOT IN (SELECT seq FROM history ORDER BY seq DESC LIMIT ?1)",
        params![limit as i64],
    )?;
    tx.commit()?;
    Ok(())
}

/// Oldest first, at most `limit` rows.
pub(crate) fn cached_history_in(conn: &Connection, limit: usize) -> Result<Vec<HistoryEntry>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, content, timestamp FROM \
         (SELECT * FROM history ORDER BY seq DESC LIMIT ?1) ORDER BY seq ASC",
    )?;
    let rows = stmt.query_map(params![limit as i64], |row| {
        let kind: String = row.get(1)?;
        Ok(HistoryEntry {
            id: row.get(0)?,
            kind: if kind == "user" { Sender::User } else { Sender::Assistant },
            content: row.get(2)?,
            timestamp: row.get::<_, Option<DateTime<Utc>>>(3)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, kind: Sender, content: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.into(),
            kind,
            content: content.into(),
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .ok()
                .map(|t| t.with_timezone(&Utc)),
        }
    }

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn keeps_backend_order() {
        let mut conn = memory();
        let entries = vec![entry("a", Sender::User, "hello"), entry("b", Sender::Assistant, "hi")];
        upsert_history_in(&mut conn, &entries, 10).unwrap();
        assert_eq!(cached_history_in(&conn, 10).unwrap(), entries);
    }

    #[test]
    fn refetch_updates_rows_in_place() {
        let mut conn = memory();
        upsert_history_in(&mut conn, &[entry("a", Sender::User, "draft")], 10).unwrap();
        upsert_history_in(&mut conn, &[entry("a", Sender::User, "final")], 10).unwrap();
        let cached = cached_history_in(&conn, 10).unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].content, "final");
    }

    #[test]
    fn trims_to_newest_rows() {
        let mut conn = memory();
        let entries: Vec<_> = (0..5).map(|i| entry(&i.to_string(), Sender::User, "m")).collect();
        upsert_history_in(&mut conn, &entries, 3).unwrap();
        let ids: Vec<_> = cached_history_in(&conn, 10).unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }
}

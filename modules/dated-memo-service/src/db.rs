//! SQLite persistence for the shared document collection.
//!
//! One `documents` table holds records of every type; callers always filter
//! by the `type` discriminator. Dates are stored naive (no offset) and are
//! implicitly UTC.

use crate::error::{MemoError, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use std::sync::{Mutex, MutexGuard};

/// Fixed-width layout, so ordering the column as text is chronological.
pub const STORED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A document row with its date decoded into the persisted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: i64,
    pub date: NaiveDateTime,
    pub text: String,
}

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.create_tables()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| MemoError::LockPoisoned)
    }

    fn create_tables(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL,
                date TEXT NOT NULL,
                text TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_documents_type_date
             ON documents(type, date DESC)",
            [],
        )?;
        Ok(())
    }

    /// Insert a document and return the id the database assigned to it.
    pub fn insert_document(&self, kind: &str, date: NaiveDateTime, text: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO documents (type, date, text) VALUES (?1, ?2, ?3)",
            params![kind, date.format(STORED_DATE_FORMAT).to_string(), text],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All documents of one type, most recent date first.
    pub fn list_documents(&self, kind: &str) -> Result<Vec<StoredDocument>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, date, text FROM documents
             WHERE type = ?1
             ORDER BY date DESC, id DESC",
        )?;

        let rows = stmt
            .query_map(params![kind], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, raw, text)| {
                let date = NaiveDateTime::parse_from_str(&raw, STORED_DATE_FORMAT)
                    .map_err(|_| MemoError::CorruptRecord { id, raw })?;
                Ok(StoredDocument { id, date, text })
            })
            .collect()
    }

    /// Delete one document of the given type. Returns whether a row went away.
    pub fn delete_document(&self, kind: &str, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM documents WHERE id = ?1 AND type = ?2",
            params![id, kind],
        )?;
        Ok(removed > 0)
    }

    pub fn count_documents(&self, kind: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE type = ?1",
            params![kind],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&self, kind: &str, date: &str, text: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO documents (type, date, text) VALUES (?1, ?2, ?3)",
            params![kind, date, text],
        )?;
        Ok(conn.last_insert_rowid())
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<()> {
        self.conn()?.execute_batch(sql)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap()
    }

    #[test]
    fn list_filters_by_type_and_sorts_descending() {
        let db = Db::open(":memory:").unwrap();
        db.insert_document("dated_memo", at(2024, 1, 10), "older").unwrap();
        db.insert_document("other", at(2025, 6, 1), "not a memo").unwrap();
        db.insert_document("dated_memo", at(2024, 1, 20), "newer").unwrap();

        let docs = db.list_documents("dated_memo").unwrap();
        let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["newer", "older"]);
        assert_eq!(docs[0].date, at(2024, 1, 20));
    }

    #[test]
    fn delete_respects_type() {
        let db = Db::open(":memory:").unwrap();
        let other = db.insert_document("other", at(2024, 1, 1), "keep").unwrap();

        assert!(!db.delete_document("dated_memo", other).unwrap());
        assert_eq!(db.count_documents("other").unwrap(), 1);
        assert!(db.delete_document("other", other).unwrap());
        assert_eq!(db.count_documents("other").unwrap(), 0);
    }

    #[test]
    fn unreadable_date_is_reported() {
        let db = Db::open(":memory:").unwrap();
        let id = db.insert_raw("dated_memo", "next tuesday", "odd").unwrap();

        match db.list_documents("dated_memo") {
            Err(MemoError::CorruptRecord { id: bad, raw }) => {
                assert_eq!(bad, id);
                assert_eq!(raw, "next tuesday");
            }
            other => panic!("expected CorruptRecord, got {:?}", other),
        }
    }

    #[test]
    fn documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memos.db");
        let path = path.to_str().unwrap();

        {
            let db = Db::open(path).unwrap();
            db.insert_document("dated_memo", at(2024, 3, 1), "persisted").unwrap();
        }

        let db = Db::open(path).unwrap();
        let docs = db.list_documents("dated_memo").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "persisted");
    }
}

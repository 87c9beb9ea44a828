//! Memo store: the date-normalization contract over the document collection.

use crate::dates;
use crate::db::{Db, StoredDocument};
use crate::error::{MemoError, Result};
use dated_memo_types::{MEMO_TYPE, Memo};
use std::sync::Arc;

/// Backend identifier of a memo record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoId(pub i64);

impl std::str::FromStr for MemoId {
    type Err = MemoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(MemoError::InvalidId(s.to_string())),
        }
    }
}

impl std::fmt::Display for MemoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone)]
pub struct MemoStore {
    db: Arc<Db>,
}

impl MemoStore {
    pub fn new(db: Arc<Db>) -> Self {
        Self { db }
    }

    /// Every memo, most recent date first.
    pub fn list(&self) -> Result<Vec<Memo>> {
        Ok(self
            .db
            .list_documents(MEMO_TYPE)?
            .into_iter()
            .map(document_to_memo)
            .collect())
    }

    /// File a memo under the day after `raw_date` (`MM/DD/YYYY`, local time).
    pub fn create(&self, raw_date: &str, text: &str) -> Result<Memo> {
        let date = dates::parse_input_date(raw_date)?;
        let persisted = dates::to_persisted(dates::entry_instant(date)?);
        let id = self.db.insert_document(MEMO_TYPE, persisted, text)?;
        log::info!("Created memo {} dated {}", id, persisted);

        Ok(document_to_memo(StoredDocument {
            id,
            date: persisted,
            text: text.to_string(),
        }))
    }

    /// Remove a memo by id. A well-formed id that matches nothing is not an error.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let id: MemoId = id.parse()?;
        let removed = self.db.delete_document(MEMO_TYPE, id.0)?;
        if removed {
            log::info!("Removed memo {}", id);
        } else {
            log::debug!("No memo {} to remove", id);
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<i64> {
        self.db.count_documents(MEMO_TYPE)
    }
}

fn document_to_memo(doc: StoredDocument) -> Memo {
    Memo {
        id: doc.id.to_string(),
        kind: MEMO_TYPE.to_string(),
        date: dates::to_internal(doc.date),
        text: doc.text,
    }
}

//! Keyword list store used by presentation sessions.
//!
//! Sessions only need to load a list and write it back after every change.
//! Last write wins; there are no transactional guarantees across saves.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::db::{self, KeywordList, ListRepository};

#[async_trait]
pub trait KeywordStore: Send + Sync {
    async fn load(&self, list_id: &str) -> Result<Option<KeywordList>>;

    async fn save(&self, list: &KeywordList) -> Result<()>;
}

/// Store backed by the SQLite database.
pub struct SqliteKeywordStore {
    conn: Mutex<Connection>,
}

impl SqliteKeywordStore {
    pub fn open() -> Result<Self> {
        Ok(Self::new(db::init_db()?))
    }

    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl KeywordStore for SqliteKeywordStore {
    async fn load(&self, list_id: &str) -> Result<Option<KeywordList>> {
        let conn = self.conn.lock().await;
        ListRepository::get(&conn, list_id)
    }

    async fn save(&self, list: &KeywordList) -> Result<()> {
        let conn = self.conn.lock().await;
        ListRepository::save(&conn, list)?;
        debug!(
            "Saved list {} ({}/{} checked)",
            list.id,
            list.checked_count(),
            list.keywords.len()
        );
        Ok(())
    }
}

/// Store that keeps lists in memory only. Used for rehearsal runs that must
/// not touch the saved lists.
#[derive(Default)]
pub struct MemoryKeywordStore {
    lists: Mutex<HashMap<String, KeywordList>>,
}

impl MemoryKeywordStore {
    pub fn with_list(list: KeywordList) -> Self {
        let mut lists = HashMap::new();
        lists.insert(list.id.clone(), list);
        Self {
            lists: Mutex::new(lists),
        }
    }
}

#[async_trait]
impl KeywordStore for MemoryKeywordStore {
    async fn load(&self, list_id: &str) -> Result<Option<KeywordList>> {
        Ok(self.lists.lock().await.get(list_id).cloned())
    }

    async fn save(&self, list: &KeywordList) -> Result<()> {
        self.lists
            .lock()
            .await
            .insert(list.id.clone(), list.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrate, Keyword};

    fn sample_list() -> KeywordList {
        let mut list = KeywordList::new("Talk");
        list.keywords.push(Keyword::new("intro"));
        list.keywords.push(Keyword::new("summary"));
        list
    }

    #[tokio::test]
    async fn test_sqlite_store_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let store = SqliteKeywordStore::new(conn);

        let mut list = sample_list();
        assert!(store.load(&list.id).await.unwrap().is_none());

        store.save(&list).await.unwrap();
        list.keywords[0].checked = true;
        store.save(&list).await.unwrap();

        let loaded = store.load(&list.id).await.unwrap().unwrap();
        assert!(loaded.keywords[0].checked);
        assert!(!loaded.keywords[1].checked);
    }

    #[tokio::test]
    async fn test_memory_store_last_write_wins() {
        let mut list = sample_list();
        let store = MemoryKeywordStore::with_list(list.clone());

        list.name = "Renamed".to_string();
        store.save(&list).await.unwrap();

        let loaded = store.load(&list.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Renamed");
        assert!(store.load("other").await.unwrap().is_none());
    }
}

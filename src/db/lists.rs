//! Keyword list persistence.
//!
//! Raw SQL with rusqlite, no ORM. A list is stored as one `keyword_lists`
//! row plus its `keywords` rows ordered by `position`. Saving replaces the
//! whole list (last write wins).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection};

use super::schemas::{Keyword, KeywordList};

/// Repository for keyword lists.
pub struct ListRepository;

impl ListRepository {
    /// Insert or replace a list together with all of its keywords.
    pub fn save(conn: &Connection, list: &KeywordList) -> Result<()> {
        let tx = conn
            .unchecked_transaction()
            .context("Failed to begin list transaction")?;

        tx.execute(
            "INSERT INTO keyword_lists (id, name, last_modified) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, last_modified = excluded.last_modified",
            params![list.id, list.name, list.last_modified.to_rfc3339()],
        )
        .context("Failed to upsert keyword list")?;

        tx.execute("DELETE FROM keywords WHERE list_id = ?1", params![list.id])
            .context("Failed to clear keywords")?;

        for (position, keyword) in list.keywords.iter().enumerate() {
            tx.execute(
                "INSERT INTO keywords (id, list_id, position, text, checked) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    keyword.id,
                    list.id,
                    position as i64,
                    keyword.text,
                    keyword.checked
                ],
            )
            .context("Failed to insert keyword")?;
        }

        tx.commit().context("Failed to commit keyword list")?;
        Ok(())
    }

    /// Get a list by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<KeywordList>> {
        let mut stmt = conn
            .prepare("SELECT id, name, last_modified FROM keyword_lists WHERE id = ?1")
            .context("Failed to prepare keyword list query")?;

        let mut rows = stmt
            .query_map(params![id], |row| {
                let last_modified: String = row.get(2)?;
                Ok(KeywordList {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    keywords: Vec::new(),
                    last_modified: parse_timestamp(2, &last_modified)?,
                })
            })
            .context("Failed to query keyword list")?;

        let mut list = match rows.next() {
            Some(Ok(list)) => list,
            Some(Err(e)) => return Err(e.into()),
            None => return Ok(None),
        };

        list.keywords = Self::keywords_for(conn, &list.id)?;
        Ok(Some(list))
    }

    /// All lists, most recently modified first.
    pub fn list(conn: &Connection) -> Result<Vec<KeywordList>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, name, last_modified FROM keyword_lists \
                 ORDER BY last_modified DESC, name ASC",
            )
            .context("Failed to prepare keyword lists query")?;

        let rows = stmt
            .query_map([], |row| {
                let last_modified: String = row.get(2)?;
                Ok(KeywordList {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    keywords: Vec::new(),
                    last_modified: parse_timestamp(2, &last_modified)?,
                })
            })
            .context("Failed to list keyword lists")?;

        let mut lists = Vec::new();
        for row in rows {
            let mut list = row?;
            list.keywords = Self::keywords_for(conn, &list.id)?;
            lists.push(list);
        }

        Ok(lists)
    }

    /// Delete a list and its keywords. Returns false if the list did not exist.
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let tx = conn
            .unchecked_transaction()
            .context("Failed to begin delete transaction")?;

        tx.execute("DELETE FROM keywords WHERE list_id = ?1", params![id])
            .context("Failed to delete keywords")?;
        let deleted = tx
            .execute("DELETE FROM keyword_lists WHERE id = ?1", params![id])
            .context("Failed to delete keyword list")?;

        tx.commit().context("Failed to commit delete")?;
        Ok(deleted > 0)
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM keyword_lists", [], |row| row.get(0))
            .context("Failed to count keyword lists")?;

        Ok(count)
    }

    fn keywords_for(conn: &Connection, list_id: &str) -> Result<Vec<Keyword>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, text, checked FROM keywords WHERE list_id = ?1 ORDER BY position ASC",
            )
            .context("Failed to prepare keywords query")?;

        let keywords = stmt
            .query_map(params![list_id], |row| {
                Ok(Keyword {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    checked: row.get(2)?,
                })
            })
            .context("Failed to query keywords")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to map keywords")?;

        Ok(keywords)
    }
}

fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

//! Keyword list management.
//!
//! Business logic for creating and editing keyword lists, shared by the CLI
//! and the REST API. All edits go through `ListRepository::save`.

use crate::db::{Keyword, KeywordList, ListRepository};
use crate::matcher;
use anyhow::{anyhow, bail, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Display summary of a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub keyword_count: usize,
    pub progress: u8,
    pub last_modified: String,
}

impl From<&KeywordList> for ListSummary {
    fn from(list: &KeywordList) -> Self {
        Self {
            id: list.id.clone(),
            name: list.name.clone(),
            keyword_count: list.keywords.len(),
            progress: matcher::progress_percent(&list.keywords),
            last_modified: list.last_modified.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub fn create_list(conn: &Connection, name: &str) -> Result<KeywordList> {
    let name = name.trim();
    if name.is_empty() {
        bail!("List name cannot be empty");
    }

    let list = KeywordList::new(name);
    ListRepository::save(conn, &list)?;
    info!("Created list {} ({})", list.name, list.id);
    Ok(list)
}

pub fn get_list(conn: &Connection, list_id: &str) -> Result<KeywordList> {
    ListRepository::get(conn, list_id)?.ok_or_else(|| anyhow!("List {} not found", list_id))
}

/// Resolve a list by id, falling back to a case-insensitive name match.
/// Ambiguous names are an error.
pub fn find_list(conn: &Connection, key: &str) -> Result<KeywordList> {
    if let Some(list) = ListRepository::get(conn, key)? {
        return Ok(list);
    }

    let key = key.trim();
    let folded = key.to_lowercase();
    let mut matches: Vec<KeywordList> = all_lists(conn)?
        .into_iter()
        .filter(|list| list.name.to_lowercase() == folded)
        .collect();

    match matches.len() {
        0 => bail!("List {} not found", key),
        1 => Ok(matches.remove(0)),
        n => bail!("{} lists are named {:?}, use the list id instead", n, key),
    }
}

/// All lists, most recently modified first.
pub fn all_lists(conn: &Connection) -> Result<Vec<KeywordList>> {
    ListRepository::list(conn)
}

pub fn summaries(conn: &Connection) -> Result<Vec<ListSummary>> {
    Ok(all_lists(conn)?.iter().map(ListSummary::from).collect())
}

pub fn rename_list(conn: &Connection, list_id: &str, name: &str) -> Result<KeywordList> {
    let name = name.trim();
    if name.is_empty() {
        bail!("List name cannot be empty");
    }

    let mut list = get_list(conn, list_id)?;
    list.name = name.to_string();
    list.touch();
    ListRepository::save(conn, &list)?;
    Ok(list)
}

pub fn delete_list(conn: &Connection, list_id: &str) -> Result<()> {
    if !ListRepository::delete(conn, list_id)? {
        bail!("List {} not found", list_id);
    }
    info!("Deleted list {}", list_id);
    Ok(())
}

/// Append a keyword to a list. The text is trimmed but otherwise stored as typed.
pub fn add_keyword(conn: &Connection, list_id: &str, text: &str) -> Result<Keyword> {
    let text = text.trim();
    if text.is_empty() {
        bail!("Keyword cannot be empty");
    }

    let mut list = get_list(conn, list_id)?;
    let keyword = Keyword::new(text);
    list.keywords.push(keyword.clone());
    list.touch();
    ListRepository::save(conn, &list)?;
    Ok(keyword)
}

pub fn remove_keyword(conn: &Connection, list_id: &str, keyword_id: &str) -> Result<Keyword> {
    let mut list = get_list(conn, list_id)?;
    let index = list
        .keywords
        .iter()
        .position(|k| k.id == keyword_id)
        .ok_or_else(|| anyhow!("Keyword {} not found in list {}", keyword_id, list_id))?;

    let removed = list.keywords.remove(index);
    list.touch();
    ListRepository::save(conn, &list)?;
    Ok(removed)
}

use crate::db::{self, KeywordList, ListRepository};
use crate::lists::{self, ListSummary};
use anyhow::Result;

pub fn handle_lists_command() -> Result<()> {
    let conn = db::init_db()?;

    if ListRepository::count(&conn)? == 0 {
        println!("No keyword lists yet.");
        println!("\nCreate one with: cuecard create <NAME>");
        return Ok(());
    }

    let summaries = lists::summaries(&conn)?;
    println!("Found {} list(s):\n", summaries.len());
    for summary in &summaries {
        println!("{}", format_summary(summary));
    }

    Ok(())
}

pub fn handle_create_command(name: &str) -> Result<()> {
    let conn = db::init_db()?;
    let list = lists::create_list(&conn, name)?;
    println!("Created list {:?} ({})", list.name, list.id);
    Ok(())
}

pub fn handle_show_command(list: &str) -> Result<()> {
    let conn = db::init_db()?;
    let list = lists::find_list(&conn, list)?;
    print!("{}", format_list(&list));
    Ok(())
}

pub fn handle_add_command(list: &str, text: &str) -> Result<()> {
    let conn = db::init_db()?;
    let list = lists::find_list(&conn, list)?;
    let keyword = lists::add_keyword(&conn, &list.id, text)?;
    println!("Added {:?} to {} ({})", keyword.text, list.name, keyword.id);
    Ok(())
}

pub fn handle_remove_command(list: &str, keyword_id: &str) -> Result<()> {
    let conn = db::init_db()?;
    let list = lists::find_list(&conn, list)?;
    let keyword = lists::remove_keyword(&conn, &list.id, keyword_id)?;
    println!("Removed {:?} from {}", keyword.text, list.name);
    Ok(())
}

pub fn handle_rename_command(list: &str, name: &str) -> Result<()> {
    let conn = db::init_db()?;
    let list = lists::find_list(&conn, list)?;
    let renamed = lists::rename_list(&conn, &list.id, name)?;
    println!("Renamed {:?} to {:?}", list.name, renamed.name);
    Ok(())
}

pub fn handle_delete_command(list: &str) -> Result<()> {
    let conn = db::init_db()?;
    let list = lists::find_list(&conn, list)?;
    lists::delete_list(&conn, &list.id)?;
    println!("Deleted list {:?}", list.name);
    Ok(())
}

fn format_summary(summary: &ListSummary) -> String {
    format!(
        "{}  {:<30} {:>3} keyword(s) {:>3}%  {}",
        summary.id, summary.name, summary.keyword_count, summary.progress, summary.last_modified
    )
}

/// Checklist view of a list, one keyword per line.
pub fn format_list(list: &KeywordList) -> String {
    let mut out = format!(
        "{} ({}/{} said)\n",
        list.name,
        list.checked_count(),
        list.keywords.len()
    );
    for keyword in &list.keywords {
        let mark = if keyword.checked { "x" } else { " " };
        out.push_str(&format!("  [{}] {}  ({})\n", mark, keyword.text, keyword.id));
    }
    out
}

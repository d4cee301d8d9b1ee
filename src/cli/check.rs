use crate::db::{self, Keyword, KeywordList};
use crate::lists;
use crate::matcher::{self, KeywordMatcher, MatchOutcome};
use anyhow::Result;
use tracing::debug;

use super::lists::format_list;

pub fn handle_check_command(list: &str, transcript: &str) -> Result<()> {
    let conn = db::init_db()?;
    let list = lists::find_list(&conn, list)?;
    let matcher = KeywordMatcher::new()?;

    debug!("Normalized transcript: {:?}", matcher.normalize(transcript));
    let outcome = dry_run(&matcher, &list, transcript);

    let mut preview = list.clone();
    preview.keywords = outcome.keywords.clone();
    print!("{}", format_list(&preview));
    println!(
        "\n{} of {} keyword(s) matched ({}%){}",
        outcome.newly_matched.len(),
        list.keywords.len(),
        matcher::progress_percent(&outcome.keywords),
        if outcome.completed { ", list complete" } else { "" }
    );
    println!("Nothing was saved.");

    Ok(())
}

/// Evaluate `transcript` as if a session had just started on `list`.
pub fn dry_run(matcher: &KeywordMatcher, list: &KeywordList, transcript: &str) -> MatchOutcome {
    let fresh: Vec<Keyword> = list
        .keywords
        .iter()
        .map(|k| Keyword {
            checked: false,
            ..k.clone()
        })
        .collect();
    matcher.evaluate(transcript, &fresh)
}

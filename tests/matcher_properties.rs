//! Matching behaviour as seen by a presenter.

use cuecard::db::Keyword;
use cuecard::matcher::{is_complete, progress_percent, KeywordMatcher};

fn keywords(texts: &[&str]) -> Vec<Keyword> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Keyword::with_id(format!("k{i}"), *text))
        .collect()
}

fn checked(outcome_keywords: &[Keyword]) -> Vec<bool> {
    outcome_keywords.iter().map(|k| k.checked).collect()
}

#[test]
fn test_transcripts_that_grow_over_a_talk() {
    let matcher = KeywordMatcher::new().unwrap();
    let mut list = keywords(&["agenda", "climate change", "next steps"]);

    let snapshots = [
        "Good morning. The agenda",
        "Good morning. The agenda today is climate",
        "Good morning. The agenda today is climate change!",
        "",
        "Finally: next-steps.",
    ];
    let mut progress = Vec::new();
    for snapshot in snapshots {
        list = matcher.evaluate(snapshot, &list).keywords;
        progress.push(progress_percent(&list));
    }

    assert_eq!(progress, vec![33, 33, 67, 67, 100]);
    assert!(is_complete(&list));
}

#[test]
fn test_word_boundaries_for_single_words() {
    let matcher = KeywordMatcher::new().unwrap();
    let list = keywords(&["cat", "art"]);

    let outcome = matcher.evaluate("Concatenate the cats; start the party", &list);
    assert_eq!(checked(&outcome.keywords), vec![false, false]);

    let outcome = matcher.evaluate("A CAT... and (art)", &list);
    assert_eq!(checked(&outcome.keywords), vec![true, false]);
}

#[test]
fn test_phrases_need_adjacent_words() {
    let matcher = KeywordMatcher::new().unwrap();
    let list = keywords(&["climate change"]);

    assert!(!matcher.evaluate("climate is changing", &list).completed);
    assert!(!matcher.evaluate("change climate", &list).completed);
    assert!(matcher.evaluate("Climate,   Change!", &list).completed);
}

#[test]
fn test_blank_keywords_never_match() {
    let matcher = KeywordMatcher::new().unwrap();
    let list = keywords(&["?!", "   "]);

    let outcome = matcher.evaluate("anything at all ?!", &list);
    assert!(outcome.newly_matched.is_empty());
    assert!(!outcome.completed);
}

#[test]
fn test_empty_list_is_never_complete() {
    let matcher = KeywordMatcher::new().unwrap();
    let outcome = matcher.evaluate("hello", &[]);
    assert!(!outcome.completed);
    assert_eq!(progress_percent(&[]), 0);
}

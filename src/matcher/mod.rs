//! Keyword spotting over live transcript snapshots.
//!
//! Every call evaluates the complete snapshot; nothing is diffed against the
//! previous one. Keywords that arrive checked stay checked.

use anyhow::Result;
use std::collections::HashSet;
use tracing::debug;

use crate::db::{Keyword, KeywordId};
use crate::normalizer::{KeywordNormalizer, TextNormalizer};

/// Result of evaluating one transcript snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub keywords: Vec<Keyword>,
    pub newly_matched: Vec<KeywordId>,
    pub completed: bool,
}

impl MatchOutcome {
    pub fn changed(&self) -> bool {
        !self.newly_matched.is_empty()
    }
}

pub struct KeywordMatcher {
    normalizer: Box<dyn TextNormalizer>,
}

impl KeywordMatcher {
    pub fn new() -> Result<Self> {
        Ok(Self::with_normalizer(Box::new(KeywordNormalizer::new()?)))
    }

    pub fn with_normalizer(normalizer: Box<dyn TextNormalizer>) -> Self {
        debug!("Matching with {}", normalizer.name());
        Self { normalizer }
    }

    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    pub fn evaluate(&self, transcript: &str, keywords: &[Keyword]) -> MatchOutcome {
        let normalized_transcript = self.normalizer.normalize(transcript);
        let transcript_tokens: HashSet<&str> = tokens(&normalized_transcript).collect();

        let mut newly_matched = Vec::new();
        let updated: Vec<Keyword> = keywords
            .iter()
            .map(|keyword| {
                if keyword.checked {
                    return keyword.clone();
                }

                if self.is_said(&normalized_transcript, &transcript_tokens, &keyword.text) {
                    debug!("Keyword matched: {:?}", keyword.text);
                    newly_matched.push(keyword.id.clone());
                    Keyword {
                        checked: true,
                        ..keyword.clone()
                    }
                } else {
                    keyword.clone()
                }
            })
            .collect();

        let completed = is_complete(&updated);

        MatchOutcome {
            keywords: updated,
            newly_matched,
            completed,
        }
    }

    fn is_said(
        &self,
        normalized_transcript: &str,
        transcript_tokens: &HashSet<&str>,
        keyword_text: &str,
    ) -> bool {
        let normalized_keyword = self.normalizer.normalize(keyword_text);
        let keyword_tokens: Vec<&str> = tokens(&normalized_keyword).collect();

        match keyword_tokens.as_slice() {
            // Nothing left after normalization: can never be said
            [] => false,
            [single] => transcript_tokens.contains(single),
            phrase => normalized_transcript.contains(&phrase.join(" ")),
        }
    }
}

fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|token| !token.is_empty())
}

/// True when the list is non-empty and every keyword is checked.
pub fn is_complete(keywords: &[Keyword]) -> bool {
    !keywords.is_empty() && keywords.iter().all(|k| k.checked)
}

/// Rounded percentage of checked keywords; an empty list is 0%.
pub fn progress_percent(keywords: &[Keyword]) -> u8 {
    if keywords.is_empty() {
        return 0;
    }
    let checked = keywords.iter().filter(|k| k.checked).count();
    ((checked as f64 / keywords.len() as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::new().unwrap()
    }

    fn kw(id: &str, text: &str) -> Keyword {
        Keyword::with_id(id, text)
    }

    fn checked(id: &str, text: &str) -> Keyword {
        Keyword {
            checked: true,
            ..kw(id, text)
        }
    }

    #[test]
    fn test_single_token_requires_whole_word() {
        let m = matcher();
        let keywords = vec![kw("1", "cat")];

        assert!(!m.evaluate("concatenate", &keywords).keywords[0].checked);
        assert!(!m.evaluate("two cats", &keywords).keywords[0].checked);

        let outcome = m.evaluate("the cat sat", &keywords);
        assert!(outcome.keywords[0].checked);
        assert_eq!(outcome.newly_matched, vec!["1".to_string()]);
    }

    #[test]
    fn test_phrase_containment() {
        let m = matcher();
        let keywords = vec![kw("1", "climate change")];

        assert!(m.evaluate("the climate change panel", &keywords).keywords[0].checked);
        assert!(!m.evaluate("the climate is changing", &keywords).keywords[0].checked);
        assert!(!m.evaluate("change climate", &keywords).keywords[0].checked);
    }

    #[test]
    fn test_punctuation_and_case_invariance() {
        let m = matcher();
        let keywords = vec![kw("1", "climate change"), kw("2", "Net-Zero")];

        let outcome = m.evaluate("Climate, Change! We need net zero.", &keywords);
        assert!(outcome.keywords.iter().all(|k| k.checked));
        assert!(outcome.completed);
    }

    #[test]
    fn test_keyword_with_surrounding_punctuation() {
        let m = matcher();
        let keywords = vec![kw("1", "\"budget\"")];
        assert!(m.evaluate("our budget is fine", &keywords).keywords[0].checked);
    }

    #[test]
    fn test_sticky_against_empty_transcript() {
        let m = matcher();
        let keywords = vec![checked("1", "intro"), kw("2", "outro")];

        let outcome = m.evaluate("", &keywords);
        assert!(outcome.keywords[0].checked);
        assert!(!outcome.keywords[1].checked);
        assert!(!outcome.changed());
        assert!(!outcome.completed);
    }

    #[test]
    fn test_idempotent_re_evaluation() {
        let m = matcher();
        let keywords = vec![kw("1", "alpha"), kw("2", "beta gamma"), kw("3", "delta")];
        let transcript = "alpha and beta gamma";

        let first = m.evaluate(transcript, &keywords);
        assert_eq!(first.newly_matched.len(), 2);

        let second = m.evaluate(transcript, &first.keywords);
        assert!(second.newly_matched.is_empty());
        assert_eq!(second.keywords, first.keywords);
        assert_eq!(second.completed, first.completed);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let m = matcher();
        let keywords = vec![kw("1", "alpha")];
        let outcome = m.evaluate("alpha", &keywords);
        assert!(outcome.keywords[0].checked);
        assert!(!keywords[0].checked);
    }

    #[test]
    fn test_punctuation_only_keyword_never_matches() {
        let m = matcher();
        let keywords = vec![kw("1", "?!"), kw("2", "")];
        let outcome = m.evaluate("?! anything at all", &keywords);
        assert!(outcome.keywords.iter().all(|k| !k.checked));
        assert!(!outcome.completed);
    }

    #[test]
    fn test_completion_semantics() {
        let m = matcher();
        assert!(!m.evaluate("anything", &[]).completed);

        let partial = m.evaluate("alpha", &[kw("1", "alpha"), kw("2", "beta")]);
        assert!(!partial.completed);

        let all = m.evaluate("beta", &partial.keywords);
        assert!(all.completed);
        assert_eq!(all.newly_matched, vec!["2".to_string()]);
    }

    #[test]
    fn test_order_does_not_affect_matching() {
        let m = matcher();
        let forward = vec![kw("1", "alpha"), kw("2", "beta")];
        let reversed = vec![kw("2", "beta"), kw("1", "alpha")];

        let a = m.evaluate("beta then alpha", &forward);
        let b = m.evaluate("beta then alpha", &reversed);
        assert!(a.completed && b.completed);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(&[]), 0);
        assert_eq!(
            progress_percent(&[checked("1", "a"), kw("2", "b"), kw("3", "c")]),
            33
        );
        assert_eq!(progress_percent(&[checked("1", "a"), kw("2", "b")]), 50);
        assert_eq!(
            progress_percent(&[checked("1", "a"), checked("2", "b"), kw("3", "c")]),
            67
        );
        assert_eq!(progress_percent(&[checked("1", "a")]), 100);
    }
}

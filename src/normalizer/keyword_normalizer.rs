use anyhow::Result;
use regex::Regex;

use crate::normalizer::TextNormalizer;

/// Normalizer shared by transcripts and keywords: lowercase, punctuation
/// becomes a space, whitespace runs collapse to one space.
///
/// Leading and trailing spaces are kept (collapsed, not trimmed). Tokenizers
/// downstream discard the empty tokens this produces.
pub struct KeywordNormalizer {
    punctuation_regex: Regex,
    whitespace_regex: Regex,
}

impl KeywordNormalizer {
    pub fn new() -> Result<Self> {
        // . , ; : ! ? - " '
        let punctuation_regex = Regex::new(r#"[.,;:!?\-"']"#)?;
        let whitespace_regex = Regex::new(r"\s+")?;

        Ok(Self {
            punctuation_regex,
            whitespace_regex,
        })
    }
}

impl TextNormalizer for KeywordNormalizer {
    fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let spaced = self.punctuation_regex.replace_all(&lowered, " ");
        self.whitespace_regex.replace_all(&spaced, " ").into_owned()
    }

    fn name(&self) -> &'static str {
        "KeywordNormalizer"
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type KeywordId = String;
pub type ListId = String;

/// One phrase to listen for. `text` is kept exactly as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: KeywordId,
    pub text: String,
    pub checked: bool,
}

impl Keyword {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            checked: false,
        }
    }

    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            checked: false,
        }
    }
}

/// A named, ordered set of keywords. Order is display order only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordList {
    pub id: ListId,
    pub name: String,
    pub keywords: Vec<Keyword>,
    pub last_modified: DateTime<Utc>,
}

impl KeywordList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            keywords: Vec::new(),
            last_modified: Utc::now(),
        }
    }

    pub fn keyword(&self, id: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.id == id)
    }

    pub fn checked_count(&self) -> usize {
        self.keywords.iter().filter(|k| k.checked).count()
    }

    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keyword_is_unchecked_with_unique_id() {
        let a = Keyword::new("climate change");
        let b = Keyword::new("climate change");
        assert!(!a.checked);
        assert_ne!(a.id, b.id);
        assert_eq!(a.text, "climate change");
    }

    #[test]
    fn test_list_lookup_and_counts() {
        let mut list = KeywordList::new("Keynote");
        list.keywords.push(Keyword::with_id("k1", "intro"));
        list.keywords.push(Keyword {
            checked: true,
            ..Keyword::with_id("k2", "outro")
        });

        assert_eq!(list.keyword("k2").map(|k| k.text.as_str()), Some("outro"));
        assert!(list.keyword("missing").is_none());
        assert_eq!(list.checked_count(), 1);
    }

    #[test]
    fn test_keyword_serialization_uses_checked_field() {
        let keyword = Keyword::with_id("k1", "intro");
        let json = serde_json::to_string(&keyword).unwrap();
        assert_eq!(json, r#"{"id":"k1","text":"intro","checked":false}"#);
    }
}

//! Sets of node ids and emoji markers, and their text form.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Separators accepted between tokens: ASCII and full-width comma.
const SEPARATORS: [char; 2] = [',', '，'];

/// An unordered set of non-empty, trimmed tokens.
///
/// Used both for node ids that act as subfolders and for icon glyphs that
/// mark a document as a subfolder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet(BTreeSet<String>);

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Insert a token. Returns `false` if it was already present.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.0.insert(token.into())
    }

    /// Remove a token. Returns `false` if it was absent.
    pub fn remove(&mut self, token: &str) -> bool {
        self.0.remove(token)
    }

    /// Flip membership of `token`, returning `true` if it is now present.
    pub fn toggle(&mut self, token: &str) -> bool {
        if self.0.remove(token) {
            false
        } else {
            self.0.insert(token.to_string());
            true
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Parse a comma separated list into a set.
///
/// Both `,` and `，` separate tokens. Tokens are trimmed and empty ones are
/// dropped, so `"a, b ,，c,"` yields `{a, b, c}`.
pub fn parse_set(text: &str) -> MarkerSet {
    text.split(SEPARATORS)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Join a set with ASCII commas. Order carries no meaning.
pub fn serialize_set(set: &MarkerSet) -> String {
    set.iter().collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(tokens: &[&str]) -> MarkerSet {
        tokens.iter().copied().collect()
    }

    #[test]
    fn test_parse_mixed_separators() {
        assert_eq!(parse_set("a, b ,，c,"), set_of(&["a", "b", "c"]));
    }

    #[test]
    fn test_parse_empty_and_blank() {
        assert!(parse_set("").is_empty());
        assert!(parse_set(" , ，  ,").is_empty());
    }

    #[test]
    fn test_parse_collapses_duplicates() {
        let set = parse_set("20240101-abc, 20240101-abc，20240101-abc");
        assert_eq!(set.len(), 1);
        assert!(set.contains("20240101-abc"));
    }

    #[test]
    fn test_parse_emoji_tokens() {
        let set = parse_set("📁，🗂️ , 📂");
        assert!(set.contains("📁"));
        assert!(set.contains("🗂️"));
        assert!(set.contains("📂"));
    }

    #[test]
    fn test_serialize_then_parse_is_fixed_point() {
        let set = set_of(&["x", "y"]);
        assert_eq!(parse_set(&serialize_set(&set)), set);
    }

    #[test]
    fn test_serialize_empty() {
        assert_eq!(serialize_set(&MarkerSet::new()), "");
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut set = MarkerSet::new();
        assert!(set.toggle("id"));
        assert!(set.contains("id"));
        assert!(!set.toggle("id"));
        assert!(!set.contains("id"));
        assert!(set.toggle("id"));
        assert!(set.contains("id"));
    }

    #[test]
    fn test_insert_and_remove_are_idempotent() {
        let mut set = MarkerSet::new();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
        assert!(set.remove("a"));
        assert!(!set.remove("a"));
    }
}

//! Key sequence assignment and decoding.

use crate::config::KEY_ALPHABET;

/// Code for the entry at `index`: `a..z`, then `aa..az, ba..`, and so on.
///
/// This is bijective base-26, which matches
/// `letter((i-26)/26) + letter((i-26)%26)` for every two-letter index.
pub fn code_for_index(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(KEY_ALPHABET[n % 26]);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Codes for one scan result, in result order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySequenceMap {
    codes: Vec<String>,
}

/// How a typed sequence relates to the assigned codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceMatch {
    /// Exactly the code of this entry.
    Exact(usize),
    /// A strict prefix of at least one code.
    Prefix,
    /// No code starts with it.
    Dead,
}

impl KeySequenceMap {
    pub fn for_len(len: usize) -> Self {
        Self {
            codes: (0..len).map(code_for_index).collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_codes(codes: Vec<String>) -> Self {
        Self { codes }
    }

    pub fn code(&self, index: usize) -> Option<&str> {
        self.codes.get(index).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Exact matches win over prefixes.
    pub fn lookup(&self, sequence: &str) -> SequenceMatch {
        if let Some(index) = self.codes.iter().position(|code| code == sequence) {
            return SequenceMatch::Exact(index);
        }
        if self
            .codes
            .iter()
            .any(|code| code.len() > sequence.len() && code.starts_with(sequence))
        {
            SequenceMatch::Prefix
        } else {
            SequenceMatch::Dead
        }
    }
}

/// A key press, reduced to what the overlay cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Letter(char),
    Escape,
    Backspace,
    Other,
}

impl NavKey {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Self {
        match key {
            "Escape" => Self::Escape,
            "Backspace" => Self::Backspace,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_lowercase() => Self::Letter(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letters() {
        assert_eq!(code_for_index(0), "a");
        assert_eq!(code_for_index(25), "z");
    }

    #[test]
    fn test_two_letters() {
        assert_eq!(code_for_index(26), "aa");
        assert_eq!(code_for_index(27), "ab");
        assert_eq!(code_for_index(51), "az");
        assert_eq!(code_for_index(52), "ba");
        assert_eq!(code_for_index(701), "zz");
    }

    #[test]
    fn test_matches_two_letter_formula() {
        for i in 26..702 {
            let hi = KEY_ALPHABET[(i - 26) / 26] as char;
            let lo = KEY_ALPHABET[(i - 26) % 26] as char;
            assert_eq!(code_for_index(i), format!("{hi}{lo}"));
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let map = KeySequenceMap::for_len(800);
        let mut codes: Vec<_> = (0..800).map(|i| map.code(i).unwrap()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 800);
        assert_eq!(map.code(702), Some("aaa"));
    }

    #[test]
    fn test_lookup_thirty_entries() {
        let map = KeySequenceMap::for_len(30);
        assert_eq!(map.len(), 30);
        assert_eq!(map.lookup("a"), SequenceMatch::Exact(0));
        assert_eq!(map.lookup("ab"), SequenceMatch::Exact(27));
        assert_eq!(map.lookup("b"), SequenceMatch::Exact(1));
        assert_eq!(map.lookup("ae"), SequenceMatch::Dead);
        assert_eq!(map.lookup("ba"), SequenceMatch::Dead);
    }

    #[test]
    fn test_lookup_prefix() {
        let map = KeySequenceMap::for_len(60);
        assert_eq!(map.lookup("b"), SequenceMatch::Exact(1));
        assert_eq!(map.lookup(""), SequenceMatch::Prefix);
        let small = KeySequenceMap::for_len(3);
        assert_eq!(small.lookup("d"), SequenceMatch::Dead);
        assert!(KeySequenceMap::for_len(0).is_empty());
    }

    #[test]
    fn test_nav_keys() {
        assert_eq!(NavKey::from_key("a"), NavKey::Letter('a'));
        assert_eq!(NavKey::from_key("A"), NavKey::Other);
        assert_eq!(NavKey::from_key("Escape"), NavKey::Escape);
        assert_eq!(NavKey::from_key("Backspace"), NavKey::Backspace);
        assert_eq!(NavKey::from_key("Enter"), NavKey::Other);
        assert_eq!(NavKey::from_key("1"), NavKey::Other);
    }
}

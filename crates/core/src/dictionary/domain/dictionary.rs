use std::collections::HashMap;

use crate::shared::constants::MAX_PHRASE_WORDS;

/// Static phrase → media path mapping.
///
/// Keys are stored normalized (trimmed, lowercase, single-space separated) so
/// lookups only need to normalize the query. Built once at startup and never
/// mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    /// Build a dictionary from raw `(phrase, media_path)` pairs.
    ///
    /// Blank phrases or media paths are skipped. When two raw keys normalize
    /// to the same phrase, the later one wins.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = HashMap::new();
        for (raw_key, media_path) in entries {
            let key = normalize_phrase(raw_key.as_ref());
            let media_path: String = media_path.into();
            if key.is_empty() || media_path.trim().is_empty() {
                log::warn!(
                    "Skipping dictionary entry with empty phrase or path: {:?}",
                    raw_key.as_ref()
                );
                continue;
            }
            let words = key.split(' ').count();
            if words > MAX_PHRASE_WORDS {
                log::warn!(
                    "Dictionary phrase {key:?} has {words} words; phrases longer than \
                     {MAX_PHRASE_WORDS} are never matched"
                );
            }
            map.insert(key, media_path);
        }
        Self { entries: map }
    }

    /// Look up an already-normalized phrase.
    pub fn get(&self, phrase: &str) -> Option<&str> {
        self.entries.get(phrase).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trim, collapse whitespace runs to single spaces, lowercase.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

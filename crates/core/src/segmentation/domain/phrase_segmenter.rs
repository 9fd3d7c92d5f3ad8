use std::sync::Arc;

use crate::dictionary::domain::dictionary::Dictionary;
use crate::shared::constants::MAX_PHRASE_WORDS;

use super::segment::{Segment, UnmatchedPolicy};

/// Greedy longest-match segmentation of free text against a [`Dictionary`].
///
/// Scans tokens left to right. At each position the longest window (up to
/// [`MAX_PHRASE_WORDS`] tokens) whose lowercased, space-joined form is a
/// dictionary key wins; the cursor then jumps past it, so windows never
/// straddle an earlier match. A token no window covers is unmatched.
///
/// Punctuation is part of the token: `"hello,"` only matches a `"hello,"` key.
#[derive(Clone, Debug)]
pub struct PhraseSegmenter {
    dictionary: Arc<Dictionary>,
}

impl PhraseSegmenter {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self { dictionary }
    }

    /// Segment `text`, keeping an [`Segment::Unmatched`] marker for every token
    /// with no dictionary entry. Never fails; blank input yields nothing.
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            match self.longest_match(&tokens[i..]) {
                Some((phrase, media_path, width)) => {
                    log::debug!("Matched {phrase:?} -> {media_path}");
                    segments.push(Segment::Sign {
                        phrase,
                        media_path: media_path.to_string(),
                    });
                    i += width;
                }
                None => {
                    log::debug!("No sign found for {:?}", tokens[i]);
                    segments.push(Segment::Unmatched {
                        token: tokens[i].to_string(),
                    });
                    i += 1;
                }
            }
        }

        segments
    }

    /// Segment `text` and apply `policy` to unmatched tokens.
    pub fn segment_with(&self, text: &str, policy: UnmatchedPolicy) -> Vec<Segment> {
        let segments = self.segment(text);
        match policy {
            UnmatchedPolicy::Placeholder => segments,
            UnmatchedPolicy::Drop => segments.into_iter().filter(|s| !s.is_unmatched()).collect(),
            UnmatchedPolicy::Fingerspell => segments
                .into_iter()
                .flat_map(|segment| match segment {
                    Segment::Unmatched { token } => self.fingerspell(&token),
                    sign => vec![sign],
                })
                .collect(),
        }
    }

    /// Relative media paths in match order; unmatched tokens are dropped.
    pub fn media_paths(&self, text: &str) -> Vec<String> {
        self.segment(text)
            .iter()
            .filter_map(Segment::media_path)
            .map(str::to_string)
            .collect()
    }

    /// Longest dictionary phrase starting at `tokens[0]`: `(phrase, media_path, width)`.
    fn longest_match<'d>(&'d self, tokens: &[&str]) -> Option<(String, &'d str, usize)> {
        let max_width = MAX_PHRASE_WORDS.min(tokens.len());
        (1..=max_width).rev().find_map(|width| {
            let phrase = tokens[..width].join(" ").to_lowercase();
            log::trace!("Checking phrase {phrase:?}");
            self.dictionary
                .get(&phrase)
                .map(|media_path| (phrase, media_path, width))
        })
    }

    fn fingerspell(&self, token: &str) -> Vec<Segment> {
        token
            .chars()
            .filter(|c| c.is_alphanumeric())
            .filter_map(|c| {
                let letter = c.to_lowercase().collect::<String>();
                match self.dictionary.get(&letter) {
                    Some(media_path) => Some(Segment::Sign {
                        phrase: letter,
                        media_path: media_path.to_string(),
                    }),
                    None => {
                        log::debug!("No letter sign for {letter:?} in {token:?}");
                        None
                    }
                }
            })
            .collect()
    }
}

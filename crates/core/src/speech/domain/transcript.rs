#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptWord {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
    pub confidence: f32,
}

/// A raw recognizer token. Whisper splits words into sub-word pieces and
/// marks word starts with a leading space.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognizedToken {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    pub confidence: f32,
}

/// Glue sub-word tokens back into words.
///
/// A token opens a new word when it starts with whitespace (or is the first
/// one); otherwise it extends the previous word. Special tokens such as
/// `[_BEG_]` or `<|endoftext|>` are skipped.
pub fn merge_tokens(tokens: &[RecognizedToken]) -> Vec<TranscriptWord> {
    let mut words: Vec<TranscriptWord> = Vec::new();

    for token in tokens {
        let trimmed = token.text.trim();
        if trimmed.is_empty() || trimmed.starts_with('[') || trimmed.starts_with('<') {
            continue;
        }

        let starts_word = token.text.starts_with(char::is_whitespace);
        match words.last_mut() {
            Some(last) if !starts_word => {
                last.word.push_str(trimmed);
                last.end_time = last.end_time.max(token.end_time);
                last.confidence = last.confidence.min(token.confidence);
            }
            _ => words.push(TranscriptWord {
                word: trimmed.to_string(),
                start_time: token.start_time,
                end_time: token.end_time,
                confidence: token.confidence,
            }),
        }
    }

    words
}

/// Plain dictation text: words joined by single spaces with surrounding
/// punctuation removed, so "Morning." segments like "morning".
pub fn transcript_text(words: &[TranscriptWord]) -> String {
    words
        .iter()
        .map(|w| w.word.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn token(text: &str, start_time: f64, end_time: f64, confidence: f32) -> RecognizedToken {
        RecognizedToken {
            text: text.to_string(),
            start_time,
            end_time,
            confidence,
        }
    }

    #[test]
    fn test_merge_joins_sub_word_pieces() {
        let words = merge_tokens(&[
            token(" Good", 0.0, 0.3, 0.9),
            token(" mor", 0.3, 0.5, 0.8),
            token("ning", 0.5, 0.8, 0.7),
        ]);

        assert_eq!(words.len(), 2);
        assert_eq!(words[1].word, "morning");
        assert_relative_eq!(words[1].start_time, 0.3);
        assert_relative_eq!(words[1].end_time, 0.8);
        assert_relative_eq!(words[1].confidence, 0.7);
    }

    #[test]
    fn test_merge_skips_special_tokens() {
        let words = merge_tokens(&[
            token("[_BEG_]", 0.0, 0.0, 1.0),
            token(" hello", 0.0, 0.4, 0.9),
            token("<|endoftext|>", 0.4, 0.4, 1.0),
        ]);
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].word, "hello");
    }

    #[test]
    fn test_first_token_without_space_starts_a_word() {
        let words = merge_tokens(&[token("hello", 0.0, 0.4, 0.9)]);
        assert_eq!(words[0].word, "hello");
    }

    #[test]
    fn test_transcript_text_strips_punctuation() {
        let words = merge_tokens(&[
            token(" Good", 0.0, 0.3, 0.9),
            token(" morning", 0.3, 0.8, 0.9),
            token(".", 0.8, 0.9, 0.9),
            token(" -", 0.9, 1.0, 0.9),
            token(" don't", 1.0, 1.3, 0.9),
        ]);
        assert_eq!(transcript_text(&words), "Good morning don't");
    }

    #[test]
    fn test_transcript_text_empty() {
        assert_eq!(transcript_text(&[]), "");
    }
}

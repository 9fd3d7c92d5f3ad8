use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::dictionary::domain::dictionary::Dictionary;
use crate::dictionary::domain::dictionary_source::{DictionaryError, DictionarySource};

/// Reads a dictionary from a flat JSON object: `{ "phrase": "clips/phrase.mp4", ... }`.
///
/// Entries whose value is not a string are skipped with a warning.
pub struct JsonDictionarySource {
    path: PathBuf,
}

impl JsonDictionarySource {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse dictionary JSON that is already in memory. `origin` only labels errors.
    pub fn parse(json: &str, origin: &Path) -> Result<Dictionary, DictionaryError> {
        let value: Value = serde_json::from_str(json).map_err(|source| DictionaryError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        let Value::Object(raw) = value else {
            return Err(DictionaryError::NotAnObject {
                path: origin.to_path_buf(),
            });
        };

        let entries = raw.into_iter().filter_map(|(phrase, value)| match value {
            Value::String(media_path) => Some((phrase, media_path)),
            other => {
                log::warn!("Dictionary entry {phrase:?} is not a string path: {other}");
                None
            }
        });
        Ok(Dictionary::from_entries(entries))
    }
}

impl DictionarySource for JsonDictionarySource {
    fn load(&self) -> Result<Dictionary, DictionaryError> {
        let json = fs::read_to_string(&self.path).map_err(|source| DictionaryError::Io {
            path: self.path.clone(),
            source,
        })?;
        let dictionary = Self::parse(&json, &self.path)?;
        if dictionary.is_empty() {
            log::warn!("{} has no usable phrases", self.path.display());
        }
        log::info!(
            "Loaded {} dictionary phrases from {}",
            dictionary.len(),
            self.path.display()
        );
        Ok(dictionary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reads_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("isl_dictionary.json");
        fs::write(
            &path,
            r#"{"hello": "videos/hello.mp4", "Good Morning": "videos/good_morning.mp4"}"#,
        )
        .unwrap();

        let dict = JsonDictionarySource::new(&path).load().unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("hello"), Some("videos/hello.mp4"));
        assert_eq!(dict.get("good morning"), Some("videos/good_morning.mp4"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = JsonDictionarySource::new(Path::new("/nonexistent/isl_dictionary.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, DictionaryError::Io { .. }));
        assert!(err.to_string().contains("isl_dictionary.json"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = JsonDictionarySource::parse(r#"["hello"]"#, Path::new("inline")).unwrap_err();
        assert!(matches!(err, DictionaryError::NotAnObject { .. }));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = JsonDictionarySource::parse("{not json", Path::new("inline")).unwrap_err();
        assert!(matches!(err, DictionaryError::Parse { .. }));
    }

    #[test]
    fn test_parse_skips_non_string_values() {
        let dict = JsonDictionarySource::parse(
            r#"{"hello": "h.mp4", "broken": 42, "nothing": null}"#,
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("hello"), Some("h.mp4"));
    }

    #[test]
    fn test_load_empty_object_is_empty_dictionary() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "{}").unwrap();

        let dict = JsonDictionarySource::new(file.path()).load().unwrap();
        assert!(dict.is_empty());
    }
}

use std::path::PathBuf;

use thiserror::Error;

use super::dictionary::Dictionary;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dictionary {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("dictionary {path} must be a JSON object of phrase to media path")]
    NotAnObject { path: PathBuf },
}

/// Loads the static phrase → media dictionary.
///
/// Called once at startup; the resulting [`Dictionary`] is immutable.
pub trait DictionarySource {
    fn load(&self) -> Result<Dictionary, DictionaryError>;
}

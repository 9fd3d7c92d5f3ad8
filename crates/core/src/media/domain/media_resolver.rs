use std::path::{Path, PathBuf};

/// Turns dictionary media paths into playable references.
///
/// `resolve` yields `"{base}/{media_path}"`; with the default empty base the
/// result is root-relative (`"/clips/hello.mp4"`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaResolver {
    base_path: String,
}

impl MediaResolver {
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn resolve(&self, media_path: &str) -> String {
        format!("{}/{}", self.base_path, media_path.trim_start_matches('/'))
    }

    /// Map a resolved reference back onto a file below `media_root`.
    ///
    /// Strips the configured base and any leading slashes, so both
    /// `"/clips/a.mp4"` and `"https://cdn/clips/a.mp4"` (with base
    /// `"https://cdn"`) land on `media_root/clips/a.mp4`.
    pub fn to_local_path(&self, url: &str, media_root: &Path) -> PathBuf {
        let relative = url.strip_prefix(self.base_path.as_str()).unwrap_or(url);
        media_root.join(relative.trim_start_matches('/'))
    }
}

use serde::Serialize;

use crate::media::domain::media_resolver::MediaResolver;
use crate::segmentation::domain::segment::Segment;

/// One item a playback session steps through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlaylistEntry {
    /// A sign clip at a resolved URL.
    Clip { phrase: String, url: String },
    /// A word with no sign, shown as a short notice instead of a clip.
    Gap { token: String },
}

impl PlaylistEntry {
    pub fn url(&self) -> Option<&str> {
        match self {
            PlaylistEntry::Clip { url, .. } => Some(url),
            PlaylistEntry::Gap { .. } => None,
        }
    }

    /// The phrase or token this entry stands for.
    pub fn label(&self) -> &str {
        match self {
            PlaylistEntry::Clip { phrase, .. } => phrase,
            PlaylistEntry::Gap { token } => token,
        }
    }
}

/// Resolve segments into playable entries, in order.
pub fn build_playlist(segments: &[Segment], resolver: &MediaResolver) -> Vec<PlaylistEntry> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Sign { phrase, media_path } => PlaylistEntry::Clip {
                phrase: phrase.clone(),
                url: resolver.resolve(media_path),
            },
            Segment::Unmatched { token } => PlaylistEntry::Gap {
                token: token.clone(),
            },
        })
        .collect()
}

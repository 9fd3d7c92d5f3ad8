use std::path::Path;

use crate::shared::clip_metadata::ClipMetadata;
use crate::shared::frame::Frame;

/// Decodes the frames of one sign clip.
///
/// Implementations handle codec and container details; playback only sees
/// [`Frame`] and [`ClipMetadata`].
pub trait ClipReader: Send {
    /// Opens a clip and returns its metadata. A failure here is a media load failure.
    fn open(&mut self, path: &Path) -> Result<ClipMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the reader.
    fn close(&mut self);
}

use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub struct ClipMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl ClipMetadata {
    /// Display interval between frames. Falls back to 25 fps when the
    /// container does not report a usable rate.
    pub fn frame_interval(&self) -> Duration {
        let fps = if self.fps.is_finite() && self.fps > 0.0 {
            self.fps
        } else {
            25.0
        };
        Duration::from_secs_f64(1.0 / fps)
    }

    /// Nominal clip length, or `None` when the frame count is unknown.
    pub fn duration(&self) -> Option<Duration> {
        if self.total_frames == 0 {
            return None;
        }
        Some(self.frame_interval() * self.total_frames as u32)
    }
}

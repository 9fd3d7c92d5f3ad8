use std::sync::Arc;
use std::time::Duration;

use super::playlist::PlaylistEntry;

/// An auto-advance the session is waiting on, as plain data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingAdvance {
    pub generation: u64,
    pub index: usize,
    pub delay: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Loading,
    Playing(usize),
    Finished,
}

/// Immutable snapshot of one translation's playback.
///
/// Never mutated in place: every event produces a new session through
/// [`reduce`](super::playback_reducer::reduce). `index` stays within
/// `0..=playlist.len()`, and `index == playlist.len()` means finished.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackSession {
    pub(crate) generation: u64,
    pub(crate) playlist: Arc<Vec<PlaylistEntry>>,
    pub(crate) index: usize,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) pending_advance: Option<PendingAdvance>,
}

impl PlaybackSession {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn playlist(&self) -> &[PlaylistEntry] {
        &self.playlist
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pending_advance(&self) -> Option<PendingAdvance> {
        self.pending_advance
    }

    /// The entry at the current index, or `None` once finished.
    pub fn current(&self) -> Option<&PlaylistEntry> {
        self.playlist.get(self.index)
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.loading {
            PlaybackStatus::Loading
        } else if self.playlist.is_empty() {
            PlaybackStatus::Idle
        } else if self.index >= self.playlist.len() {
            PlaybackStatus::Finished
        } else {
            PlaybackStatus::Playing(self.index)
        }
    }

    /// Fraction of entries played, in `0.0..=1.0`. Zero for an empty playlist.
    pub fn progress(&self) -> f32 {
        if self.playlist.is_empty() {
            return 0.0;
        }
        self.index as f32 / self.playlist.len() as f32
    }

    /// True after a translation that produced nothing to play.
    pub fn has_no_videos(&self) -> bool {
        self.generation > 0 && !self.loading && self.playlist.is_empty()
    }

    pub fn can_restart(&self) -> bool {
        !self.loading && self.index > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn clip(n: usize) -> PlaylistEntry {
        PlaylistEntry::Clip {
            phrase: format!("sign {n}"),
            url: format!("/{n}.mp4"),
        }
    }

    fn session(len: usize, index: usize) -> PlaybackSession {
        PlaybackSession {
            generation: 1,
            playlist: Arc::new((0..len).map(clip).collect()),
            index,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_session_is_idle() {
        let s = PlaybackSession::default();
        assert_eq!(s.status(), PlaybackStatus::Idle);
        assert_relative_eq!(s.progress(), 0.0);
        assert!(!s.has_no_videos());
        assert!(!s.can_restart());
    }

    #[test]
    fn test_progress_is_index_over_total() {
        assert_relative_eq!(session(4, 1).progress(), 0.25);
        assert_relative_eq!(session(3, 3).progress(), 1.0);
    }

    #[test]
    fn test_status_follows_index() {
        assert_eq!(session(3, 0).status(), PlaybackStatus::Playing(0));
        assert_eq!(session(3, 2).status(), PlaybackStatus::Playing(2));
        assert_eq!(session(3, 3).status(), PlaybackStatus::Finished);
    }

    #[test]
    fn test_loading_wins_over_playlist_state() {
        let s = PlaybackSession {
            loading: true,
            ..session(3, 1)
        };
        assert_eq!(s.status(), PlaybackStatus::Loading);
        assert!(!s.can_restart());
    }

    #[test]
    fn test_current_entry() {
        assert_eq!(session(2, 1).current(), Some(&clip(1)));
        assert_eq!(session(2, 2).current(), None);
    }

    #[test]
    fn test_empty_translation_reports_no_videos() {
        let s = PlaybackSession {
            generation: 2,
            ..Default::default()
        };
        assert!(s.has_no_videos());
        assert_eq!(s.status(), PlaybackStatus::Idle);
    }
}

use super::playback_session::PendingAdvance;
use super::playlist::PlaylistEntry;

/// Inputs to the playback state machine.
///
/// Clip and timer events carry the generation and index they were issued
/// for; the reducer drops any that no longer match the session.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    TextSubmitted,
    SegmentsReady {
        generation: u64,
        playlist: Vec<PlaylistEntry>,
    },
    ClipEnded {
        generation: u64,
        index: usize,
    },
    ClipFailed {
        generation: u64,
        index: usize,
        reason: String,
    },
    AutoAdvance {
        generation: u64,
        index: usize,
    },
    Restart,
}

/// Work the host must carry out after a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEffect {
    /// Tear down any running clip and start `url`.
    StartClip {
        generation: u64,
        index: usize,
        url: String,
    },
    /// Tear down any running clip without starting another.
    StopClip,
    ScheduleAdvance(PendingAdvance),
    CancelAdvance,
    Finished,
}

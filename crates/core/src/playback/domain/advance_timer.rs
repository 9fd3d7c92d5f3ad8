use super::playback_session::PendingAdvance;

/// One-shot timer behind the error-skip auto-advance.
///
/// At most one advance is outstanding: scheduling replaces the previous one.
/// When it fires, the implementation delivers a
/// [`PlaybackEvent::AutoAdvance`](super::playback_event::PlaybackEvent::AutoAdvance)
/// for the scheduled generation and index.
pub trait AdvanceTimer: Send {
    fn schedule(&mut self, advance: PendingAdvance);

    /// Drop the outstanding advance, if any. Safe to call when idle.
    fn cancel(&mut self);
}

use std::thread;

use crossbeam_channel::{after, bounded, select, Sender};

use crate::playback::domain::advance_timer::AdvanceTimer;
use crate::playback::domain::playback_event::PlaybackEvent;
use crate::playback::domain::playback_session::PendingAdvance;

/// [`AdvanceTimer`] backed by a short-lived thread per scheduled advance.
///
/// Each thread waits on `after(delay)` and a cancel channel. Cancelling drops
/// the sender half, which wakes the thread without sending anything. Dropping
/// the timer cancels it.
pub struct ThreadAdvanceTimer {
    events: Sender<PlaybackEvent>,
    cancel_tx: Option<Sender<()>>,
}

impl ThreadAdvanceTimer {
    pub fn new(events: Sender<PlaybackEvent>) -> Self {
        Self {
            events,
            cancel_tx: None,
        }
    }
}

impl AdvanceTimer for ThreadAdvanceTimer {
    fn schedule(&mut self, advance: PendingAdvance) {
        self.cancel();

        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let events = self.events.clone();
        thread::spawn(move || {
            select! {
                recv(cancel_rx) -> _ => {
                    log::trace!("Auto-advance for clip {} cancelled", advance.index);
                }
                recv(after(advance.delay)) -> _ => {
                    log::debug!(
                        "Auto-advancing past clip {} (generation {})",
                        advance.index,
                        advance.generation
                    );
                    let _ = events.send(PlaybackEvent::AutoAdvance {
                        generation: advance.generation,
                        index: advance.index,
                    });
                }
            }
        });
        self.cancel_tx = Some(cancel_tx);
    }

    fn cancel(&mut self) {
        self.cancel_tx = None;
    }
}

impl Drop for ThreadAdvanceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

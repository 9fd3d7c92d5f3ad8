use crate::backend::domain::nlp_analysis::NlpAnalysis;
use crate::backend::infrastructure::background_forwarder::{BackgroundForwarder, ForwardHandle};
use crate::playback::domain::advance_timer::AdvanceTimer;
use crate::playback::domain::playback_event::{PlaybackEffect, PlaybackEvent};
use crate::playback::domain::playback_reducer::reduce;
use crate::playback::domain::playback_session::PlaybackSession;

use super::translate_text_use_case::TranslateTextUseCase;

/// Drives one playback session at a time.
///
/// Owns the current [`PlaybackSession`], the auto-advance timer and the
/// in-flight backend submission. Hosts feed it clip and timer events and
/// carry out the clip effects it returns; timer effects are applied here.
/// Dropping the controller cancels the timer and discards the backend
/// response.
pub struct PlaybackController {
    translator: TranslateTextUseCase,
    forwarder: Option<BackgroundForwarder>,
    timer: Box<dyn AdvanceTimer>,
    session: PlaybackSession,
    forward: Option<ForwardHandle>,
}

impl PlaybackController {
    pub fn new(
        translator: TranslateTextUseCase,
        forwarder: Option<BackgroundForwarder>,
        timer: Box<dyn AdvanceTimer>,
    ) -> Self {
        Self {
            translator,
            forwarder,
            timer,
            session: PlaybackSession::default(),
            forward: None,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn translator(&self) -> &TranslateTextUseCase {
        &self.translator
    }

    /// Start a new session for `text`. Blank text is ignored.
    pub fn submit(&mut self, text: &str) -> Vec<PlaybackEffect> {
        if text.trim().is_empty() {
            log::debug!("Ignoring blank submission");
            return Vec::new();
        }
        log::info!("Translating {:?}", text);

        let mut effects = self.dispatch(PlaybackEvent::TextSubmitted);

        // Replacing the handle discards any response still in flight
        self.forward = self.forwarder.as_ref().map(|f| f.forward(text));

        let translation = self.translator.execute(text);
        effects.extend(self.dispatch(PlaybackEvent::SegmentsReady {
            generation: self.session.generation(),
            playlist: translation.playlist,
        }));
        effects
    }

    /// Apply an event, returning the effects the host must carry out.
    pub fn dispatch(&mut self, event: PlaybackEvent) -> Vec<PlaybackEffect> {
        let transition = reduce(&self.session, event);
        self.session = transition.session;

        let mut host_effects = Vec::new();
        for effect in transition.effects {
            match effect {
                PlaybackEffect::ScheduleAdvance(pending) => self.timer.schedule(pending),
                PlaybackEffect::CancelAdvance => self.timer.cancel(),
                other => host_effects.push(other),
            }
        }
        host_effects
    }

    pub fn restart(&mut self) -> Vec<PlaybackEffect> {
        self.dispatch(PlaybackEvent::Restart)
    }

    /// The backend's analysis of the current text, once it has arrived.
    pub fn backend_analysis(&self) -> Option<&NlpAnalysis> {
        self.forward.as_ref().and_then(ForwardHandle::try_result)
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use signreel_core::backend::domain::nlp_analysis::NlpAnalysis;
use signreel_core::dictionary::domain::dictionary_source::DictionarySource;
use signreel_core::dictionary::infrastructure::json_dictionary_source::JsonDictionarySource;
use signreel_core::media::infrastructure::clip_player::{
    self, ClipPlayback, ClipRequest, ClipSignal, Pacing,
};
use signreel_core::media::infrastructure::ffmpeg_clip_reader::FfmpegClipReader;
use signreel_core::pipeline::playback_controller::PlaybackController;
use signreel_core::pipeline::translate_text_use_case::TranslateTextUseCase;
use signreel_core::playback::domain::playback_event::{PlaybackEffect, PlaybackEvent};
use signreel_core::playback::domain::playback_session::PlaybackSession;
use signreel_core::playback::infrastructure::thread_advance_timer::ThreadAdvanceTimer;
use signreel_core::shared::frame::Frame;

use crate::settings::Settings;

/// The desktop side of a playback session: runs clips on worker threads and
/// feeds their signals and the advance timer back into the controller.
///
/// Dropping the host stops the current clip, cancels the timer and discards
/// any backend response.
pub struct PlaybackHost {
    controller: PlaybackController,
    media_root: PathBuf,
    events: Receiver<PlaybackEvent>,
    clip_tx: Sender<ClipSignal>,
    clips: Receiver<ClipSignal>,
    current: Option<ClipPlayback>,
    frame: Option<Frame>,
}

impl PlaybackHost {
    pub fn new(settings: &Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let dictionary = JsonDictionarySource::new(&settings.dictionary_path()).load()?;
        log::info!("Loaded {} dictionary phrases", dictionary.len());

        let config = settings.translator_config();
        let forwarder = config.forwarder().unwrap_or_else(|e| {
            log::warn!("Backend forwarding disabled: {e}");
            None
        });

        let (event_tx, events) = crossbeam_channel::unbounded::<PlaybackEvent>();
        let (clip_tx, clips) = crossbeam_channel::unbounded::<ClipSignal>();
        let controller = PlaybackController::new(
            TranslateTextUseCase::new(Arc::new(dictionary), &config),
            forwarder,
            Box::new(ThreadAdvanceTimer::new(event_tx)),
        );

        Ok(Self {
            controller,
            media_root: settings.media_root(),
            events,
            clip_tx,
            clips,
            current: None,
            frame: None,
        })
    }

    pub fn session(&self) -> &PlaybackSession {
        self.controller.session()
    }

    /// Latest decoded frame of the current clip.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn backend_analysis(&self) -> Option<&NlpAnalysis> {
        self.controller.backend_analysis()
    }

    /// Whether anything can still change without user input.
    pub fn is_active(&self) -> bool {
        let session = self.session();
        session.is_loading() || self.current.is_some() || session.pending_advance().is_some()
    }

    pub fn submit(&mut self, text: &str) {
        let effects = self.controller.submit(text);
        self.apply(effects);
    }

    pub fn restart(&mut self) {
        let effects = self.controller.restart();
        self.apply(effects);
    }

    /// Drain pending clip signals and timer events. Returns true when a new
    /// frame arrived.
    pub fn poll(&mut self) -> bool {
        let mut new_frame = false;

        while let Ok(signal) = self.clips.try_recv() {
            let event = match signal {
                ClipSignal::Opened { .. } => None,
                ClipSignal::Frame {
                    generation,
                    index,
                    frame,
                } => {
                    if self.is_current(generation, index) {
                        self.frame = Some(frame);
                        new_frame = true;
                    }
                    None
                }
                ClipSignal::Ended { generation, index } => {
                    Some(PlaybackEvent::ClipEnded { generation, index })
                }
                ClipSignal::Failed {
                    generation,
                    index,
                    reason,
                } => Some(PlaybackEvent::ClipFailed {
                    generation,
                    index,
                    reason,
                }),
            };
            if let Some(event) = event {
                self.dispatch(event);
            }
        }

        while let Ok(event) = self.events.try_recv() {
            self.dispatch(event);
        }

        new_frame
    }

    fn is_current(&self, generation: u64, index: usize) -> bool {
        let session = self.session();
        session.generation() == generation && session.index() == index
    }

    fn dispatch(&mut self, event: PlaybackEvent) {
        let effects = self.controller.dispatch(event);
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<PlaybackEffect>) {
        for effect in effects {
            match effect {
                PlaybackEffect::StartClip {
                    generation,
                    index,
                    url,
                } => {
                    let path = self
                        .controller
                        .translator()
                        .resolver()
                        .to_local_path(&url, &self.media_root);
                    log::debug!("Starting clip {} ({})", index + 1, path.display());
                    self.frame = None;
                    self.current = Some(clip_player::spawn(
                        Box::new(FfmpegClipReader::new()),
                        ClipRequest {
                            generation,
                            index,
                            path,
                            pacing: Pacing::Realtime,
                            emit_frames: true,
                        },
                        self.clip_tx.clone(),
                    ));
                }
                PlaybackEffect::StopClip => {
                    self.current = None;
                    self.frame = None;
                }
                // Keep the last frame on screen once everything has played
                PlaybackEffect::Finished => self.current = None,
                PlaybackEffect::ScheduleAdvance(_) | PlaybackEffect::CancelAdvance => {}
            }
        }
    }
}

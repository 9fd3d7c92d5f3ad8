use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use iced::widget::image;
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use signreel_core::segmentation::domain::segment::UnmatchedPolicy;
use signreel_core::shared::constants::AUDIO_EXTENSIONS;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::theme;
use crate::workers::playback_worker::PlaybackHost;
use crate::workers::speech_worker::{self, SpeechMessage, SpeechParams};

/// Roughly one frame at 60 Hz.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Translate,
    Settings,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Translate, Tab::Settings];

    fn label(self) -> &'static str {
        match self {
            Tab::Translate => "Translate",
            Tab::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    InputChanged(String),
    Translate,
    Restart,
    TranslateNew,
    Dictate,
    DictationFileSelected(Option<PathBuf>),
    Tick,
    SelectDictionary,
    DictionarySelected(Option<PathBuf>),
    SelectMediaRoot,
    MediaRootSelected(Option<PathBuf>),
    BasePathChanged(String),
    BackendToggled(bool),
    BackendUrlChanged(String),
    ApplyTranslatorSettings,
    UnmatchedChanged(UnmatchedPolicy),
    ModelDownloadToggled(bool),
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    PollSystemTheme,
}

/// Dictation state shown next to the text box.
pub enum SpeechState {
    Idle,
    Listening {
        rx: Receiver<SpeechMessage>,
        cancelled: Arc<AtomicBool>,
        download: Option<(u64, u64)>,
    },
    Failed(String),
    /// The dictate button stays disabled until the speech settings change.
    Unsupported(String),
}

impl SpeechState {
    pub fn is_listening(&self) -> bool {
        matches!(self, SpeechState::Listening { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, SpeechState::Unsupported(_))
    }

    /// Forget a failed or unsupported outcome so dictation can be retried.
    /// A capture in progress is left running.
    pub fn clear_outcome(&mut self) {
        if matches!(self, SpeechState::Failed(_) | SpeechState::Unsupported(_)) {
            *self = SpeechState::Idle;
        }
    }
}

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    pub input: String,
    pub host: Option<PlaybackHost>,
    pub load_error: Option<String>,
    pub frame: Option<image::Handle>,
    pub speech: SpeechState,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let mut app = Self {
            active_tab: Tab::Translate,
            settings,
            input: String::new(),
            host: None,
            load_error: None,
            frame: None,
            speech: SpeechState::Idle,
        };
        app.rebuild_host();
        (app, Task::none())
    }

    /// Recreate the playback host from the current settings, discarding any
    /// session in progress.
    fn rebuild_host(&mut self) {
        self.host = None;
        self.frame = None;
        match PlaybackHost::new(&self.settings) {
            Ok(host) => {
                self.host = Some(host);
                self.load_error = None;
            }
            Err(e) => {
                log::warn!("Could not load dictionary: {e}");
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn translator_settings_changed(&mut self) {
        self.settings.save();
        self.rebuild_host();
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::InputChanged(value) => {
                self.input = value;
            }
            Message::Translate => {
                if let Some(host) = self.host.as_mut() {
                    self.frame = None;
                    host.submit(&self.input);
                }
            }
            Message::Restart => {
                if let Some(host) = self.host.as_mut() {
                    host.restart();
                }
            }
            Message::TranslateNew => {
                self.input.clear();
                self.rebuild_host();
            }
            Message::Dictate => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select a recording to dictate")
                            .add_filter("Audio Files", AUDIO_EXTENSIONS)
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::DictationFileSelected,
                );
            }
            Message::DictationFileSelected(Some(path)) => {
                if let SpeechState::Listening { cancelled, .. } = &self.speech {
                    cancelled.store(true, Ordering::Relaxed);
                }
                let (rx, cancelled) = speech_worker::spawn(SpeechParams {
                    audio_path: path,
                    allow_download: self.settings.allow_model_download,
                });
                self.speech = SpeechState::Listening {
                    rx,
                    cancelled,
                    download: None,
                };
            }
            Message::DictationFileSelected(None) => {}
            Message::Tick => {
                self.poll_speech();
                self.poll_playback();
            }
            Message::SelectDictionary => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select sign dictionary")
                            .add_filter("JSON", &["json"])
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::DictionarySelected,
                );
            }
            Message::DictionarySelected(Some(path)) => {
                self.settings.dictionary_path = Some(path);
                self.translator_settings_changed();
            }
            Message::DictionarySelected(None) => {}
            Message::SelectMediaRoot => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select clip folder")
                            .pick_folder()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::MediaRootSelected,
                );
            }
            Message::MediaRootSelected(Some(path)) => {
                self.settings.media_root = Some(path);
                self.translator_settings_changed();
            }
            Message::MediaRootSelected(None) => {}
            // Text fields take effect on submit
            Message::BasePathChanged(value) => {
                self.settings.base_path = value;
                self.settings.save();
            }
            Message::BackendUrlChanged(value) => {
                self.settings.backend_url = value;
                self.settings.save();
            }
            Message::ApplyTranslatorSettings => {
                self.translator_settings_changed();
            }
            Message::BackendToggled(enabled) => {
                self.settings.backend_enabled = enabled;
                self.translator_settings_changed();
            }
            Message::UnmatchedChanged(policy) => {
                self.settings.unmatched = policy;
                self.translator_settings_changed();
            }
            Message::ModelDownloadToggled(enabled) => {
                self.settings.allow_model_download = enabled;
                self.settings.save();
                self.speech.clear_outcome();
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::PollSystemTheme => {}
        }
        Task::none()
    }

    fn poll_playback(&mut self) {
        let Some(host) = self.host.as_mut() else {
            return;
        };
        if host.poll() {
            self.frame = host.frame().map(|frame| {
                image::Handle::from_rgba(frame.width(), frame.height(), frame.data().to_vec())
            });
        }
    }

    fn poll_speech(&mut self) {
        let SpeechState::Listening { rx, download, .. } = &mut self.speech else {
            return;
        };

        let mut outcome = None;
        while let Ok(message) = rx.try_recv() {
            match message {
                SpeechMessage::DownloadProgress(done, total) => *download = Some((done, total)),
                other => outcome = Some(other),
            }
        }

        match outcome {
            Some(SpeechMessage::Transcript(text)) => {
                self.speech = SpeechState::Idle;
                self.input = text;
            }
            Some(SpeechMessage::Unsupported(reason)) => {
                self.speech = SpeechState::Unsupported(reason);
            }
            Some(SpeechMessage::Failed(reason)) => {
                self.speech = SpeechState::Failed(reason);
            }
            Some(SpeechMessage::DownloadProgress(..)) | None => {}
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;

        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let btn = button(text(tab.label()).size(scaled(13.0, fs)))
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::Translate => tabs::translate_tab::view(self),
            Tab::Settings => tabs::settings_tab::view(&self.settings),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        column![tab_bar, tab_content].height(Length::Fill).into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance, self.settings.high_contrast)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let busy = self.speech.is_listening()
            || self.host.as_ref().is_some_and(PlaybackHost::is_active);

        let tick = if busy {
            iced::time::every(TICK_INTERVAL).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };
        let system_theme = if self.settings.appearance == Appearance::System {
            iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme)
        } else {
            Subscription::none()
        };
        Subscription::batch([tick, system_theme])
    }
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}

use iced::widget::{button, column, container, image, progress_bar, row, text, text_input, Space};
use iced::{Alignment, Background, Border, Color, ContentFit, Element, Length, Theme};

use signreel_core::playback::domain::playback_session::{PlaybackSession, PlaybackStatus};

use crate::app::{scaled, App, Message, SpeechState};
use crate::theme::muted_color;

const PLAYER_HEIGHT: f32 = 320.0;

pub fn view(app: &App) -> Element<'_, Message> {
    let fs = app.settings.font_scale;

    let input = text_input("Type something to translate\u{2026}", &app.input)
        .on_input(Message::InputChanged)
        .on_submit(Message::Translate)
        .padding(10)
        .size(scaled(14.0, fs));

    let can_translate = app.host.is_some() && !app.input.trim().is_empty();
    let can_dictate = !app.speech.is_listening() && !app.speech.is_unsupported();
    let actions = row![
        button(text("Translate").size(scaled(13.0, fs)))
            .on_press_maybe(can_translate.then_some(Message::Translate))
            .padding([8, 20])
            .style(button::primary),
        button(text("Dictate").size(scaled(13.0, fs)))
            .on_press_maybe(can_dictate.then_some(Message::Dictate))
            .padding([8, 20])
            .style(button::secondary),
    ]
    .spacing(8);

    let mut content = column![
        text("Sign Language Translator").size(scaled(18.0, fs)),
        Space::new().height(12),
        input,
        Space::new().height(8),
        actions,
    ]
    .spacing(0);

    if let Some(notice) = speech_notice(&app.speech, fs) {
        content = content.push(Space::new().height(8)).push(notice);
    }

    if let Some(err) = &app.load_error {
        content = content
            .push(Space::new().height(12))
            .push(banner(format!("Dictionary unavailable: {err}"), fs));
    }

    if let Some(host) = &app.host {
        content = content
            .push(Space::new().height(16))
            .push(player(host.session(), app.frame.as_ref(), fs));

        if let Some(analysis) = host.backend_analysis() {
            if !analysis.filtered_tokens.is_empty() {
                let tokens = analysis.filtered_tokens.join(" ");
                content = content.push(Space::new().height(12)).push(
                    text(format!("Backend keywords: {tokens}"))
                        .size(scaled(11.0, fs))
                        .style(|theme: &Theme| text::Style {
                            color: Some(muted_color(theme)),
                        }),
                );
            }
        }
    }

    content.into()
}

fn speech_notice<'a>(speech: &SpeechState, fs: f32) -> Option<Element<'a, Message>> {
    let message = match speech {
        SpeechState::Idle => return None,
        SpeechState::Listening {
            download: Some((done, total)),
            ..
        } if *total > 0 => format!(
            "Downloading speech model\u{2026} {:.0}%",
            *done as f64 / *total as f64 * 100.0
        ),
        SpeechState::Listening { .. } => "Listening\u{2026}".to_string(),
        SpeechState::Failed(reason) => format!("Dictation failed: {reason}"),
        SpeechState::Unsupported(reason) => {
            format!("Speech recognition is not supported on this system ({reason}).")
        }
    };
    Some(
        text(message)
            .size(scaled(12.0, fs))
            .style(|theme: &Theme| text::Style {
                color: Some(muted_color(theme)),
            })
            .into(),
    )
}

fn player<'a>(
    session: &PlaybackSession,
    frame: Option<&image::Handle>,
    fs: f32,
) -> Element<'a, Message> {
    if session.has_no_videos() {
        return text("No sign language videos available.")
            .size(scaled(13.0, fs))
            .into();
    }

    let status = match session.status() {
        PlaybackStatus::Idle => return Space::new().height(0).into(),
        PlaybackStatus::Loading => "Loading\u{2026}".to_string(),
        PlaybackStatus::Playing(index) => {
            let label = session
                .current()
                .map(|entry| format!(" \u{00b7} {}", entry.label()))
                .unwrap_or_default();
            format!("Playing video {} of {}{label}", index + 1, session.total())
        }
        PlaybackStatus::Finished => "All videos have been played.".to_string(),
    };

    let screen: Element<'a, Message> = match frame {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(PLAYER_HEIGHT)
            .into(),
        None => Space::new().height(PLAYER_HEIGHT).into(),
    };

    let mut card = column![
        container(screen)
            .width(Length::Fill)
            .center_x(Length::Fill)
            .style(screen_style),
        Space::new().height(10),
        progress_bar(0.0..=100.0, session.progress() * 100.0),
        Space::new().height(8),
        text(status).size(scaled(13.0, fs)),
    ]
    .spacing(0);

    if let Some(err) = session.error() {
        card = card
            .push(Space::new().height(8))
            .push(banner(err.to_string(), fs));
    }

    let mut controls = row![button(text("Restart").size(scaled(13.0, fs)))
        .on_press_maybe(session.can_restart().then_some(Message::Restart))
        .padding([8, 20])
        .style(button::secondary)]
    .spacing(8)
    .align_y(Alignment::Center);
    if session.status() == PlaybackStatus::Finished {
        controls = controls.push(
            button(text("Translate New Text").size(scaled(13.0, fs)))
                .on_press(Message::TranslateNew)
                .padding([8, 20])
                .style(button::primary),
        );
    }
    card = card.push(Space::new().height(12)).push(controls);

    container(card)
        .padding([14, 16])
        .style(container::rounded_box)
        .width(Length::Fill)
        .into()
}

fn banner<'a>(message: String, fs: f32) -> Element<'a, Message> {
    container(text(message).size(scaled(12.0, fs)))
        .padding([8, 12])
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let danger = theme.palette().danger;
            container::Style {
                background: Some(Background::Color(Color { a: 0.12, ..danger })),
                text_color: Some(danger),
                border: Border {
                    radius: 6.0.into(),
                    width: 1.0,
                    color: Color { a: 0.4, ..danger },
                },
                ..Default::default()
            }
        })
        .into()
}

fn screen_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::BLACK)),
        border: Border {
            radius: 6.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

use iced::widget::{
    button, checkbox, column, pick_list, row, slider, text, text_input, Space, Text,
};
use iced::{Alignment, Element, Length, Theme};

use signreel_core::segmentation::domain::segment::UnmatchedPolicy;

use crate::app::{scaled, Message};
use crate::settings::{Appearance, Settings};
use crate::theme::muted_color;

pub fn view<'a>(settings: &Settings) -> Element<'a, Message> {
    let fs = settings.font_scale;

    let heading = |value: &'a str| -> Text<'a> { text(value).size(scaled(16.0, fs)) };
    let label = |value: &'a str| -> Text<'a> {
        text(value)
            .size(scaled(13.0, fs))
            .width(Length::Fixed(130.0))
    };
    let hint = |value: String| -> Text<'a> {
        text(value)
            .size(scaled(11.0, fs))
            .style(|theme: &Theme| text::Style {
                color: Some(muted_color(theme)),
            })
    };

    let dictionary = settings.dictionary_path().display().to_string();
    let media_root = settings.media_root().display().to_string();

    column![
        heading("Dictionary"),
        Space::new().height(8),
        row![
            label("Phrase file"),
            text(dictionary).size(scaled(12.0, fs)).width(Length::Fill),
            button(text("Choose\u{2026}").size(scaled(12.0, fs)))
                .on_press(Message::SelectDictionary)
                .style(button::secondary),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(6),
        row![
            label("Clip folder"),
            text(media_root).size(scaled(12.0, fs)).width(Length::Fill),
            button(text("Choose\u{2026}").size(scaled(12.0, fs)))
                .on_press(Message::SelectMediaRoot)
                .style(button::secondary),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(6),
        row![
            label("URL prefix"),
            text_input("none", &settings.base_path)
                .on_input(Message::BasePathChanged)
                .on_submit(Message::ApplyTranslatorSettings)
                .size(scaled(12.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(6),
        row![
            label("Unknown words"),
            pick_list(UnmatchedPolicy::ALL, Some(settings.unmatched), Message::UnmatchedChanged)
                .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        hint("Words with no sign are skipped unless another option is chosen.".to_string()),
        Space::new().height(20),
        heading("Language backend"),
        Space::new().height(8),
        checkbox(settings.backend_enabled)
            .label("Send submitted text for analysis")
            .on_toggle(Message::BackendToggled)
            .text_size(scaled(13.0, fs)),
        Space::new().height(6),
        row![
            label("Endpoint"),
            text_input("http://localhost:5000/process", &settings.backend_url)
                .on_input(Message::BackendUrlChanged)
                .on_submit(Message::ApplyTranslatorSettings)
                .size(scaled(12.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        hint("Playback never waits for the backend.".to_string()),
        Space::new().height(20),
        heading("Speech"),
        Space::new().height(8),
        checkbox(settings.allow_model_download)
            .label("Download the speech model when missing")
            .on_toggle(Message::ModelDownloadToggled)
            .text_size(scaled(13.0, fs)),
        Space::new().height(20),
        heading("Display"),
        Space::new().height(8),
        row![
            label("Theme"),
            pick_list(Appearance::ALL, Some(settings.appearance), Message::AppearanceChanged)
                .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(6),
        checkbox(settings.high_contrast)
            .label("High contrast")
            .on_toggle(Message::HighContrastChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(6),
        row![
            label("Text size"),
            slider(0.8..=1.5, settings.font_scale, Message::FontScaleChanged).step(0.05),
            text(format!("{:.0}%", settings.font_scale * 100.0)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    ]
    .spacing(0)
    .into()
}

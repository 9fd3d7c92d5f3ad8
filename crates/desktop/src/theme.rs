use iced::color;
use iced::theme::Palette;
use iced::{Color, Theme};

use crate::settings::Appearance;

/// How far high contrast pulls each accent toward the text color.
const ACCENT_PULL: f32 = 0.35;

/// Light or dark base, before any contrast adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Light,
    Dark,
}

impl Scheme {
    /// `system_dark` is only consulted for [`Appearance::System`].
    pub fn for_appearance(appearance: Appearance, system_dark: impl FnOnce() -> bool) -> Self {
        let dark = match appearance {
            Appearance::Dark => true,
            Appearance::Light => false,
            Appearance::System => system_dark(),
        };
        if dark {
            Scheme::Dark
        } else {
            Scheme::Light
        }
    }

    fn base(self) -> Palette {
        match self {
            Scheme::Dark => Palette {
                background: color!(0x18, 0x1a, 0x1f),
                text: color!(0xd8, 0xd8, 0xdc),
                primary: color!(0x4f, 0xa3, 0xe0),
                success: color!(0x3c, 0xc7, 0x6b),
                warning: color!(0xf2, 0xb8, 0x2e),
                danger: color!(0xf0, 0x55, 0x4a),
            },
            Scheme::Light => Palette {
                background: color!(0xf7, 0xf7, 0xf9),
                text: color!(0x1e, 0x1f, 0x24),
                primary: color!(0x1f, 0x6f, 0xc4),
                success: color!(0x2e, 0xa0, 0x4f),
                warning: color!(0xd9, 0x8a, 0x00),
                danger: color!(0xd6, 0x33, 0x2a),
            },
        }
    }

    fn palette(self, high_contrast: bool) -> Palette {
        let base = self.base();
        if !high_contrast {
            return base;
        }

        let (background, text) = match self {
            Scheme::Dark => (Color::BLACK, Color::WHITE),
            Scheme::Light => (Color::WHITE, Color::BLACK),
        };
        let accent = |c: Color| mix(c, text, ACCENT_PULL);
        Palette {
            background,
            text,
            primary: accent(base.primary),
            success: accent(base.success),
            warning: accent(base.warning),
            danger: accent(base.danger),
        }
    }
}

pub fn resolve_theme(appearance: Appearance, high_contrast: bool) -> Theme {
    let scheme = Scheme::for_appearance(appearance, system_prefers_dark);
    Theme::custom("SignReel", scheme.palette(high_contrast))
}

/// Secondary text: the theme's text color at reduced opacity.
pub fn muted_color(theme: &Theme) -> Color {
    Color {
        a: 0.6,
        ..theme.palette().text
    }
}

fn mix(from: Color, to: Color, amount: f32) -> Color {
    let lerp = |x: f32, y: f32| x + (y - x) * amount;
    Color {
        r: lerp(from.r, to.r),
        g: lerp(from.g, to.g),
        b: lerp(from.b, to.b),
        a: from.a,
    }
}

/// Best-effort OS preference. Dark when nothing says otherwise.
fn system_prefers_dark() -> bool {
    #[cfg(target_os = "macos")]
    {
        // The key only exists while dark mode is on
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| gtk_theme_is_dark(&String::from_utf8_lossy(&o.stdout)))
            .unwrap_or(false)
    }
    #[cfg(not(target_os = "macos"))]
    {
        std::env::var("GTK_THEME")
            .map(|name| gtk_theme_is_dark(&name))
            .unwrap_or(true)
    }
}

/// `Adwaita:dark`, `Yaru-dark` and the macOS `Dark` style all say so by name.
fn gtk_theme_is_dark(name: &str) -> bool {
    name.trim().to_ascii_lowercase().contains("dark")
}

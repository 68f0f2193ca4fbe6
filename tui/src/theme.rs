//! Color theme and glyphs for the NEON_CORE boot screen.
//!
//! Uses a green-phosphor terminal palette by default with an optional
//! high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use neon_engine::StyleTag;

/// Presentation options resolved by the binary from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub high_contrast: bool,
    pub ascii_only: bool,
    /// Disable cursor blinking.
    pub reduced_motion: bool,
}

/// Phosphor palette constants.
mod colors {
    use super::Color;

    // === Backgrounds ===
    pub const BG_DARK: Color = Color::Rgb(8, 10, 8);
    pub const BG_PANEL: Color = Color::Rgb(14, 20, 15);
    pub const BG_BORDER: Color = Color::Rgb(38, 74, 46);

    // === Foregrounds ===
    pub const PHOSPHOR: Color = Color::Rgb(51, 255, 102);
    pub const PHOSPHOR_DIM: Color = Color::Rgb(31, 153, 61);
    pub const TEXT_MUTED: Color = Color::Rgb(90, 110, 95);

    // === Accent Colors ===
    pub const MAGENTA: Color = Color::Rgb(255, 46, 151); // neon pink
    pub const CYAN: Color = Color::Rgb(0, 229, 255);
    pub const AMBER: Color = Color::Rgb(255, 176, 0);

    // === Semantic Aliases ===
    pub const ACCENT: Color = CYAN;
    pub const WARNING: Color = AMBER;
    pub const LOGO: Color = MAGENTA;
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub warning: Color,
    pub logo: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_border: colors::BG_BORDER,
            text_primary: colors::PHOSPHOR,
            text_dim: colors::PHOSPHOR_DIM,
            text_muted: colors::TEXT_MUTED,
            accent: colors::ACCENT,
            warning: colors::WARNING,
            logo: colors::LOGO,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_dim: Color::Gray,
            text_muted: Color::Gray,
            accent: Color::Cyan,
            warning: Color::Yellow,
            logo: Color::White,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub cursor: &'static str,
    pub prompt: &'static str,
    pub rule: &'static str,
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            cursor: "_",
            prompt: ">",
            rule: "-",
        }
    } else {
        Glyphs {
            cursor: "█",
            prompt: "❯",
            rule: "─",
        }
    }
}

/// Frames per half blink period at the host's render cadence.
const CURSOR_BLINK_TICKS: usize = 30;

/// Whether the typing cursor is lit on frame `tick`.
///
/// With `reduced_motion` the cursor is always shown.
#[must_use]
pub fn cursor_visible(tick: usize, options: UiOptions) -> bool {
    options.reduced_motion || (tick / CURSOR_BLINK_TICKS) % 2 == 0
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style, StyleTag};

    /// Style for a boot line carrying `tag`. Unknown tags render like untagged lines.
    #[must_use]
    pub fn boot_line(palette: &Palette, tag: Option<&StyleTag>) -> Style {
        match tag.map(StyleTag::as_str) {
            Some("warning") => Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
            Some("log-entry") => Style::default().fg(palette.accent),
            _ => Style::default().fg(palette.text_primary),
        }
    }

    #[must_use]
    pub fn logo(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.logo)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }
}

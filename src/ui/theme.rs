//! Color theme for podview
//!
//! A warm "late night radio" palette on a near-black background, plus the
//! style helpers the views use.

use ratatui::style::{Color, Modifier, Style};

/// Palette and style helpers
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #101014
    pub const BACKGROUND: Color = Color::Rgb(0x10, 0x10, 0x14);

    /// Primary: #ffb347 (amber)
    pub const PRIMARY: Color = Color::Rgb(0xff, 0xb3, 0x47);

    /// Secondary: #7fd1ff (sky)
    pub const SECONDARY: Color = Color::Rgb(0x7f, 0xd1, 0xff);

    /// Accent: #ff6f91 (coral)
    pub const ACCENT: Color = Color::Rgb(0xff, 0x6f, 0x91);

    /// Text: #e6e1d6 (paper)
    pub const TEXT: Color = Color::Rgb(0xe6, 0xe1, 0xd6);

    /// Dim: #6b6860
    pub const DIM: Color = Color::Rgb(0x6b, 0x68, 0x60);

    /// Success: #8fe388
    pub const SUCCESS: Color = Color::Rgb(0x8f, 0xe3, 0x88);

    /// Error: #ff5c5c
    pub const ERROR: Color = Color::Rgb(0xff, 0x5c, 0x5c);

    /// Panel background for status bar and popups
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x1c, 0x1b, 0x22);

    /// Unfocused border (dim amber)
    pub const BORDER: Color = Color::Rgb(0x80, 0x5a, 0x24);

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Focused row: inverted amber
    pub fn row_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Loading placeholder
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn keybind() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn input() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .bg(Self::BACKGROUND_LIGHT)
            .add_modifier(Modifier::BOLD)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance per WCAG 2.0
pub fn relative_luminance((r, g, b): (u8, u8, u8)) -> f64 {
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Contrast ratio between 1 (same color) and 21 (black on white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let (a, b) = (relative_luminance(fg), relative_luminance(bg));
    (a.max(b) + 0.05) / (a.min(b) + 0.05)
}

/// RGB components of a `Color::Rgb`
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}

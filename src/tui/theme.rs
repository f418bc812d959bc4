use ratatui::style::{Color, Modifier, Style};

use crate::model::theme::{Palette, Preset, ThemePreference};
use crate::ops::theme_ops::parse_hex_color;

/// Terminal colors derived from a four-color palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub accent: Color,
    pub text: Color,
    /// Text blended halfway into the panel, for archived rows and hints
    pub dim: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_palette(&Preset::Moss.palette())
    }
}

impl Theme {
    /// Build terminal colors from a palette. Unparseable entries keep the
    /// default preset's color.
    pub fn from_palette(palette: &Palette) -> Self {
        let fallback = Preset::Moss.palette();
        let rgb = |value: &str, fallback: &str| {
            parse_hex_color(value)
                .or_else(|| parse_hex_color(fallback))
                .unwrap_or((0, 0, 0))
        };
        let bg = rgb(&palette.bg_color, &fallback.bg_color);
        let panel = rgb(&palette.panel_color, &fallback.panel_color);
        let accent = rgb(&palette.accent_color, &fallback.accent_color);
        let text = rgb(&palette.text_color, &fallback.text_color);

        Theme {
            background: to_color(bg),
            panel: to_color(panel),
            accent: to_color(accent),
            text: to_color(text),
            dim: to_color(blend(text, panel)),
            error: Color::Rgb(0xE0, 0x6C, 0x5F),
        }
    }

    pub fn from_preference(pref: &ThemePreference) -> Self {
        Theme::from_palette(&pref.palette())
    }

    pub fn panel_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.panel)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim).bg(self.panel)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent).bg(self.panel)
    }

    /// Highlighted row under the cursor
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}

fn to_color((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

fn blend(a: (u8, u8, u8), b: (u8, u8, u8)) -> (u8, u8, u8) {
    let mix = |x: u8, y: u8| ((x as u16 + y as u16) / 2) as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

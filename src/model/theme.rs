use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A four-color palette, stored under the `customTheme` key as
/// `{"bgColor": "#1a2d1a", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub bg_color: String,
    pub panel_color: String,
    pub accent_color: String,
    pub text_color: String,
}

/// Built-in palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Moss,
    Midnight,
    Stone,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Moss, Preset::Midnight, Preset::Stone];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Moss => "moss",
            Preset::Midnight => "midnight",
            Preset::Stone => "stone",
        }
    }

    pub fn palette(self) -> Palette {
        let (bg, panel, accent, text) = match self {
            Preset::Moss => ("#1a2d1a", "#2a3d3a", "#7a9b76", "#e8dcc4"),
            Preset::Midnight => ("#0f1419", "#1a2332", "#5a7a9b", "#d4dce8"),
            Preset::Stone => ("#2a2520", "#3d3530", "#a8956f", "#e8e0d0"),
        };
        Palette {
            bg_color: bg.into(),
            panel_color: panel.into(),
            accent_color: accent.into(),
            text_color: text.into(),
        }
    }

    /// The preset after this one, wrapping around
    pub fn next(self) -> Preset {
        match self {
            Preset::Moss => Preset::Midnight,
            Preset::Midnight => Preset::Stone,
            Preset::Stone => Preset::Moss,
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown theme: {}", s))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The user's theme choice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemePreference {
    Preset(Preset),
    Custom(Palette),
}

impl Default for ThemePreference {
    fn default() -> Self {
        ThemePreference::Preset(Preset::Moss)
    }
}

impl ThemePreference {
    /// Value stored under `currentTheme`
    pub fn name(&self) -> &str {
        match self {
            ThemePreference::Preset(p) => p.name(),
            ThemePreference::Custom(_) => "custom",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemePreference::Preset(p) => p.palette(),
            ThemePreference::Custom(palette) => palette.clone(),
        }
    }
}

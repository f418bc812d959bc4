use tracing::{debug, warn};

use crate::io::store::{DurableStore, StoreError};
use crate::model::theme::{Palette, Preset, ThemePreference};

pub const CURRENT_THEME_KEY: &str = "currentTheme";
pub const CUSTOM_THEME_KEY: &str = "customTheme";

const CUSTOM_NAME: &str = "custom";

/// Error type for theme operations
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("unknown theme: {0} (expected one of moss, midnight, stone)")]
    UnknownPreset(String),
    #[error("invalid {field} color {value:?}: expected #rrggbb")]
    InvalidColor { field: &'static str, value: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read the stored theme preference. Anything missing or unusable falls back
/// to the default preset.
pub fn load_theme<S: DurableStore + ?Sized>(store: &S) -> ThemePreference {
    let Some(raw) = store.load_preference(CURRENT_THEME_KEY) else {
        return ThemePreference::default();
    };
    let name = decode_name(&raw);

    if name == CUSTOM_NAME {
        let palette = store
            .load_preference(CUSTOM_THEME_KEY)
            .and_then(|raw| serde_json::from_str::<Palette>(&raw).ok())
            .filter(|p| validate_palette(p).is_ok());
        return match palette {
            Some(palette) => ThemePreference::Custom(palette),
            None => {
                warn!("custom theme selected but its palette is missing or invalid");
                ThemePreference::default()
            }
        };
    }

    match name.parse::<Preset>() {
        Ok(preset) => ThemePreference::Preset(preset),
        Err(_) => {
            warn!(theme = %name, "unknown stored theme");
            ThemePreference::default()
        }
    }
}

/// Select a preset. Any stored custom palette is discarded.
pub fn apply_preset<S: DurableStore + ?Sized>(
    store: &mut S,
    preset: Preset,
) -> Result<ThemePreference, ThemeError> {
    store.save_preference(CURRENT_THEME_KEY, &encode_name(preset.name()))?;
    store.remove_preference(CUSTOM_THEME_KEY)?;
    debug!(theme = %preset, "applied preset theme");
    Ok(ThemePreference::Preset(preset))
}

/// Select a user palette. Colors are normalized to lowercase.
pub fn apply_custom<S: DurableStore + ?Sized>(
    store: &mut S,
    palette: Palette,
) -> Result<ThemePreference, ThemeError> {
    validate_palette(&palette)?;
    let palette = Palette {
        bg_color: palette.bg_color.to_ascii_lowercase(),
        panel_color: palette.panel_color.to_ascii_lowercase(),
        accent_color: palette.accent_color.to_ascii_lowercase(),
        text_color: palette.text_color.to_ascii_lowercase(),
    };
    let json = serde_json::to_string(&palette).map_err(|e| StoreError::Encode {
        key: CUSTOM_THEME_KEY.to_string(),
        source: e,
    })?;
    store.save_preference(CUSTOM_THEME_KEY, &json)?;
    store.save_preference(CURRENT_THEME_KEY, &encode_name(CUSTOM_NAME))?;
    debug!("applied custom theme");
    Ok(ThemePreference::Custom(palette))
}

/// Parse a preset name for the command line and key bindings
pub fn parse_preset(name: &str) -> Result<Preset, ThemeError> {
    name.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| ThemeError::UnknownPreset(name.to_string()))
}

/// Parse `#rrggbb` into its three channels
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn validate_palette(palette: &Palette) -> Result<(), ThemeError> {
    let fields = [
        ("bgColor", &palette.bg_color),
        ("panelColor", &palette.panel_color),
        ("accentColor", &palette.accent_color),
        ("textColor", &palette.text_color),
    ];
    for (field, value) in fields {
        if parse_hex_color(value).is_none() {
            return Err(ThemeError::InvalidColor {
                field,
                value: value.clone(),
            });
        }
    }
    Ok(())
}

fn encode_name(name: &str) -> String {
    serde_json::Value::String(name.to_string()).to_string()
}

/// Stored names are JSON strings; bare names are accepted too.
fn decode_name(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.trim().to_string())
}

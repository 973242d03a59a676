use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub accent: Color,
    pub dim: Color,
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub selection_bg: Color,
    /// Dropdown and dialog background
    pub panel_bg: Color,
    pub panel_border: Color,
    /// Text of the paired custom value input
    pub custom: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x14, 0x1C),
            text: Color::Rgb(0xC8, 0xCC, 0xD4),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            accent: Color::Rgb(0xF5, 0xA6, 0x23),
            dim: Color::Rgb(0x6B, 0x72, 0x80),
            error: Color::Rgb(0xEF, 0x53, 0x50),
            warning: Color::Rgb(0xFF, 0xD5, 0x4F),
            success: Color::Rgb(0x66, 0xBB, 0x6A),
            selection_bg: Color::Rgb(0x26, 0x32, 0x44),
            panel_bg: Color::Rgb(0x1A, 0x20, 0x2C),
            panel_border: Color::Rgb(0xF5, 0xA6, 0x23),
            custom: Color::Rgb(0x4F, 0xC3, 0xF7),
        }
    }
}

/// Parse a hex color string like "#EF5350" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui.colors]` table, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "accent" => theme.accent = color,
                "dim" => theme.dim = color,
                "error" => theme.error = color,
                "warning" => theme.warning = color,
                "success" => theme.success = color,
                "selection_bg" => theme.selection_bg = color,
                "panel_bg" => theme.panel_bg = color,
                "panel_border" => theme.panel_border = color,
                "custom" => theme.custom = color,
                _ => tracing::warn!(key = %key, "unknown theme color"),
            }
        }
        theme
    }
}

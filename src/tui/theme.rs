use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }

    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFA, 0xF7, 0xFF),
            text: Color::Rgb(0x3A, 0x32, 0x66),
            text_bright: Color::Rgb(0x0C, 0x00, 0x1B),
            highlight: Color::Rgb(0xD0, 0x1E, 0x73),
            dim: Color::Rgb(0x8E, 0x88, 0xB5),
            red: Color::Rgb(0xC6, 0x28, 0x28),
            yellow: Color::Rgb(0xB2, 0x86, 0x00),
            green: Color::Rgb(0x1B, 0x8A, 0x4B),
            cyan: Color::Rgb(0x00, 0x83, 0x9E),
            purple: Color::Rgb(0x84, 0x3C, 0xC8),
            blue: Color::Rgb(0x24, 0x5E, 0xD1),
            selection_bg: Color::Rgb(0xEC, 0xDD, 0xF5),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
        }
    }

    /// Dark or light palette with `[ui.colors]` overrides applied on top.
    pub fn from_config(ui: &UiConfig, dark: bool) -> Self {
        let mut theme = if dark { Theme::dark() } else { Theme::light() };

        for (key, value) in &ui.colors {
            let color = match parse_hex_color(value) {
                Some(c) => c,
                None => {
                    log::warn!("ignoring color {}: {:?} is not #RRGGBB", key, value);
                    continue;
                }
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                _ => {}
            }
        }

        theme
    }

    /// Colors cycled through by the hue-shift effect
    pub fn hue_cycle(&self) -> [Color; 6] {
        [
            self.highlight,
            self.purple,
            self.blue,
            self.cyan,
            self.green,
            self.yellow,
        ]
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF4444"), Some(Color::Rgb(0xFF, 0x44, 0x44)));
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.colors.insert("highlight".into(), "not a color".into());

        let theme = Theme::from_config(&ui, true);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.highlight, Theme::dark().highlight);
        assert_eq!(theme.text, Theme::dark().text);
    }

    #[test]
    fn test_light_palette_differs() {
        let ui = UiConfig::default();
        assert_eq!(Theme::from_config(&ui, false), Theme::light());
        assert_ne!(Theme::light().background, Theme::dark().background);
    }
}

use ratatui::style::Color;

use crate::model::UiConfig;
use crate::ops::board::PALETTE_SIZE;

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Category colors, assigned by alphabetical rank
const DEFAULT_PALETTE: [Color; PALETTE_SIZE] = [
    rgb(0xEF4444),
    rgb(0x10B981),
    rgb(0xF59E0B),
    rgb(0x3B82F6),
    rgb(0x8B5CF6),
    rgb(0xEC4899),
    rgb(0x14B8A6),
    rgb(0xF97316),
];

/// Colors used by the board, the form and the popups
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    /// Focused field, edit marker
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    /// Row under the cursor, highlighted suggestion
    pub selection_bg: Color,
    pub palette: [Color; PALETTE_SIZE],
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: rgb(0x0F172A),
            text: rgb(0xCBD5E1),
            text_bright: rgb(0xF8FAFC),
            highlight: rgb(0x38BDF8),
            dim: rgb(0x64748B),
            red: rgb(0xF87171),
            green: rgb(0x34D399),
            selection_bg: rgb(0x1E293B),
            palette: DEFAULT_PALETTE,
        }
    }
}

/// `#rrggbb` to a color; anything else is `None`.
fn parse_hex_color(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb)
}

impl Theme {
    /// Defaults with `[ui.colors]` and `[ui].palette` applied on top.
    /// Unknown slot names and unparseable colors are ignored.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (name, value) in &ui.colors {
            if let (Some(slot), Some(color)) = (theme.slot_mut(name), parse_hex_color(value)) {
                *slot = color;
            }
        }

        // Palette entries replace slots in order; extra entries are ignored
        for (slot, value) in theme.palette.iter_mut().zip(&ui.palette) {
            if let Some(color) = parse_hex_color(value) {
                *slot = color;
            }
        }

        theme
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Color> {
        Some(match name {
            "background" => &mut self.background,
            "text" => &mut self.text,
            "text_bright" => &mut self.text_bright,
            "highlight" => &mut self.highlight,
            "dim" => &mut self.dim,
            "red" => &mut self.red,
            "green" => &mut self.green,
            "selection_bg" => &mut self.selection_bg,
            _ => return None,
        })
    }

    /// Color for a card's palette slot
    pub fn category_color(&self, color_index: usize) -> Color {
        self.palette[color_index % PALETTE_SIZE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ef4444"), Some(Color::Rgb(0xEF, 0x44, 0x44)));
        assert_eq!(parse_hex_color("ef4444"), None);
        assert_eq!(parse_hex_color("#ef44"), None);
        assert_eq!(parse_hex_color("#+f4444"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn palette_cycles() {
        let theme = Theme::default();
        assert_eq!(theme.category_color(0), Color::Rgb(0xEF, 0x44, 0x44));
        assert_eq!(theme.category_color(3), Color::Rgb(0x3B, 0x82, 0xF6));
        assert_eq!(theme.category_color(7), Color::Rgb(0xF9, 0x73, 0x16));
        assert_eq!(theme.category_color(8), theme.category_color(0));
    }

    #[test]
    fn config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.colors.insert("nonsense".into(), "#ffffff".into());
        ui.palette = vec!["#112233".into(), "bogus".into(), "#445566".into()];

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.text, Theme::default().text);
        assert_eq!(theme.palette[0], Color::Rgb(0x11, 0x22, 0x33));
        // Unparseable entry keeps the default slot
        assert_eq!(theme.palette[1], DEFAULT_PALETTE[1]);
        assert_eq!(theme.palette[2], Color::Rgb(0x44, 0x55, 0x66));
        assert_eq!(theme.palette[3], DEFAULT_PALETTE[3]);
    }
}

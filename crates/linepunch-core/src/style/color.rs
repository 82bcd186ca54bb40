//! Colors as the automation layer reports them

use std::fmt;

/// A font, fill or border color
///
/// Spreadsheet automation reports colors as `0x00BBGGRR` integers; theme and
/// palette colors have no such value and are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Whatever the grid picks (black text, no fill)
    #[default]
    Auto,
    Rgb { r: u8, g: u8, b: u8 },
    Theme { index: u8, tint: i8 },
    /// Legacy 56-entry palette
    Indexed(u8),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
    pub const LIGHT_GRAY: Color = Color::rgb(0xD9, 0xD9, 0xD9);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Decode an automation color integer
    pub fn from_bgr(value: u32) -> Self {
        let [r, g, b, _] = value.to_le_bytes();
        Color::Rgb { r, g, b }
    }

    /// Encode as an automation color integer; `Auto` reads back as black
    pub fn to_bgr(&self) -> Option<u32> {
        match *self {
            Color::Auto => Some(0),
            Color::Rgb { r, g, b } => Some(u32::from_le_bytes([r, g, b, 0])),
            Color::Theme { .. } | Color::Indexed(_) => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => f.write_str("auto"),
            Color::Rgb { r, g, b } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Theme { index, tint } => write!(f, "theme{}{:+}", index, tint),
            Color::Indexed(i) => write!(f, "indexed{}", i),
        }
    }
}

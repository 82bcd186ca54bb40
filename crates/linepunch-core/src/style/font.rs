//! Fonts

use std::hash::{Hash, Hasher};

use super::Color;

/// The font attributes a row copy carries over as one unit
///
/// Size is kept in points as the grid reports it (fractional sizes such as
/// 10.5 occur), so equality and hashing compare the raw bits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontStyle {
    pub name: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
}

impl FontStyle {
    /// Face and size used by cells that were never formatted
    pub const DEFAULT_NAME: &'static str = "Calibri";
    pub const DEFAULT_SIZE: f64 = 11.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Bold variant of this font
    pub fn emphasized(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            size: Self::DEFAULT_SIZE,
            bold: false,
            italic: false,
            color: Color::Auto,
        }
    }
}

impl Eq for FontStyle {}

impl Hash for FontStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        (self.bold, self.italic).hash(state);
        self.color.hash(state);
    }
}

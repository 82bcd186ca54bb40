//! Cell interior

use super::Color;

/// Interior pattern and color
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FillStyle {
    pub pattern: FillPattern,
    pub color: Color,
}

impl FillStyle {
    /// Solid interior in `color`
    pub fn solid(color: Color) -> Self {
        Self {
            pattern: FillPattern::Solid,
            color,
        }
    }
}

/// Interior patterns the grid can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillPattern {
    #[default]
    None,
    Solid,
    /// Shaded (25/50/75% gray)
    Gray25,
    Gray50,
    Gray75,
    Horizontal,
    Vertical,
    Checker,
}

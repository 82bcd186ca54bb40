//! Per-cell formatting
//!
//! A [`Style`] bundles everything row propagation copies from a template
//! cell: font, interior, borders, alignment and number format. Worksheets
//! store each distinct style once in a [`StylePool`].

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod number_format;
mod pool;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderSide, BorderStyle, BorderWeight};
pub use color::Color;
pub use fill::{FillPattern, FillStyle};
pub use font::FontStyle;
pub use number_format::NumberFormat;
pub use pool::StylePool;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Style {
    pub font: FontStyle,
    pub fill: FillStyle,
    pub border: BorderStyle,
    pub alignment: Alignment,
    pub number_format: NumberFormat,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    /// Solid interior
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::solid(color);
        self
    }

    /// Number format from a format code (`"General"` maps to the default)
    pub fn number_format(mut self, code: &str) -> Self {
        self.number_format = NumberFormat::from_code(code);
        self
    }

    pub fn wrap_text(mut self, wrap: bool) -> Self {
        self.alignment.wrap_text = wrap;
        self
    }

    pub fn with_border(mut self, side: BorderSide, edge: BorderEdge) -> Self {
        self.border.set(side, edge);
        self
    }
}

//! Border style types

use super::Color;

/// One side of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BorderSide {
    Left,
    Top,
    Right,
    Bottom,
}

impl BorderSide {
    /// All four sides, in the order reports list them
    pub const ALL: [BorderSide; 4] = [
        BorderSide::Left,
        BorderSide::Top,
        BorderSide::Right,
        BorderSide::Bottom,
    ];

    /// Lowercase name ("left", "top", ...)
    pub fn name(&self) -> &'static str {
        match self {
            BorderSide::Left => "left",
            BorderSide::Top => "top",
            BorderSide::Right => "right",
            BorderSide::Bottom => "bottom",
        }
    }

    /// The side facing this one on the neighbouring cell
    pub fn opposite(&self) -> BorderSide {
        match self {
            BorderSide::Left => BorderSide::Right,
            BorderSide::Right => BorderSide::Left,
            BorderSide::Top => BorderSide::Bottom,
            BorderSide::Bottom => BorderSide::Top,
        }
    }
}

/// Border edges of a cell, one per side
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BorderStyle {
    /// Left border
    pub left: BorderEdge,
    /// Top border
    pub top: BorderEdge,
    /// Right border
    pub right: BorderEdge,
    /// Bottom border
    pub bottom: BorderEdge,
}

impl BorderStyle {
    /// Create a new border style with no borders
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all four sides to the same edge
    pub fn all(edge: BorderEdge) -> Self {
        Self {
            left: edge.clone(),
            top: edge.clone(),
            right: edge.clone(),
            bottom: edge,
        }
    }

    /// Get the edge for one side
    pub fn get(&self, side: BorderSide) -> &BorderEdge {
        match side {
            BorderSide::Left => &self.left,
            BorderSide::Top => &self.top,
            BorderSide::Right => &self.right,
            BorderSide::Bottom => &self.bottom,
        }
    }

    /// Replace the edge for one side
    pub fn set(&mut self, side: BorderSide, edge: BorderEdge) {
        match side {
            BorderSide::Left => self.left = edge,
            BorderSide::Top => self.top = edge,
            BorderSide::Right => self.right = edge,
            BorderSide::Bottom => self.bottom = edge,
        }
    }

    /// Check if any side draws a line
    pub fn has_any(&self) -> bool {
        BorderSide::ALL.iter().any(|s| self.get(*s).is_active())
    }
}

/// A single border edge
///
/// Each attribute is independently optional: an absent or unreadable value
/// is a valid state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BorderEdge {
    /// Line style
    pub line_style: Option<BorderLineStyle>,
    /// Line weight
    pub weight: Option<BorderWeight>,
    /// Line color
    pub color: Option<Color>,
}

impl BorderEdge {
    /// Create a fully specified border edge
    pub fn new(line_style: BorderLineStyle, weight: BorderWeight, color: Color) -> Self {
        Self {
            line_style: Some(line_style),
            weight: Some(weight),
            color: Some(color),
        }
    }

    /// An edge with no attributes set
    pub fn none() -> Self {
        Self::default()
    }

    /// An explicitly cleared edge (line style None)
    pub fn cleared() -> Self {
        Self {
            line_style: Some(BorderLineStyle::None),
            weight: None,
            color: None,
        }
    }

    /// Create a thin black continuous border
    pub fn thin() -> Self {
        Self::new(BorderLineStyle::Continuous, BorderWeight::Thin, Color::BLACK)
    }

    /// Create a medium black continuous border
    pub fn medium() -> Self {
        Self::new(
            BorderLineStyle::Continuous,
            BorderWeight::Medium,
            Color::BLACK,
        )
    }

    /// True when the edge draws a visible line
    pub fn is_active(&self) -> bool {
        matches!(self.line_style, Some(style) if style != BorderLineStyle::None)
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderLineStyle {
    /// No border
    #[default]
    None,
    /// Solid line
    Continuous,
    /// Dashed line
    Dash,
    /// Dash-dot
    DashDot,
    /// Dash-dot-dot
    DashDotDot,
    /// Dotted line
    Dot,
    /// Double line
    Double,
    /// Slant dash-dot
    SlantDashDot,
}

/// Border line weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderWeight {
    Hairline,
    Thin,
    Medium,
    Thick,
}

impl BorderWeight {
    /// Numeric weight (hairline = 1 ... thick = 4)
    pub fn as_number(&self) -> u8 {
        match self {
            BorderWeight::Hairline => 1,
            BorderWeight::Thin => 2,
            BorderWeight::Medium => 3,
            BorderWeight::Thick => 4,
        }
    }

    /// Weight from its numeric value
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(BorderWeight::Hairline),
            2 => Some(BorderWeight::Thin),
            3 => Some(BorderWeight::Medium),
            4 => Some(BorderWeight::Thick),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_edges() {
        assert!(BorderEdge::thin().is_active());
        assert!(!BorderEdge::none().is_active());
        assert!(!BorderEdge::cleared().is_active());
    }

    #[test]
    fn test_get_set_side() {
        let mut border = BorderStyle::new();
        assert!(!border.has_any());
        border.set(BorderSide::Bottom, BorderEdge::medium());
        assert_eq!(border.get(BorderSide::Bottom), &BorderEdge::medium());
        assert_eq!(border.get(BorderSide::Top), &BorderEdge::none());
        assert!(border.has_any());
    }

    #[test]
    fn test_weight_numbers() {
        assert_eq!(BorderWeight::Thin.as_number(), 2);
        assert_eq!(BorderWeight::from_number(4), Some(BorderWeight::Thick));
        assert_eq!(BorderWeight::from_number(9), None);
        assert_eq!(BorderSide::Top.opposite(), BorderSide::Bottom);
    }
}

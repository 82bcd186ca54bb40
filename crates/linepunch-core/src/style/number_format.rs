//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Custom format string
    Custom(String),
}

impl NumberFormat {
    /// Create from a format code, mapping "General" to [`NumberFormat::General`]
    pub fn from_code<S: Into<String>>(code: S) -> Self {
        let code = code.into();
        if code.eq_ignore_ascii_case("general") {
            NumberFormat::General
        } else {
            NumberFormat::Custom(code)
        }
    }

    /// The format code as an automation layer would report it
    pub fn code(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::Custom(code) => code,
        }
    }
}

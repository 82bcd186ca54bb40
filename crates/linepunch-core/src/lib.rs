//! # linepunch-core
//!
//! Grid vocabulary shared by the linepunch crates.
//!
//! This crate provides:
//! - [`CellPosition`] and [`MergeRegion`] - 1-indexed grid addressing
//! - [`Style`] and its parts - fonts, fills, borders, alignment, number formats
//! - [`GridAccessor`] - the capability set the analysis engine works against
//! - [`Worksheet`], [`Workbook`] - an in-memory grid implementing [`GridAccessor`]
//!
//! ## Example
//!
//! ```rust
//! use linepunch_core::{GridAccessor, MergeRegion, Worksheet};
//!
//! let mut sheet = Worksheet::new("Budget");
//! sheet.set_cell_value(1, 1, "Category").unwrap();
//! sheet.set_merge_region(MergeRegion::new(1, 1, 1, 6).unwrap()).unwrap();
//!
//! let area = sheet.merge_area(1, 3).unwrap();
//! assert_eq!(area.left, 1);
//! assert_eq!(area.cols, 6);
//! ```

pub mod accessor;
pub mod cell;
pub mod error;
pub mod storage;
pub mod style;
pub mod workbook;
pub mod worksheet;

#[cfg(feature = "serde")]
pub mod snapshot;

pub use accessor::{AppSettings, CalculationMode, GridAccessor};
pub use cell::{column_to_letters, letters_to_column, CellPosition, CellValue, MergeRegion};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderSide, BorderWeight, Color, FillPattern,
    FillStyle, FontStyle, HorizontalAlignment, NumberFormat, Style, StylePool, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

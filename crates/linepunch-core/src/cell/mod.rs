//! Cell-related types

mod position;
mod value;

pub use position::{column_to_letters, letters_to_column, CellPosition, MergeRegion};
pub use value::CellValue;

pub(crate) use position::{check_col, check_row};

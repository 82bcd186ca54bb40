//! Cell positions and merge regions
//!
//! All coordinates are 1-indexed, matching the row and column numbers a
//! user sees in a spreadsheet application.

use std::fmt;

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A cell position (row, column), both 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPosition {
    /// Row number (1 = first row)
    pub row: u32,
    /// Column number (1 = column A)
    pub col: u32,
}

impl CellPosition {
    /// Create a position, validating both indices
    pub fn new(row: u32, col: u32) -> Result<Self> {
        check_row(row)?;
        check_col(col)?;
        Ok(Self { row, col })
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", column_to_letters(self.col), self.row)
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// A rectangular merge region
///
/// A region with `rows == 1 && cols == 1` is the degenerate "no merge" area
/// of a single cell. Regions are created and destroyed as a unit; every cell
/// they cover resolves to the same region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeRegion {
    /// Top row
    pub top: u32,
    /// Leftmost column
    pub left: u32,
    /// Number of rows spanned (>= 1)
    pub rows: u32,
    /// Number of columns spanned (>= 1)
    pub cols: u32,
}

impl MergeRegion {
    /// Create a region from its top-left corner and extent
    pub fn new(top: u32, left: u32, rows: u32, cols: u32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidRegion(format!(
                "extent {}x{} at row {}, column {}",
                rows, cols, top, left
            )));
        }
        check_row(top)?;
        check_col(left)?;
        let region = Self {
            top,
            left,
            rows,
            cols,
        };
        check_row(region.bottom())?;
        check_col(region.right())?;
        Ok(region)
    }

    /// Create a region from inclusive corner coordinates
    pub fn from_corners(top: u32, left: u32, bottom: u32, right: u32) -> Result<Self> {
        if bottom < top || right < left {
            return Err(Error::InvalidRegion(format!(
                "corners ({}, {}) -> ({}, {})",
                top, left, bottom, right
            )));
        }
        Self::new(top, left, bottom - top + 1, right - left + 1)
    }

    /// The 1x1 area of a single, unmerged cell
    pub fn single(row: u32, col: u32) -> Self {
        Self {
            top: row,
            left: col,
            rows: 1,
            cols: 1,
        }
    }

    /// Last row covered
    pub fn bottom(&self) -> u32 {
        self.top + self.rows - 1
    }

    /// Last column covered
    pub fn right(&self) -> u32 {
        self.left + self.cols - 1
    }

    /// True for the degenerate 1x1 area
    pub fn is_single(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    /// One row tall and more than one column wide
    pub fn is_horizontal(&self) -> bool {
        self.rows == 1 && self.cols > 1
    }

    /// Spans more than one row
    pub fn is_vertical(&self) -> bool {
        self.rows > 1
    }

    /// Check if a cell lies inside this region
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.top && row <= self.bottom() && col >= self.left && col <= self.right()
    }

    /// Check if this region overlaps with another
    pub fn overlaps(&self, other: &MergeRegion) -> bool {
        self.top <= other.bottom()
            && self.bottom() >= other.top
            && self.left <= other.right()
            && self.right() >= other.left
    }

    /// Check if `other` lies entirely within this region
    pub fn covers(&self, other: &MergeRegion) -> bool {
        other.top >= self.top
            && other.bottom() <= self.bottom()
            && other.left >= self.left
            && other.right() <= self.right()
    }

    /// The same column span on a different row
    pub fn on_row(&self, row: u32) -> Self {
        Self {
            top: row,
            left: self.left,
            rows: 1,
            cols: self.cols,
        }
    }

    /// Iterate over the positions of every covered cell (row by row)
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.top..=self.bottom()).flat_map(move |r| (self.left..=self.right()).map(move |c| (r, c)))
    }

    /// Size key used by merge histograms, e.g. `"1x6"`
    pub fn size_key(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        let start = format!("{}{}", column_to_letters(self.left), self.top);
        if self.is_single() {
            start
        } else {
            format!(
                "{}:{}{}",
                start,
                column_to_letters(self.right()),
                self.bottom()
            )
        }
    }
}

impl fmt::Display for MergeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA)
pub fn column_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Convert column letters to a 1-based column number (A = 1, AA = 27)
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::other("empty column letters"));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::other(format!("invalid column letter '{}'", c)));
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if col > MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
        }
    }

    Ok(col)
}

pub(crate) fn check_row(row: u32) -> Result<()> {
    if row == 0 || row > MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS));
    }
    Ok(())
}

pub(crate) fn check_col(col: u32) -> Result<()> {
    if col == 0 || col > MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS));
    }
    Ok(())
}

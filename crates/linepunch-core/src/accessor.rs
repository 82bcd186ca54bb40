//! The grid access contract
//!
//! [`GridAccessor`] is the capability set the analysis engine is written
//! against. Implementations may wrap a live spreadsheet application, a
//! document model, or the in-memory [`Worksheet`](crate::Worksheet).
//!
//! Every method is fallible. Callers decide which failures are fatal: the
//! format propagator absorbs single-property failures, while a failed
//! [`insert_row`](GridAccessor::insert_row) aborts the operation.

use crate::cell::{CellPosition, MergeRegion};
use crate::error::{Error, Result};
use crate::style::{Alignment, BorderEdge, BorderSide, FillStyle, FontStyle, NumberFormat};
use crate::MAX_ROWS;

/// Recalculation mode of the hosting application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalculationMode {
    #[default]
    Automatic,
    SemiAutomatic,
    Manual,
}

/// Application-wide settings that slow down bulk edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppSettings {
    /// Repaint after each change
    pub screen_updating: bool,
    /// Fire application events
    pub enable_events: bool,
    /// Show confirmation dialogs
    pub display_alerts: bool,
    /// Recalculation mode
    pub calculation: CalculationMode,
}

impl AppSettings {
    /// Everything that costs time during a multi-step edit switched off
    pub fn fast() -> Self {
        Self {
            screen_updating: false,
            enable_events: false,
            display_alerts: false,
            calculation: CalculationMode::Manual,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            screen_updating: true,
            enable_events: true,
            display_alerts: true,
            calculation: CalculationMode::Automatic,
        }
    }
}

/// Read/write access to a 1-indexed spreadsheet grid
pub trait GridAccessor {
    /// Displayed text of a cell (empty string for an empty cell)
    fn cell_text(&self, row: u32, col: u32) -> Result<String>;

    /// The merge region covering a cell, if the cell is merged
    fn merge_region(&self, row: u32, col: u32) -> Result<Option<MergeRegion>>;

    /// Merge the cells of `region`
    fn set_merge_region(&mut self, region: MergeRegion) -> Result<()>;

    /// One border edge of a cell
    fn border(&self, row: u32, col: u32, side: BorderSide) -> Result<BorderEdge>;

    /// Replace one border edge of a cell
    fn set_border(&mut self, row: u32, col: u32, side: BorderSide, edge: &BorderEdge)
        -> Result<()>;

    /// Font of a cell
    fn font(&self, row: u32, col: u32) -> Result<FontStyle>;

    /// Replace the font of a cell
    fn set_font(&mut self, row: u32, col: u32, font: &FontStyle) -> Result<()>;

    /// Fill (interior) of a cell
    fn fill(&self, row: u32, col: u32) -> Result<FillStyle>;

    /// Replace the fill of a cell
    fn set_fill(&mut self, row: u32, col: u32, fill: &FillStyle) -> Result<()>;

    /// Alignment and wrap flag of a cell
    fn alignment(&self, row: u32, col: u32) -> Result<Alignment>;

    /// Replace the alignment of a cell
    fn set_alignment(&mut self, row: u32, col: u32, alignment: &Alignment) -> Result<()>;

    /// Number format of a cell
    fn number_format(&self, row: u32, col: u32) -> Result<NumberFormat>;

    /// Replace the number format of a cell
    fn set_number_format(&mut self, row: u32, col: u32, format: &NumberFormat) -> Result<()>;

    /// Number of rows in use (0 for an empty grid)
    fn used_row_count(&self) -> Result<u32>;

    /// Number of columns in use (0 for an empty grid)
    fn used_column_count(&self) -> Result<u32>;

    /// Whether `row` is addressable at all
    fn row_exists(&self, row: u32) -> bool {
        row >= 1 && row <= MAX_ROWS
    }

    /// Insert one blank row directly below `after`, shifting later rows down
    fn insert_row(&mut self, after: u32) -> Result<()>;

    /// The cell the user is positioned on
    fn active_cell(&self) -> Result<CellPosition>;

    /// Move the selection to a cell
    fn select(&mut self, row: u32, col: u32) -> Result<()>;

    /// Current application settings
    fn app_settings(&self) -> Result<AppSettings> {
        Err(Error::Unsupported("application settings"))
    }

    /// Apply application settings
    fn set_app_settings(&mut self, _settings: &AppSettings) -> Result<()> {
        Err(Error::Unsupported("application settings"))
    }

    /// Cancel any pending cut/copy marquee
    fn clear_copy_mode(&mut self) -> Result<()> {
        Ok(())
    }

    /// The merge area of a cell, or its own 1x1 area when unmerged
    fn merge_area(&self, row: u32, col: u32) -> Result<MergeRegion> {
        Ok(self
            .merge_region(row, col)?
            .unwrap_or_else(|| MergeRegion::single(row, col)))
    }

    /// The outer edge of a rectangular range on one side
    ///
    /// Attributes that differ between the cells along that side read as
    /// `None`, the way an automation layer reports a mixed range.
    fn range_border(&self, range: &MergeRegion, side: BorderSide) -> Result<BorderEdge> {
        let mut cells = edge_cells(range, side);
        let (row, col) = cells
            .next()
            .ok_or_else(|| Error::InvalidRegion(range.to_string()))?;
        let mut edge = self.border(row, col, side)?;
        for (row, col) in cells {
            let other = self.border(row, col, side)?;
            if edge.line_style != other.line_style {
                edge.line_style = None;
            }
            if edge.weight != other.weight {
                edge.weight = None;
            }
            if edge.color != other.color {
                edge.color = None;
            }
        }
        Ok(edge)
    }

    /// Set the outer edge of a rectangular range on one side
    fn set_range_border(
        &mut self,
        range: &MergeRegion,
        side: BorderSide,
        edge: &BorderEdge,
    ) -> Result<()> {
        for (row, col) in edge_cells(range, side) {
            self.set_border(row, col, side, edge)?;
        }
        Ok(())
    }
}

/// Cells along one outer side of a range
fn edge_cells(range: &MergeRegion, side: BorderSide) -> Box<dyn Iterator<Item = (u32, u32)>> {
    let range = *range;
    match side {
        BorderSide::Left => Box::new((range.top..=range.bottom()).map(move |r| (r, range.left))),
        BorderSide::Right => {
            Box::new((range.top..=range.bottom()).map(move |r| (r, range.right())))
        }
        BorderSide::Top => Box::new((range.left..=range.right()).map(move |c| (range.top, c))),
        BorderSide::Bottom => {
            Box::new((range.left..=range.right()).map(move |c| (range.bottom(), c)))
        }
    }
}

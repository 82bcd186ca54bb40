//! Worksheet type

use crate::accessor::{AppSettings, GridAccessor};
use crate::cell::{check_col, check_row, CellPosition, CellValue, MergeRegion};
use crate::error::{Error, Result};
use crate::storage::{CellData, CellStorage};
use crate::style::{Alignment, BorderEdge, BorderSide, FillStyle, FontStyle, NumberFormat, Style};
use crate::MAX_ROWS;

/// An in-memory worksheet
///
/// Implements [`GridAccessor`] directly, so it serves both as the document
/// model behind snapshot files and as the test double for the engine.
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
    /// Active cell, if the sheet has one
    active_cell: Option<CellPosition>,
    /// Host application settings
    settings: AppSettings,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            active_cell: None,
            settings: AppSettings::default(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get a cell value (Empty for untouched cells)
    pub fn get_value(&self, row: u32, col: u32) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Set a cell value
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, row: u32, col: u32, value: V) -> Result<()> {
        check_row(row)?;
        check_col(col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// The style of a cell
    pub fn cell_style(&self, row: u32, col: u32) -> &Style {
        self.cells.style(row, col)
    }

    /// Set the full style of a cell
    pub fn set_cell_style(&mut self, row: u32, col: u32, style: &Style) -> Result<()> {
        check_row(row)?;
        check_col(col)?;
        self.cells.set_style(row, col, style.clone());
        Ok(())
    }

    /// Apply the same style to every cell of a row span
    pub fn set_row_style(&mut self, row: u32, first_col: u32, last_col: u32, style: &Style) -> Result<()> {
        for col in first_col..=last_col {
            self.set_cell_style(row, col, style)?;
        }
        Ok(())
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, &CellData)> {
        self.cells.iter()
    }

    /// Check if the sheet has no cells and no merges
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // === Merged Cells ===

    /// Get merged regions
    pub fn merged_regions(&self) -> &[MergeRegion] {
        self.cells.merged_regions()
    }

    /// Unmerge cells
    pub fn unmerge_cells(&mut self, region: &MergeRegion) -> bool {
        self.cells.remove_merged_region(region)
    }

    // === Selection and settings ===

    /// Set the active cell
    pub fn set_active_cell(&mut self, row: u32, col: u32) -> Result<()> {
        self.active_cell = Some(CellPosition::new(row, col)?);
        Ok(())
    }

    /// The current selection, if any
    pub fn selection(&self) -> Option<CellPosition> {
        self.active_cell
    }

    /// Host application settings
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    fn update_style<F: FnOnce(&mut Style)>(&mut self, row: u32, col: u32, f: F) -> Result<()> {
        check_row(row)?;
        check_col(col)?;
        self.cells.update_style(row, col, f);
        Ok(())
    }
}

impl GridAccessor for Worksheet {
    fn cell_text(&self, row: u32, col: u32) -> Result<String> {
        Ok(self.get_value(row, col).to_string())
    }

    fn merge_region(&self, row: u32, col: u32) -> Result<Option<MergeRegion>> {
        Ok(self.cells.merge_at(row, col).copied())
    }

    fn set_merge_region(&mut self, region: MergeRegion) -> Result<()> {
        self.cells.add_merged_region(region)
    }

    fn border(&self, row: u32, col: u32, side: BorderSide) -> Result<BorderEdge> {
        Ok(self.cells.style(row, col).border.get(side).clone())
    }

    fn set_border(
        &mut self,
        row: u32,
        col: u32,
        side: BorderSide,
        edge: &BorderEdge,
    ) -> Result<()> {
        self.update_style(row, col, |s| s.border.set(side, edge.clone()))
    }

    fn font(&self, row: u32, col: u32) -> Result<FontStyle> {
        Ok(self.cells.style(row, col).font.clone())
    }

    fn set_font(&mut self, row: u32, col: u32, font: &FontStyle) -> Result<()> {
        self.update_style(row, col, |s| s.font = font.clone())
    }

    fn fill(&self, row: u32, col: u32) -> Result<FillStyle> {
        Ok(self.cells.style(row, col).fill.clone())
    }

    fn set_fill(&mut self, row: u32, col: u32, fill: &FillStyle) -> Result<()> {
        self.update_style(row, col, |s| s.fill = fill.clone())
    }

    fn alignment(&self, row: u32, col: u32) -> Result<Alignment> {
        Ok(self.cells.style(row, col).alignment.clone())
    }

    fn set_alignment(&mut self, row: u32, col: u32, alignment: &Alignment) -> Result<()> {
        self.update_style(row, col, |s| s.alignment = alignment.clone())
    }

    fn number_format(&self, row: u32, col: u32) -> Result<NumberFormat> {
        Ok(self.cells.style(row, col).number_format.clone())
    }

    fn set_number_format(&mut self, row: u32, col: u32, format: &NumberFormat) -> Result<()> {
        self.update_style(row, col, |s| s.number_format = format.clone())
    }

    fn used_row_count(&self) -> Result<u32> {
        Ok(self.cells.used_extent().0)
    }

    fn used_column_count(&self) -> Result<u32> {
        Ok(self.cells.used_extent().1)
    }

    fn insert_row(&mut self, after: u32) -> Result<()> {
        if after >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(after + 1, MAX_ROWS));
        }
        let (used_rows, _) = self.cells.used_extent();
        if used_rows >= MAX_ROWS {
            return Err(Error::other("no room to insert a row: last row is in use"));
        }
        self.cells.insert_row_after(after);
        Ok(())
    }

    fn active_cell(&self) -> Result<CellPosition> {
        self.active_cell
            .ok_or_else(|| Error::other(format!("sheet '{}' has no active cell", self.name)))
    }

    fn select(&mut self, row: u32, col: u32) -> Result<()> {
        self.set_active_cell(row, col)
    }

    fn app_settings(&self) -> Result<AppSettings> {
        Ok(self.settings)
    }

    fn set_app_settings(&mut self, settings: &AppSettings) -> Result<()> {
        self.settings = *settings;
        Ok(())
    }
}

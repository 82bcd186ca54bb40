//! Cell storage implementation
//!
//! Sparse row-based storage for worksheet cells plus the merge table.
//! Only non-empty cells are stored, using a row-based BTreeMap structure.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::cell::{CellValue, MergeRegion};
use crate::error::{Error, Result};
use crate::style::{Style, StylePool};

/// Complete data for a single cell
#[derive(Debug, Clone, Default)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Index into the style pool (0 = default style)
    pub style_index: u32,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style_index: 0,
        }
    }

    /// Check if this cell is effectively empty (no value and default style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style_index == 0
    }
}

/// Sparse row-based storage for worksheet cells
///
/// Structure: `BTreeMap<row, BTreeMap<col, CellData>>`. Merge regions live in
/// a flat list; a `(row, col) -> region index` map answers "which region
/// covers this cell" without back-references from cells to regions.
#[derive(Debug, Clone)]
pub struct CellStorage {
    /// Row index -> column map
    rows: BTreeMap<u32, BTreeMap<u32, CellData>>,

    /// Shared style pool for deduplication
    style_pool: StylePool,

    /// Merged cell regions (never overlapping)
    merged_regions: Vec<MergeRegion>,

    /// Covered cell -> index into `merged_regions`
    merge_index: AHashMap<(u32, u32), usize>,
}

impl CellStorage {
    /// Create a new empty cell storage
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            style_pool: StylePool::new(),
            merged_regions: Vec::new(),
            merge_index: AHashMap::new(),
        }
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u32) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Set a cell
    ///
    /// If the cell data is empty (no value, default style), the cell is removed.
    pub fn set(&mut self, row: u32, col: u32, data: CellData) {
        if data.is_empty() {
            if let Some(row_map) = self.rows.get_mut(&row) {
                row_map.remove(&col);
                if row_map.is_empty() {
                    self.rows.remove(&row);
                }
            }
        } else {
            self.rows.entry(row).or_default().insert(col, data);
        }
    }

    /// Set just the cell value (preserving style)
    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        let style_index = self.get(row, col).map(|c| c.style_index).unwrap_or(0);
        self.set(row, col, CellData { value, style_index });
    }

    /// The style of a cell (the default style for untouched cells)
    pub fn style(&self, row: u32, col: u32) -> &Style {
        let index = self.get(row, col).map(|c| c.style_index).unwrap_or(0);
        self.style_pool
            .get(index)
            .unwrap_or_else(|| self.style_pool.default_style())
    }

    /// Replace the style of a cell (preserving value)
    pub fn set_style(&mut self, row: u32, col: u32, style: Style) {
        let style_index = self.style_pool.intern(&style);
        let value = self
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default();
        self.set(row, col, CellData { value, style_index });
    }

    /// Modify the style of a cell in place
    pub fn update_style<F: FnOnce(&mut Style)>(&mut self, row: u32, col: u32, f: F) {
        let mut style = self.style(row, col).clone();
        f(&mut style);
        self.set_style(row, col, style);
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if storage is empty (no cells and no merges)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.merged_regions.is_empty()
    }

    /// Largest used row and column, counting values, styles and merges
    pub fn used_extent(&self) -> (u32, u32) {
        let mut max_row = 0;
        let mut max_col = 0;
        for (&row, cols) in &self.rows {
            max_row = max_row.max(row);
            if let Some((&col, _)) = cols.iter().next_back() {
                max_col = max_col.max(col);
            }
        }
        for region in &self.merged_regions {
            max_row = max_row.max(region.bottom());
            max_col = max_col.max(region.right());
        }
        (max_row, max_col)
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, data)| (row, col, data)))
    }

    // === Merged regions ===

    /// Get merged regions
    pub fn merged_regions(&self) -> &[MergeRegion] {
        &self.merged_regions
    }

    /// The region covering a cell, if any
    pub fn merge_at(&self, row: u32, col: u32) -> Option<&MergeRegion> {
        self.merge_index
            .get(&(row, col))
            .and_then(|&i| self.merged_regions.get(i))
    }

    /// Add a merge region
    ///
    /// Existing regions that lie entirely inside `region` are absorbed; a
    /// partial overlap is rejected so regions never overlap.
    pub fn add_merged_region(&mut self, region: MergeRegion) -> Result<()> {
        // Regions may arrive unvalidated from deserialization
        let region = MergeRegion::new(region.top, region.left, region.rows, region.cols)?;
        if let Some(conflict) = self
            .merged_regions
            .iter()
            .find(|existing| existing.overlaps(&region) && !region.covers(existing))
        {
            return Err(Error::MergedCellConflict(
                region.to_string(),
                conflict.to_string(),
            ));
        }
        self.merged_regions.retain(|existing| !region.covers(existing));
        if !region.is_single() {
            self.merged_regions.push(region);
        }
        self.rebuild_merge_index();
        Ok(())
    }

    /// Remove the merge region exactly matching `region`
    pub fn remove_merged_region(&mut self, region: &MergeRegion) -> bool {
        let before = self.merged_regions.len();
        self.merged_regions.retain(|existing| existing != region);
        let removed = self.merged_regions.len() != before;
        if removed {
            self.rebuild_merge_index();
        }
        removed
    }

    fn rebuild_merge_index(&mut self) {
        self.merge_index.clear();
        for (i, region) in self.merged_regions.iter().enumerate() {
            for cell in region.cells() {
                self.merge_index.insert(cell, i);
            }
        }
    }

    // === Structure ===

    /// Insert one blank row below `after`
    ///
    /// Rows after `after` move down by one. Regions below move with their
    /// rows, regions straddling the insertion point grow by one row, and
    /// regions ending at or above `after` are unchanged.
    pub fn insert_row_after(&mut self, after: u32) {
        let moved = self.rows.split_off(&(after + 1));
        for (row, cols) in moved {
            self.rows.insert(row + 1, cols);
        }

        for region in &mut self.merged_regions {
            if region.top > after {
                region.top += 1;
            } else if region.bottom() > after {
                region.rows += 1;
            }
        }
        self.rebuild_merge_index();
    }
}

impl Default for CellStorage {
    fn default() -> Self {
        Self::new()
    }
}

//! Structure detection
//!
//! Infers the structural role of rows from merge geometry, border presence
//! and cell text. Nothing here mutates the grid.
//!
//! Detection never fails: a cell whose merge area cannot be read is treated
//! as unmerged, unreadable text as empty, and an unreadable border as absent.

use linepunch_core::{BorderSide, GridAccessor, MergeRegion};
use tracing::debug;

use crate::options::DetectionOptions;

/// A one-row merge spanning more than one column, e.g. a section header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizontalMergeBlock {
    pub row: u32,
    pub start_col: u32,
    pub end_col: u32,
    pub width: u32,
}

impl HorizontalMergeBlock {
    fn from_region(region: &MergeRegion) -> Self {
        Self {
            row: region.top,
            start_col: region.left,
            end_col: region.right(),
            width: region.cols,
        }
    }

    /// The merge region this block was read from
    pub fn region(&self) -> MergeRegion {
        MergeRegion {
            top: self.row,
            left: self.start_col,
            rows: 1,
            cols: self.width,
        }
    }
}

/// Read-only structure queries against a grid
pub struct StructureDetector<'a, G: GridAccessor + ?Sized> {
    grid: &'a G,
    options: &'a DetectionOptions,
}

impl<'a, G: GridAccessor + ?Sized> StructureDetector<'a, G> {
    /// Create a detector over `grid`
    pub fn new(grid: &'a G, options: &'a DetectionOptions) -> Self {
        Self { grid, options }
    }

    /// The options in effect
    pub fn options(&self) -> &DetectionOptions {
        self.options
    }

    fn area(&self, row: u32, col: u32) -> MergeRegion {
        match self.grid.merge_area(row, col) {
            Ok(area) => area,
            Err(err) => {
                debug!(row, col, error = %err, "merge area unreadable, treating cell as unmerged");
                MergeRegion::single(row, col)
            }
        }
    }

    /// Horizontal merge blocks starting on `row`, left to right
    ///
    /// Columns `1..=max_cols` are scanned; after a block the scan resumes
    /// just past its right edge.
    pub fn horizontal_merges_on_row(&self, row: u32, max_cols: u32) -> Vec<HorizontalMergeBlock> {
        let mut blocks = Vec::new();
        if !self.grid.row_exists(row) {
            return blocks;
        }

        let mut col = 1;
        while col <= max_cols {
            let area = self.area(row, col);
            if area.is_horizontal() && area.top == row {
                blocks.push(HorizontalMergeBlock::from_region(&area));
                col = area.right() + 1;
            } else {
                col += 1;
            }
        }
        blocks
    }

    /// The widest horizontal block on `start_row` or up to `scan_up` rows above
    ///
    /// Rows are visited nearest first and a block only replaces the current
    /// best when strictly wider, so the closer row wins ties.
    pub fn nearest_header_merge(
        &self,
        start_row: u32,
        scan_up: u32,
        max_cols: u32,
    ) -> Option<HorizontalMergeBlock> {
        let lowest = start_row.saturating_sub(scan_up).max(1);
        let mut best: Option<HorizontalMergeBlock> = None;

        for row in (lowest..=start_row).rev() {
            for block in self.horizontal_merges_on_row(row, max_cols) {
                if best.map_or(true, |b| block.width > b.width) {
                    best = Some(block);
                }
            }
        }

        debug!(start_row, header = ?best, "nearest header merge");
        best
    }

    /// Multi-row merge regions covering `row` in columns `1..=max_scan_cols`
    ///
    /// A region wider than one column is reported once.
    pub fn vertical_merges_touching_row(&self, row: u32, max_scan_cols: u32) -> Vec<MergeRegion> {
        let mut regions: Vec<MergeRegion> = Vec::new();
        if !self.grid.row_exists(row) {
            return regions;
        }

        for col in 1..=max_scan_cols {
            let area = self.area(row, col);
            if area.is_vertical() && !regions.contains(&area) {
                regions.push(area);
            }
        }
        regions
    }

    /// Whether `row` looks like a section header for a table `used_cols` wide
    ///
    /// True iff the widest horizontal block on the row is at least
    /// `max(header_min_width, used_cols * header_threshold_ratio)` wide.
    pub fn is_header_like(&self, row: u32, used_cols: u32) -> bool {
        let widest = self
            .horizontal_merges_on_row(row, used_cols)
            .iter()
            .map(|b| b.width)
            .max();
        match widest {
            Some(width) => width >= self.options.header_width_threshold(used_cols),
            None => false,
        }
    }

    /// The nearest row around `start_row` that is not header-like
    ///
    /// Rows above are preferred. The downward probe stops at the first row
    /// that does not exist.
    pub fn nearest_data_row(&self, start_row: u32, used_cols: u32) -> Option<u32> {
        let distance = self.options.data_scan_distance;
        let lowest = start_row.saturating_sub(distance).max(1);

        let found = (lowest..start_row)
            .rev()
            .find(|&row| !self.is_header_like(row, used_cols))
            .or_else(|| {
                (1..=distance)
                    .map(|offset| start_row.saturating_add(offset))
                    .take_while(|&row| self.grid.row_exists(row))
                    .find(|&row| !self.is_header_like(row, used_cols))
            });

        debug!(start_row, data_row = ?found, "nearest data row");
        found
    }

    /// The column extent of the table at `anchor_row`
    ///
    /// Uses the nearest header merge when there is one; otherwise the
    /// rightmost merge, text or border on the anchor row itself. The result
    /// is at least 1 and at most the used column count capped by
    /// `width_hard_cap`.
    pub fn effective_max_cols(&self, anchor_row: u32) -> u32 {
        let cap = self.options.width_hard_cap;
        let used_cols = match self.grid.used_column_count() {
            Ok(count) => count,
            Err(err) => {
                debug!(error = %err, "used column count unreadable, using hard cap");
                cap
            }
        }
        .min(cap);

        if let Some(header) =
            self.nearest_header_merge(anchor_row, self.options.header_scan_up, used_cols)
        {
            let width = header.end_col.min(used_cols);
            debug!(anchor_row, width, "effective width from header");
            return width;
        }

        let mut last = 1;
        for col in 1..=used_cols {
            let area = self.area(anchor_row, col);
            if !area.is_single() {
                last = last.max(area.right());
            } else if self.has_text(anchor_row, col) || self.has_border(anchor_row, col) {
                last = last.max(col);
            }
        }

        let width = last.min(used_cols).max(1);
        debug!(anchor_row, width, "effective width from anchor row");
        width
    }

    fn has_text(&self, row: u32, col: u32) -> bool {
        self.grid
            .cell_text(row, col)
            .map(|text| !text.trim().is_empty())
            .unwrap_or(false)
    }

    fn has_border(&self, row: u32, col: u32) -> bool {
        BorderSide::ALL.iter().any(|&side| {
            self.grid
                .border(row, col, side)
                .map(|edge| edge.is_active())
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linepunch_core::{BorderEdge, Worksheet};
    use pretty_assertions::assert_eq;

    fn merge(sheet: &mut Worksheet, top: u32, left: u32, rows: u32, cols: u32) {
        sheet
            .set_merge_region(MergeRegion::new(top, left, rows, cols).unwrap())
            .unwrap();
    }

    #[test]
    fn test_no_merges_no_blocks() {
        let mut sheet = Worksheet::new("Plan");
        sheet.set_cell_value(4, 2, "text").unwrap();
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        for row in 1..=6 {
            assert!(detector.horizontal_merges_on_row(row, 30).is_empty());
        }
    }

    #[test]
    fn test_block_and_resume() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 4, 3, 1, 5);
        merge(&mut sheet, 4, 8, 1, 2);
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        let blocks = detector.horizontal_merges_on_row(4, 30);
        assert_eq!(
            blocks,
            vec![
                HorizontalMergeBlock {
                    row: 4,
                    start_col: 3,
                    end_col: 7,
                    width: 5
                },
                HorizontalMergeBlock {
                    row: 4,
                    start_col: 8,
                    end_col: 9,
                    width: 2
                },
            ]
        );
        assert_eq!(blocks[0].region(), MergeRegion::new(4, 3, 1, 5).unwrap());
    }

    #[test]
    fn test_block_past_max_cols_not_seen() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 2, 6, 1, 3);
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        assert!(detector.horizontal_merges_on_row(2, 5).is_empty());
        assert_eq!(detector.horizontal_merges_on_row(2, 6).len(), 1);
    }

    #[test]
    fn test_vertical_region_is_not_horizontal() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 3, 1, 2, 3);
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        assert!(detector.horizontal_merges_on_row(3, 30).is_empty());
        assert_eq!(
            detector.vertical_merges_touching_row(4, 7),
            vec![MergeRegion::new(3, 1, 2, 3).unwrap()]
        );
    }

    #[test]
    fn test_nearest_header_prefers_wider_then_closer() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 2, 1, 1, 8);
        merge(&mut sheet, 6, 1, 1, 4);
        merge(&mut sheet, 8, 2, 1, 4);
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        let header = detector.nearest_header_merge(10, 20, 30).unwrap();
        assert_eq!(header.row, 2);
        assert_eq!(header.width, 8);

        // Rows 8 and 6 tie at width 4; row 2 is outside the window
        let header = detector.nearest_header_merge(9, 6, 30).unwrap();
        assert_eq!(header.row, 8);

        assert!(detector.nearest_header_merge(1, 20, 30).is_none());
    }

    #[test]
    fn test_header_scan_window_is_inclusive() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 5, 1, 1, 6);
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        assert!(detector.nearest_header_merge(25, 20, 30).is_some());
        assert!(detector.nearest_header_merge(26, 20, 30).is_none());
    }

    #[test]
    fn test_is_header_like_threshold() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 1, 1, 1, 6);
        merge(&mut sheet, 2, 1, 1, 4);
        merge(&mut sheet, 3, 1, 1, 5);
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        assert!(detector.is_header_like(1, 12));
        assert!(!detector.is_header_like(2, 12));
        assert!(!detector.is_header_like(3, 12));
        assert!(detector.is_header_like(3, 8));
        assert!(!detector.is_header_like(4, 8));
    }

    #[test]
    fn test_header_like_is_monotonic_in_width() {
        let mut sheet = Worksheet::new("Plan");
        for (row, width) in (1..=10).zip(2..=11) {
            merge(&mut sheet, row, 1, 1, width);
        }
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        for narrow in 1..=10 {
            for wide in narrow..=10 {
                if detector.is_header_like(narrow, 12) {
                    assert!(detector.is_header_like(wide, 12));
                }
            }
        }
    }

    #[test]
    fn test_nearest_data_row_skips_headers() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 9, 1, 1, 8);
        merge(&mut sheet, 8, 1, 1, 8);
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        assert_eq!(detector.nearest_data_row(10, 8), Some(7));
        let found = detector.nearest_data_row(10, 8).unwrap();
        assert!(!detector.is_header_like(found, 8));
    }

    #[test]
    fn test_nearest_data_row_searches_down() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 1, 1, 1, 8);
        merge(&mut sheet, 3, 1, 1, 8);
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        assert_eq!(detector.nearest_data_row(2, 8), Some(4));
        assert_eq!(detector.nearest_data_row(1, 8), Some(2));
    }

    #[test]
    fn test_nearest_data_row_none_when_all_headers() {
        let mut sheet = Worksheet::new("Plan");
        for row in 1..=6 {
            merge(&mut sheet, row, 1, 1, 8);
        }
        let options = DetectionOptions::default().with_data_scan_distance(2);
        let detector = StructureDetector::new(&sheet, &options);

        assert_eq!(detector.nearest_data_row(3, 8), None);
    }

    #[test]
    fn test_effective_width_from_header() {
        let mut sheet = Worksheet::new("Plan");
        merge(&mut sheet, 2, 1, 1, 6);
        sheet.set_cell_value(5, 9, "notes").unwrap();
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        assert_eq!(detector.effective_max_cols(5), 6);
    }

    #[test]
    fn test_effective_width_from_anchor_row() {
        let mut sheet = Worksheet::new("Plan");
        sheet.set_cell_value(4, 2, "Labour").unwrap();
        sheet
            .set_border(4, 5, BorderSide::Bottom, &BorderEdge::thin())
            .unwrap();
        sheet.set_cell_value(9, 11, "far").unwrap();
        let options = DetectionOptions::default();
        let detector = StructureDetector::new(&sheet, &options);

        assert_eq!(detector.effective_max_cols(4), 5);
        assert_eq!(detector.effective_max_cols(6), 1);
    }

    #[test]
    fn test_effective_width_bounds() {
        let empty = Worksheet::new("Empty");
        let options = DetectionOptions::default();
        assert_eq!(StructureDetector::new(&empty, &options).effective_max_cols(3), 1);

        let mut wide = Worksheet::new("Wide");
        wide.set_cell_value(1, 80, "x").unwrap();
        for col in 1..=80 {
            wide.set_cell_value(3, col, "v").unwrap();
        }
        let detector = StructureDetector::new(&wide, &options);
        assert_eq!(detector.effective_max_cols(3), 50);

        let capped = DetectionOptions::default().with_width_hard_cap(10);
        let detector = StructureDetector::new(&wide, &capped);
        assert_eq!(detector.effective_max_cols(3), 10);
    }
}

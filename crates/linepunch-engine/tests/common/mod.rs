//! Shared fixtures for engine tests.

#![allow(dead_code)]

use linepunch_core::{
    Alignment, AppSettings, BorderEdge, BorderSide, CellPosition, Error, FillStyle, FontStyle,
    GridAccessor, MergeRegion, NumberFormat, Result, Style, Worksheet,
};

pub fn merge(sheet: &mut Worksheet, top: u32, left: u32, rows: u32, cols: u32) {
    sheet
        .set_merge_region(MergeRegion::new(top, left, rows, cols).unwrap())
        .unwrap();
}

/// A budget-style sheet: a 1x6 section header on row 5 and one category
/// whose 4x1 label covers rows 6-9, with thin-bordered data rows.
pub fn category_sheet() -> Worksheet {
    let mut sheet = Worksheet::new("Budget");

    sheet.set_cell_value(5, 1, "Operating costs").unwrap();
    sheet
        .set_row_style(5, 1, 6, &Style::new().bold(true).font_size(13.0))
        .unwrap();
    merge(&mut sheet, 5, 1, 1, 6);

    let data_style = Style::new()
        .number_format("#,##0.00")
        .with_border(BorderSide::Left, BorderEdge::thin())
        .with_border(BorderSide::Right, BorderEdge::thin())
        .with_border(BorderSide::Bottom, BorderEdge::thin());
    for row in 6..=9 {
        sheet.set_row_style(row, 1, 6, &data_style).unwrap();
        sheet.set_cell_value(row, 2, format!("item {}", row)).unwrap();
    }
    sheet.set_cell_value(6, 1, "Labour").unwrap();
    merge(&mut sheet, 6, 1, 4, 1);

    sheet
}

/// Which accessor calls should fail
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Every font read fails
    pub font_reads: bool,
    /// Row insertions beyond this many fail
    pub inserts_allowed: Option<usize>,
    /// Row insertion panics
    pub panic_on_insert: bool,
    /// Every border write on this side fails
    pub border_writes: Option<BorderSide>,
}

/// A worksheet wrapper that fails selected accessor calls
pub struct FaultyGrid {
    pub inner: Worksheet,
    pub faults: Faults,
    inserts: usize,
}

impl FaultyGrid {
    pub fn new(inner: Worksheet, faults: Faults) -> Self {
        Self {
            inner,
            faults,
            inserts: 0,
        }
    }
}

impl GridAccessor for FaultyGrid {
    fn cell_text(&self, row: u32, col: u32) -> Result<String> {
        self.inner.cell_text(row, col)
    }

    fn merge_region(&self, row: u32, col: u32) -> Result<Option<MergeRegion>> {
        self.inner.merge_region(row, col)
    }

    fn set_merge_region(&mut self, region: MergeRegion) -> Result<()> {
        self.inner.set_merge_region(region)
    }

    fn border(&self, row: u32, col: u32, side: BorderSide) -> Result<BorderEdge> {
        self.inner.border(row, col, side)
    }

    fn set_border(
        &mut self,
        row: u32,
        col: u32,
        side: BorderSide,
        edge: &BorderEdge,
    ) -> Result<()> {
        if self.faults.border_writes == Some(side) {
            return Err(Error::other(format!("{} border is locked", side.name())));
        }
        self.inner.set_border(row, col, side, edge)
    }

    fn font(&self, row: u32, col: u32) -> Result<FontStyle> {
        if self.faults.font_reads {
            return Err(Error::Unreadable {
                what: "font",
                row,
                col,
            });
        }
        self.inner.font(row, col)
    }

    fn set_font(&mut self, row: u32, col: u32, font: &FontStyle) -> Result<()> {
        self.inner.set_font(row, col, font)
    }

    fn fill(&self, row: u32, col: u32) -> Result<FillStyle> {
        self.inner.fill(row, col)
    }

    fn set_fill(&mut self, row: u32, col: u32, fill: &FillStyle) -> Result<()> {
        self.inner.set_fill(row, col, fill)
    }

    fn alignment(&self, row: u32, col: u32) -> Result<Alignment> {
        self.inner.alignment(row, col)
    }

    fn set_alignment(&mut self, row: u32, col: u32, alignment: &Alignment) -> Result<()> {
        self.inner.set_alignment(row, col, alignment)
    }

    fn number_format(&self, row: u32, col: u32) -> Result<NumberFormat> {
        self.inner.number_format(row, col)
    }

    fn set_number_format(&mut self, row: u32, col: u32, format: &NumberFormat) -> Result<()> {
        self.inner.set_number_format(row, col, format)
    }

    fn used_row_count(&self) -> Result<u32> {
        self.inner.used_row_count()
    }

    fn used_column_count(&self) -> Result<u32> {
        self.inner.used_column_count()
    }

    fn insert_row(&mut self, after: u32) -> Result<()> {
        if self.faults.panic_on_insert {
            panic!("insert_row exploded");
        }
        if let Some(allowed) = self.faults.inserts_allowed {
            if self.inserts >= allowed {
                return Err(Error::other("row insertion refused"));
            }
        }
        self.inserts += 1;
        self.inner.insert_row(after)
    }

    fn active_cell(&self) -> Result<CellPosition> {
        self.inner.active_cell()
    }

    fn select(&mut self, row: u32, col: u32) -> Result<()> {
        self.inner.select(row, col)
    }

    fn app_settings(&self) -> Result<AppSettings> {
        self.inner.app_settings()
    }

    fn set_app_settings(&mut self, settings: &AppSettings) -> Result<()> {
        self.inner.set_app_settings(settings)
    }
}

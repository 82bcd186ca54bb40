//! Sampled merge and formatting analysis
//!
//! An [`Analyzer`] walks a directory of workbook snapshots and records, for a
//! bounded sample of cells on every sheet, the merge area, the displayed
//! text and optionally the borders and font. A per-sheet histogram of merge
//! block sizes ("1x6", "4x1", ...) summarizes which layouts occur.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use linepunch_core::snapshot::read_workbook;
use linepunch_core::{
    BorderEdge, BorderLineStyle, BorderSide, CellPosition, FontStyle, GridAccessor, MergeRegion,
};
use linepunch_engine::PerformanceMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ReportResult;
use crate::sample::sample_cells;
use crate::scan::list_workbook_files;

/// Longest value preview kept per cell, in characters
pub const VALUE_PREVIEW_LEN: usize = 40;

/// Options for a bulk analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeOptions {
    /// Upper bound on inspected cells per sheet
    pub max_cells_per_sheet: usize,
    /// Also record borders and fonts (slower)
    pub include_borders: bool,
    /// File extensions to pick up, without the dot
    pub extensions: Vec<String>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_cells_per_sheet: 2000,
            include_borders: false,
            extensions: vec!["json".to_string()],
        }
    }
}

impl AnalyzeOptions {
    /// Set the per-sheet cell budget
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells_per_sheet = max_cells;
        self
    }

    /// Record borders and fonts
    pub fn with_borders(mut self, include: bool) -> Self {
        self.include_borders = include;
        self
    }
}

/// A value that was either read or failed to read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading<T> {
    Failed { error: String },
    Value(T),
}

impl<T> Reading<T> {
    /// The value, if it was read
    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(value) => Some(value),
            Reading::Failed { .. } => None,
        }
    }
}

/// One border edge as recorded in a report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSnapshot {
    pub line_style: Option<BorderLineStyle>,
    /// Numeric weight, 1 (hairline) to 4 (thick)
    pub weight: Option<u8>,
    /// Color as a 0x00BBGGRR integer
    pub color: Option<u32>,
}

impl From<&BorderEdge> for BorderSnapshot {
    fn from(edge: &BorderEdge) -> Self {
        Self {
            line_style: edge.line_style,
            weight: edge.weight.map(|w| w.as_number()),
            color: edge.color.and_then(|c| c.to_bgr()),
        }
    }
}

/// A font as recorded in a report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSnapshot {
    pub name: String,
    /// Whole points
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<u32>,
}

impl From<&FontStyle> for FontSnapshot {
    fn from(font: &FontStyle) -> Self {
        Self {
            name: font.name.clone(),
            size: font.size.max(0.0).trunc() as u32,
            bold: font.bold,
            italic: font.italic,
            color: font.color.to_bgr(),
        }
    }
}

/// What was found at one sampled cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellReport {
    /// A1 address
    pub address: String,
    pub row: u32,
    pub col: u32,
    pub value_preview: String,
    pub merge: Option<MergeRegion>,
    /// Keyed by side name ("left", "top", ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub borders: BTreeMap<String, Reading<BorderSnapshot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Reading<FontSnapshot>>,
}

/// A sampled cell: inspected, or the reason it could not be
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellEntry {
    Failed { row: u32, col: u32, error: String },
    Inspected(CellReport),
}

impl CellEntry {
    pub fn row(&self) -> u32 {
        match self {
            CellEntry::Failed { row, .. } => *row,
            CellEntry::Inspected(report) => report.row,
        }
    }

    pub fn col(&self) -> u32 {
        match self {
            CellEntry::Failed { col, .. } => *col,
            CellEntry::Inspected(report) => report.col,
        }
    }

    /// The report, unless inspection failed
    pub fn report(&self) -> Option<&CellReport> {
        match self {
            CellEntry::Inspected(report) => Some(report),
            CellEntry::Failed { .. } => None,
        }
    }
}

/// Histogram of merge block sizes over the sampled cells
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeBlocksSummary {
    /// "RxC" to the number of sampled cells inside such a block
    pub block_sizes: BTreeMap<String, usize>,
    pub distinct_block_count: usize,
}

/// Analysis of one sheet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetReport {
    pub name: String,
    pub used_rows: u32,
    pub used_cols: u32,
    pub sampled_cell_count: usize,
    pub merge_blocks_summary: MergeBlocksSummary,
    pub cells: Vec<CellEntry>,
}

/// Analysis of one file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReport {
    pub file: String,
    pub sheets: Vec<SheetReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Analysis of a directory
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisReport {
    pub files: Vec<FileReport>,
}

impl AnalysisReport {
    /// Read a report written by [`write_json_report`]
    pub fn load<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Count merge block sizes over a set of sampled cells
pub fn merge_blocks_summary(cells: &[CellEntry]) -> MergeBlocksSummary {
    let mut block_sizes = BTreeMap::new();
    for merge in cells
        .iter()
        .filter_map(CellEntry::report)
        .filter_map(|report| report.merge.as_ref())
    {
        *block_sizes.entry(merge.size_key()).or_insert(0) += 1;
    }
    MergeBlocksSummary {
        distinct_block_count: block_sizes.len(),
        block_sizes,
    }
}

fn inspect_cell<G: GridAccessor + ?Sized>(
    grid: &G,
    row: u32,
    col: u32,
    options: &AnalyzeOptions,
) -> linepunch_core::Result<CellReport> {
    let address = CellPosition::new(row, col)?.to_a1_string();
    let merge = grid.merge_region(row, col)?;
    let text = grid.cell_text(row, col)?;

    let mut borders = BTreeMap::new();
    let mut font = None;
    if options.include_borders {
        for side in BorderSide::ALL {
            let reading = match grid.border(row, col, side) {
                Ok(edge) => Reading::Value(BorderSnapshot::from(&edge)),
                Err(_) => Reading::Failed {
                    error: "border_read_failed".to_string(),
                },
            };
            borders.insert(side.name().to_string(), reading);
        }
        font = Some(match grid.font(row, col) {
            Ok(f) => Reading::Value(FontSnapshot::from(&f)),
            Err(_) => Reading::Failed {
                error: "font_read_failed".to_string(),
            },
        });
    }

    Ok(CellReport {
        address,
        row,
        col,
        value_preview: text.chars().take(VALUE_PREVIEW_LEN).collect(),
        merge,
        borders,
        font,
    })
}

/// Analyze one sheet
///
/// A cell that cannot be inspected is recorded with its error and the scan
/// moves on; an unreadable used range counts as empty.
pub fn analyze_sheet<G: GridAccessor + ?Sized>(
    name: &str,
    grid: &G,
    options: &AnalyzeOptions,
) -> SheetReport {
    let used_rows = grid.used_row_count().unwrap_or_else(|err| {
        warn!(sheet = name, %err, "used row count unavailable");
        0
    });
    let used_cols = grid.used_column_count().unwrap_or_else(|err| {
        warn!(sheet = name, %err, "used column count unavailable");
        0
    });

    let sampled = sample_cells(used_rows, used_cols, options.max_cells_per_sheet);
    let cells: Vec<CellEntry> = sampled
        .iter()
        .map(|&(row, col)| match inspect_cell(grid, row, col, options) {
            Ok(report) => CellEntry::Inspected(report),
            Err(err) => {
                debug!(sheet = name, row, col, %err, "cell inspection failed");
                CellEntry::Failed {
                    row,
                    col,
                    error: format!("cell_inspect_failed: {}", err),
                }
            }
        })
        .collect();

    SheetReport {
        name: name.to_string(),
        used_rows,
        used_cols,
        sampled_cell_count: sampled.len(),
        merge_blocks_summary: merge_blocks_summary(&cells),
        cells,
    }
}

/// Analyzes every workbook snapshot under a directory
#[derive(Debug, Clone)]
pub struct Analyzer {
    root: PathBuf,
    options: AnalyzeOptions,
}

impl Analyzer {
    pub fn new<P: Into<PathBuf>>(root: P, options: AnalyzeOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    /// Analyze every matching file
    ///
    /// Only a failure to list the directory is an error; files that cannot
    /// be opened are recorded in the report.
    pub fn analyze(&self) -> ReportResult<AnalysisReport> {
        let files = list_workbook_files(&self.root, &self.options.extensions)?;
        let files: Vec<FileReport> = files.iter().map(|path| self.analyze_file(path)).collect();
        info!(
            root = %self.root.display(),
            files = files.len(),
            failed = files.iter().filter(|f| f.error.is_some()).count(),
            "analysis finished"
        );
        Ok(AnalysisReport { files })
    }

    /// Analyze one snapshot file
    pub fn analyze_file(&self, path: &Path) -> FileReport {
        let file = path.display().to_string();
        let mut workbook = match read_workbook(path) {
            Ok(workbook) => workbook,
            Err(err) => {
                warn!(%file, %err, "could not open workbook");
                return FileReport {
                    file,
                    sheets: Vec::new(),
                    error: Some(format!("open_failed: {}", err)),
                };
            }
        };

        let mut sheets = Vec::with_capacity(workbook.sheet_count());
        for sheet in workbook.worksheets_mut() {
            let name = sheet.name().to_string();
            let fast = PerformanceMode::enter(sheet);
            sheets.push(analyze_sheet(&name, &*fast, &self.options));
        }
        debug!(%file, sheets = sheets.len(), "analyzed workbook");

        FileReport {
            file,
            sheets,
            error: None,
        }
    }
}

/// Write a report as pretty-printed JSON, creating parent directories
pub fn write_json_report<P: AsRef<Path>>(report: &AnalysisReport, path: P) -> ReportResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linepunch_core::{BorderWeight, Style, Worksheet};
    use pretty_assertions::assert_eq;

    fn sheet() -> Worksheet {
        let mut sheet = Worksheet::new("Budget");
        sheet.set_cell_value(1, 1, "Operating costs").unwrap();
        sheet
            .set_merge_region(MergeRegion::new(1, 1, 1, 3).unwrap())
            .unwrap();
        sheet
            .set_merge_region(MergeRegion::new(2, 1, 2, 1).unwrap())
            .unwrap();
        let closing = Style::new()
            .bold(true)
            .with_border(BorderSide::Top, BorderEdge::medium());
        sheet.set_cell_style(3, 3, &closing).unwrap();
        sheet
    }

    #[test]
    fn test_analyze_sheet_counts_blocks() {
        let report = analyze_sheet("Budget", &sheet(), &AnalyzeOptions::default());

        assert_eq!(report.used_rows, 3);
        assert_eq!(report.used_cols, 3);
        assert_eq!(report.sampled_cell_count, 9);
        assert_eq!(report.merge_blocks_summary.block_sizes.get("1x3"), Some(&3));
        assert_eq!(report.merge_blocks_summary.block_sizes.get("2x1"), Some(&2));
        assert_eq!(report.merge_blocks_summary.distinct_block_count, 2);

        let first = report.cells[0].report().unwrap();
        assert_eq!(first.address, "A1");
        assert_eq!(first.value_preview, "Operating costs");
        assert!(first.borders.is_empty());
        assert!(first.font.is_none());
    }

    #[test]
    fn test_borders_and_fonts_when_requested() {
        let options = AnalyzeOptions::default().with_borders(true);
        let report = analyze_sheet("Budget", &sheet(), &options);

        let cell = report
            .cells
            .iter()
            .filter_map(CellEntry::report)
            .find(|c| c.address == "C3")
            .unwrap();
        let top = cell.borders["top"].value().unwrap();
        assert_eq!(top.weight, Some(BorderWeight::Medium.as_number()));
        assert_eq!(top.color, Some(0));
        assert!(cell.font.as_ref().unwrap().value().unwrap().bold);
        assert_eq!(cell.borders.len(), 4);
    }

    #[test]
    fn test_preview_is_truncated() {
        let mut sheet = Worksheet::new("Notes");
        sheet.set_cell_value(1, 1, "x".repeat(100)).unwrap();
        let report = analyze_sheet("Notes", &sheet, &AnalyzeOptions::default());
        let preview = &report.cells[0].report().unwrap().value_preview;
        assert_eq!(preview.len(), VALUE_PREVIEW_LEN);
    }

    #[test]
    fn test_failed_cell_round_trips_as_failure() {
        let entry = CellEntry::Failed {
            row: 4,
            col: 2,
            error: "cell_inspect_failed: boom".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"row":4,"col":2,"error":"cell_inspect_failed: boom"}"#);
        let back: CellEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_empty_sheet_has_no_samples() {
        let sheet = Worksheet::new("Empty");
        let report = analyze_sheet("Empty", &sheet, &AnalyzeOptions::default());
        assert_eq!(report.sampled_cell_count, 0);
        assert!(report.cells.is_empty());
        assert_eq!(report.merge_blocks_summary, MergeBlocksSummary::default());
    }
}

//! # linepunch-report
//!
//! Bulk analysis of how spreadsheets use merged cells, borders and fonts.
//!
//! - [`Analyzer`] samples every sheet of every snapshot under a directory
//! - [`write_json_report`] stores the result
//! - [`write_merge_summary_csv`] flattens the merge histograms
//! - [`summarize_patterns`] condenses both into a Markdown digest
//!
//! ## Example
//!
//! ```rust
//! use linepunch_core::{GridAccessor, MergeRegion, Worksheet};
//! use linepunch_report::{analyze_sheet, AnalyzeOptions};
//!
//! let mut sheet = Worksheet::new("Budget");
//! sheet.set_merge_region(MergeRegion::new(1, 1, 1, 4).unwrap()).unwrap();
//!
//! let report = analyze_sheet("Budget", &sheet, &AnalyzeOptions::default());
//! assert_eq!(report.merge_blocks_summary.block_sizes["1x4"], 4);
//! ```

mod analyze;
mod error;
mod sample;
mod scan;
mod summary;

pub use analyze::{
    analyze_sheet, merge_blocks_summary, write_json_report, AnalysisReport, AnalyzeOptions,
    Analyzer, BorderSnapshot, CellEntry, CellReport, FileReport, FontSnapshot, MergeBlocksSummary,
    Reading, SheetReport, VALUE_PREVIEW_LEN,
};
pub use error::{ReportError, ReportResult};
pub use sample::sample_cells;
pub use scan::list_workbook_files;
pub use summary::{
    merge_summary_rows, read_block_counts, summarize_patterns, write_merge_summary_csv,
    MergeSummaryRow, FONT_SAMPLE_CAP,
};

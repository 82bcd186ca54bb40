//! Merge summary CSV and Markdown pattern digest

use std::fs;
use std::hash::Hash;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyze::AnalysisReport;
use crate::error::ReportResult;

/// Cells per sheet considered for border and font statistics
pub const FONT_SAMPLE_CAP: usize = 1000;

/// One row of the merge summary CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummaryRow {
    /// Base name of the analyzed file
    pub file: String,
    pub sheet: String,
    pub merge_block_size: String,
    pub count: usize,
    pub used_rows: u32,
    pub used_cols: u32,
}

/// Flatten the per-sheet merge histograms of `report`
pub fn merge_summary_rows(report: &AnalysisReport) -> Vec<MergeSummaryRow> {
    let mut rows = Vec::new();
    for file in &report.files {
        let base = Path::new(&file.file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        for sheet in &file.sheets {
            for (size, count) in &sheet.merge_blocks_summary.block_sizes {
                rows.push(MergeSummaryRow {
                    file: base.clone(),
                    sheet: sheet.name.clone(),
                    merge_block_size: size.clone(),
                    count: *count,
                    used_rows: sheet.used_rows,
                    used_cols: sheet.used_cols,
                });
            }
        }
    }
    rows
}

/// Write one CSV row per (file, sheet, block size), creating parent directories
pub fn write_merge_summary_csv<P: AsRef<Path>>(
    report: &AnalysisReport,
    path: P,
) -> ReportResult<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let rows = merge_summary_rows(report);
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        writer.write_record([
            "file",
            "sheet",
            "merge_block_size",
            "count",
            "used_rows",
            "used_cols",
        ])?;
    }
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "wrote merge summary");
    Ok(rows.len())
}

/// Read (size, count) pairs back from a merge summary CSV
///
/// Rows with missing or non-numeric fields are skipped.
pub fn read_block_counts<P: AsRef<Path>>(path: P) -> ReportResult<Vec<(String, usize)>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let mut counts = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else { continue };
        let size = record.get(2);
        let count = record.get(3).and_then(|c| c.trim().parse::<usize>().ok());
        if let (Some(size), Some(count)) = (size, count) {
            counts.push((size.to_string(), count));
        }
    }
    Ok(counts)
}

/// Occurrence counter that ranks ties by first appearance
struct Tally<K> {
    index: AHashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    fn new() -> Self {
        Self {
            index: AHashMap::new(),
            entries: Vec::new(),
        }
    }

    fn add(&mut self, key: K, count: usize) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn most_common(&self, n: usize) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

fn join_top<K>(tally: &Tally<K>, n: usize, render: impl Fn(&K, usize) -> String) -> String
where
    K: Eq + Hash + Clone,
{
    tally
        .most_common(n)
        .iter()
        .map(|(key, count)| render(key, *count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_size_key(key: &str) -> Option<(u32, u32)> {
    let (rows, cols) = key.split_once('x')?;
    Some((rows.trim().parse().ok()?, cols.trim().parse().ok()?))
}

/// Markdown digest of a merge summary CSV and, when present, a full analysis
/// report recorded with borders and fonts
pub fn summarize_patterns<P, Q>(csv_path: P, full_json_path: Q) -> ReportResult<String>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut sizes = Tally::new();
    let mut widths = Tally::new();
    let mut heights = Tally::new();
    for (size, count) in read_block_counts(csv_path)? {
        if let Some((rows, cols)) = parse_size_key(&size) {
            if rows == 1 && cols > 1 {
                widths.add(cols, count);
            }
            if cols == 1 && rows > 1 {
                heights.add(rows, count);
            }
        }
        sizes.add(size, count);
    }

    let full = if full_json_path.as_ref().exists() {
        AnalysisReport::load(full_json_path)?
    } else {
        AnalysisReport::default()
    };

    let mut weights = Tally::new();
    let mut font_sizes = Tally::new();
    let mut bold = 0usize;
    let mut fonts = 0usize;
    let sampled = full
        .files
        .iter()
        .flat_map(|file| &file.sheets)
        .flat_map(|sheet| sheet.cells.iter().take(FONT_SAMPLE_CAP))
        .filter_map(|cell| cell.report());
    for cell in sampled {
        for side in ["left", "top", "right", "bottom"] {
            let weight = cell
                .borders
                .get(side)
                .and_then(|reading| reading.value())
                .and_then(|border| border.weight);
            if let Some(weight) = weight.filter(|w| *w > 0) {
                weights.add(weight, 1);
            }
        }
        if let Some(font) = cell.font.as_ref().and_then(|reading| reading.value()) {
            if font.size > 0 {
                font_sizes.add(font.size, 1);
            }
            fonts += 1;
            if font.bold {
                bold += 1;
            }
        }
    }

    let top_sizes = join_top(&sizes, 6, |k, c| format!("{} ({})", k, c));
    let top_widths = join_top(&widths, 5, |w, c| format!("{} cols ({})", w, c));
    let top_heights = join_top(&heights, 5, |h, c| format!("{} rows ({})", h, c));
    let top_weights = join_top(&weights, 4, |w, c| format!("{} ({})", w, c));
    let top_fonts = join_top(&font_sizes, 4, |s, c| format!("{}pt ({})", s, c));
    let bold_ratio = if fonts > 0 {
        format!("{:.1}%", 100.0 * bold as f64 / fonts as f64)
    } else {
        "n/a".to_string()
    };

    let mut md = vec![
        "### Sample Analysis Summary (auto-generated)".to_string(),
        format!("- Top merge block sizes: {}", top_sizes),
        format!("- Common horizontal header widths: {}", top_widths),
        format!("- Common vertical category heights: {}", top_heights),
    ];
    if !weights.is_empty() {
        md.push(format!("- Observed border weights (sampled): {}", top_weights));
    }
    if !font_sizes.is_empty() {
        md.push(format!(
            "- Common font sizes (sampled): {}; bold presence: {}",
            top_fonts, bold_ratio
        ));
    }

    md.push(String::new());
    md.push("### Answers to Critical Questions (auto-generated)".to_string());
    md.push("1. What do actual merge patterns look like?".to_string());
    md.push(format!(
        "   - Frequent sizes: {}. Horizontal 1xN and vertical Nx1 dominate.",
        top_sizes
    ));
    md.push("2. How many columns typically get merged?".to_string());
    md.push(format!("   - Common widths: {}.", top_widths));
    md.push("3. Visual indicators separating categories?".to_string());
    let mut separators =
        "   - Vertical Nx1 blocks indicate category fields; section headers use wide 1xN."
            .to_string();
    if !weights.is_empty() {
        separators.push_str(" Borders show recurring weights around edges in sampled cells.");
    }
    md.push(separators);
    md.push("4. Consistent border/formatting patterns?".to_string());
    md.push(if weights.is_empty() && font_sizes.is_empty() {
        "   - Some consistency expected; recommend copying perimeter borders and top-left \
         font heuristically."
            .to_string()
    } else {
        "   - Yes: repeated border weights and font sizes across sheets; copy perimeter \
         borders and top-left font when inserting."
            .to_string()
    });

    let mut text = md.join("\n");
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tally_ranks_ties_by_first_seen() {
        let mut tally = Tally::new();
        tally.add("4x1", 2);
        tally.add("1x6", 3);
        tally.add("2x1", 3);
        tally.add("4x1", 1);

        assert_eq!(
            tally.most_common(2),
            vec![("4x1", 3), ("1x6", 3)]
        );
    }

    #[test]
    fn test_parse_size_key() {
        assert_eq!(parse_size_key("1x6"), Some((1, 6)));
        assert_eq!(parse_size_key("12x1"), Some((12, 1)));
        assert_eq!(parse_size_key("wide"), None);
        assert_eq!(parse_size_key("1xmany"), None);
    }

    #[test]
    fn test_block_counts_skip_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge_summary.csv");
        fs::write(
            &path,
            "file,sheet,merge_block_size,count,used_rows,used_cols\n\
             a.json,Budget,1x6,4,20,6\n\
             a.json,Budget,4x1\n\
             a.json,Budget,2x1,lots,20,6\n\
             b.json,Plan,2x1,2\n",
        )
        .unwrap();

        let counts = read_block_counts(&path).unwrap();
        assert_eq!(
            counts,
            vec![("1x6".to_string(), 4), ("2x1".to_string(), 2)]
        );
    }
}

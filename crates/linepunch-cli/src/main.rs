//! linepunch CLI - category-aware row insertion and merge pattern reports

mod config;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::PoisonError;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use linepunch_core::snapshot::{read_workbook, write_workbook};
use linepunch_core::{GridAccessor, Workbook, Worksheet};
use linepunch_engine::{
    Action, ActionDispatcher, DetectionOptions, InsertionOutcome, StructureDetector,
};
use linepunch_report::{
    summarize_patterns, write_json_report, write_merge_summary_csv, AnalysisReport, Analyzer,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "linepunch")]
#[command(
    author,
    version,
    about = "Insert rows into category-structured spreadsheets and report on merge patterns"
)]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file with [detection] and [analyze] settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample merges (and optionally borders and fonts) across a directory
    Analyze {
        /// Directory searched recursively for workbook snapshots
        #[arg(long)]
        dir: PathBuf,

        /// JSON report to write
        #[arg(long)]
        out: PathBuf,

        /// Cells inspected per sheet
        #[arg(long)]
        max_cells: Option<usize>,

        /// Record borders and fonts as well
        #[arg(long)]
        borders: bool,
    },

    /// Flatten an analysis report into a merge summary CSV
    MergeCsv {
        /// Analysis report
        #[arg(long = "in")]
        input: PathBuf,

        /// CSV file to write
        #[arg(long)]
        out: PathBuf,
    },

    /// Write a Markdown digest of a merge summary and a full report
    Summarize {
        /// Merge summary CSV
        #[arg(long)]
        csv: PathBuf,

        /// Analysis report recorded with --borders (skipped when missing)
        #[arg(long)]
        full: PathBuf,

        /// Markdown file to write
        #[arg(long)]
        out: PathBuf,
    },

    /// Add a row to the category at a cell
    AddRow(ActionArgs),

    /// Add a new category below a cell
    AddCategory(ActionArgs),

    /// Show how the detector reads a row
    Inspect {
        /// Workbook snapshot
        snapshot: PathBuf,

        /// Row to inspect (1-based)
        #[arg(long)]
        row: u32,

        /// Sheet index (0-based, default: the active sheet)
        #[arg(long)]
        sheet: Option<usize>,
    },
}

#[derive(Args)]
struct ActionArgs {
    /// Workbook snapshot, updated in place unless --out is given
    snapshot: PathBuf,

    /// Row of the active cell (1-based)
    #[arg(long)]
    row: u32,

    /// Column of the active cell (1-based)
    #[arg(long, default_value = "1")]
    col: u32,

    /// Sheet index (0-based, default: the active sheet)
    #[arg(long)]
    sheet: Option<usize>,

    /// Write the result here instead
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            dir,
            out,
            max_cells,
            borders,
        } => analyze(&config, &dir, &out, max_cells, borders),
        Commands::MergeCsv { input, out } => merge_csv(&input, &out),
        Commands::Summarize { csv, full, out } => summarize(&csv, &full, &out),
        Commands::AddRow(args) => run_action(&config.detection, Action::AddRowToCategory, &args),
        Commands::AddCategory(args) => run_action(&config.detection, Action::AddNewCategory, &args),
        Commands::Inspect {
            snapshot,
            row,
            sheet,
        } => inspect(&config.detection, &snapshot, row, sheet),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn analyze(
    config: &Config,
    dir: &Path,
    out: &Path,
    max_cells: Option<usize>,
    borders: bool,
) -> Result<()> {
    let mut options = config.analyze.clone();
    if let Some(max_cells) = max_cells {
        options = options.with_max_cells(max_cells);
    }
    if borders {
        options = options.with_borders(true);
    }

    let report = Analyzer::new(dir, options)
        .analyze()
        .with_context(|| format!("Failed to analyze '{}'", dir.display()))?;
    write_json_report(&report, out)
        .with_context(|| format!("Failed to write '{}'", out.display()))?;

    let failed = report.files.iter().filter(|f| f.error.is_some()).count();
    eprintln!(
        "Analyzed {} files ({} could not be opened), wrote '{}'",
        report.files.len(),
        failed,
        out.display()
    );
    Ok(())
}

fn merge_csv(input: &Path, out: &Path) -> Result<()> {
    let report = AnalysisReport::load(input)
        .with_context(|| format!("Failed to read report '{}'", input.display()))?;
    let rows = write_merge_summary_csv(&report, out)
        .with_context(|| format!("Failed to write '{}'", out.display()))?;
    eprintln!("Wrote {} rows to '{}'", rows, out.display());
    Ok(())
}

fn summarize(csv: &Path, full: &Path, out: &Path) -> Result<()> {
    let text = summarize_patterns(csv, full)
        .with_context(|| format!("Failed to summarize '{}'", csv.display()))?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    fs::write(out, text).with_context(|| format!("Failed to write '{}'", out.display()))?;
    eprintln!("Wrote summary to '{}'", out.display());
    Ok(())
}

fn open_sheet(snapshot: &Path, sheet: Option<usize>) -> Result<(Workbook, usize)> {
    let workbook = read_workbook(snapshot)
        .with_context(|| format!("Failed to open '{}'", snapshot.display()))?;
    let index = sheet.unwrap_or_else(|| workbook.active_sheet());
    Ok((workbook, index))
}

fn run_action(options: &DetectionOptions, action: Action, args: &ActionArgs) -> Result<()> {
    let (mut workbook, index) = open_sheet(&args.snapshot, args.sheet)?;
    let mut sheet: Worksheet = workbook
        .worksheet(index)
        .cloned()
        .with_context(|| format!("Sheet index {} not found", index))?;
    sheet
        .set_active_cell(args.row, args.col)
        .with_context(|| format!("Invalid active cell ({}, {})", args.row, args.col))?;
    debug!(%action, sheet = sheet.name(), row = args.row, col = args.col, "dispatching");

    let dispatcher = ActionDispatcher::new(sheet, options.clone());
    let outcome = dispatcher
        .dispatch(action)
        .context("Failed to start action")?
        .wait()
        .with_context(|| format!("{} failed", action))?;

    let grid = dispatcher.grid();
    let updated = grid.lock().unwrap_or_else(PoisonError::into_inner).clone();
    *workbook.sheet_mut(index)? = updated;

    let out = args.out.as_deref().unwrap_or(&args.snapshot);
    write_workbook(&workbook, out)
        .with_context(|| format!("Failed to write '{}'", out.display()))?;

    print_outcome(&outcome);
    eprintln!("Wrote '{}'", out.display());
    Ok(())
}

fn join_rows(rows: &[u32]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_outcome(outcome: &InsertionOutcome) {
    println!("Inserted rows: {}", join_rows(&outcome.inserted_rows));
    println!("Template rows: {}", join_rows(&outcome.template_rows));
    if let Some(selection) = outcome.selection {
        println!("Selection: {}", selection);
    }
    for region in &outcome.extended_merges {
        println!("Extended merge: {}", region);
    }
    for warning in &outcome.warnings {
        warn!("{}", warning);
    }
    if !outcome.warnings.is_empty() {
        eprintln!("{} properties could not be copied", outcome.warnings.len());
    }
}

fn inspect(
    options: &DetectionOptions,
    snapshot: &Path,
    row: u32,
    sheet: Option<usize>,
) -> Result<()> {
    let (workbook, index) = open_sheet(snapshot, sheet)?;
    let sheet = workbook
        .worksheet(index)
        .with_context(|| format!("Sheet index {} not found", index))?;
    let used_cols = sheet.used_column_count()?;
    let detector = StructureDetector::new(sheet, options);

    println!("Sheet \"{}\", row {}", sheet.name(), row);
    println!("  Used columns: {}", used_cols);

    let blocks = detector.horizontal_merges_on_row(row, options.header_scan_cols);
    if blocks.is_empty() {
        println!("  Horizontal merges: none");
    }
    for block in &blocks {
        println!("  Horizontal merge: {} ({} columns)", block.region(), block.width);
    }

    let verticals = detector.vertical_merges_touching_row(row, options.vertical_scan_cols);
    if verticals.is_empty() {
        println!("  Vertical merges: none");
    }
    for region in &verticals {
        let position = if region.bottom() == row { ", ends here" } else { "" };
        println!("  Vertical merge: {} ({} rows{})", region, region.rows, position);
    }

    println!("  Header-like: {}", detector.is_header_like(row, used_cols));
    println!("  Effective width: {}", detector.effective_max_cols(row));
    match detector.nearest_header_merge(row, options.header_scan_up, options.header_scan_cols) {
        Some(header) => println!("  Nearest header: {} (row {})", header.region(), header.row),
        None => println!("  Nearest header: none"),
    }
    match detector.nearest_data_row(row, used_cols) {
        Some(data_row) => println!("  Nearest data row: {}", data_row),
        None => println!("  Nearest data row: none"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_row() {
        let cli = Cli::try_parse_from([
            "linepunch", "-v", "add-row", "plan.json", "--row", "9", "--col", "3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::AddRow(args) => {
                assert_eq!(args.snapshot, PathBuf::from("plan.json"));
                assert_eq!((args.row, args.col), (9, 3));
                assert!(args.sheet.is_none());
            }
            _ => panic!("expected add-row"),
        }
    }

    #[test]
    fn test_merge_csv_uses_in_flag() {
        let cli = Cli::try_parse_from([
            "linepunch", "merge-csv", "--in", "reports/analysis.json", "--out", "m.csv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::MergeCsv { .. }));
    }

    #[test]
    fn test_row_is_required() {
        assert!(Cli::try_parse_from(["linepunch", "add-category", "plan.json"]).is_err());
    }

    #[test]
    fn test_join_rows() {
        assert_eq!(join_rows(&[11, 12]), "11, 12");
        assert_eq!(join_rows(&[]), "");
    }
}

//! Run the `linepunch` binary against snapshot files

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use linepunch_core::snapshot::{read_workbook, write_workbook};
use linepunch_core::{
    BorderEdge, BorderSide, GridAccessor, MergeRegion, Style, Workbook, Worksheet,
};
use pretty_assertions::assert_eq;

fn linepunch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linepunch"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run linepunch")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn budget_workbook(path: &Path) {
    let mut sheet = Worksheet::new("Budget");
    sheet.set_cell_value(5, 1, "Operating costs").unwrap();
    sheet
        .set_row_style(5, 1, 6, &Style::new().bold(true))
        .unwrap();
    sheet
        .set_merge_region(MergeRegion::new(5, 1, 1, 6).unwrap())
        .unwrap();
    let data = Style::new().with_border(BorderSide::Left, BorderEdge::thin());
    for row in 6..=9 {
        sheet.set_row_style(row, 1, 6, &data).unwrap();
        sheet.set_cell_value(row, 2, format!("item {}", row)).unwrap();
    }
    sheet
        .set_merge_region(MergeRegion::new(6, 1, 4, 1).unwrap())
        .unwrap();

    let mut workbook = Workbook::empty();
    workbook.add_existing_worksheet(sheet).unwrap();
    write_workbook(&workbook, path).unwrap();
}

#[test]
fn test_add_row_updates_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.json");
    budget_workbook(&path);

    let output = linepunch(&["add-row", path.to_str().unwrap(), "--row", "9", "--col", "2"]);
    assert!(output.status.success(), "{:?}", output);
    let text = stdout(&output);
    assert!(text.contains("Inserted rows: 10"));
    assert!(text.contains("Selection: B10"));

    let workbook = read_workbook(&path).unwrap();
    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(
        sheet.merge_area(10, 1).unwrap(),
        MergeRegion::new(6, 1, 5, 1).unwrap()
    );
    assert_eq!(sheet.border(10, 3, BorderSide::Left).unwrap(), BorderEdge::thin());
    assert_eq!(sheet.selection().map(|p| (p.row, p.col)), Some((10, 2)));
}

#[test]
fn test_add_category_writes_to_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.json");
    let out = dir.path().join("next.json");
    budget_workbook(&path);
    let before = fs::read_to_string(&path).unwrap();

    let output = linepunch(&[
        "add-category",
        path.to_str().unwrap(),
        "--row",
        "9",
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("Inserted rows: 10, 11"));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    let workbook = read_workbook(&out).unwrap();
    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(
        sheet.merge_area(10, 4).unwrap(),
        MergeRegion::new(10, 1, 1, 6).unwrap()
    );
}

#[test]
fn test_inspect_prints_structure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.json");
    budget_workbook(&path);

    let output = linepunch(&["inspect", path.to_str().unwrap(), "--row", "9"]);
    assert!(output.status.success(), "{:?}", output);
    let text = stdout(&output);
    assert!(text.contains("Vertical merge: A6:A9 (4 rows, ends here)"));
    assert!(text.contains("Nearest header: A5:F5 (row 5)"));
    assert!(text.contains("Effective width: 6"));
}

#[test]
fn test_bad_sheet_index_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.json");
    budget_workbook(&path);

    let output = linepunch(&["add-row", path.to_str().unwrap(), "--row", "9", "--sheet", "4"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Sheet index 4 not found"));
}

#[test]
fn test_report_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    budget_workbook(&data.join("budget.json"));
    let reports = dir.path().join("reports");
    let analysis = reports.join("analysis.json");
    let csv = reports.join("merge_summary.csv");
    let md = reports.join("patterns_summary.md");

    let output = linepunch(&[
        "analyze",
        "--dir",
        data.to_str().unwrap(),
        "--out",
        analysis.to_str().unwrap(),
        "--borders",
    ]);
    assert!(output.status.success(), "{:?}", output);

    let output = linepunch(&[
        "merge-csv",
        "--in",
        analysis.to_str().unwrap(),
        "--out",
        csv.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{:?}", output);
    assert!(fs::read_to_string(&csv)
        .unwrap()
        .contains("budget.json,Budget,4x1,4,9,6"));

    let output = linepunch(&[
        "summarize",
        "--csv",
        csv.to_str().unwrap(),
        "--full",
        analysis.to_str().unwrap(),
        "--out",
        md.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{:?}", output);
    let summary = fs::read_to_string(&md).unwrap();
    assert!(summary.contains("- Common vertical category heights: 4 rows (4)"));
}

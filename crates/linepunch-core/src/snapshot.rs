//! JSON snapshots of workbooks
//!
//! A snapshot is the on-disk form of a [`Workbook`]: every stored cell with
//! its value and resolved style, the merge table, the active cell, and the
//! application settings of each sheet.
//!
//! ```json
//! {
//!   "active_sheet": 0,
//!   "sheets": [{
//!     "name": "Budget",
//!     "cells": [{ "row": 1, "col": 1, "value": "Category" }],
//!     "merges": [{ "top": 1, "left": 1, "rows": 1, "cols": 6 }],
//!     "active_cell": { "row": 4, "col": 2 }
//!   }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::accessor::{AppSettings, GridAccessor};
use crate::cell::{CellPosition, CellValue, MergeRegion};
use crate::error::Result;
use crate::style::Style;
use crate::workbook::Workbook;
use crate::worksheet::Worksheet;

/// Serializable form of a [`Workbook`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookSnapshot {
    /// Index of the active sheet
    #[serde(default)]
    pub active_sheet: usize,
    /// Sheets in order
    pub sheets: Vec<SheetSnapshot>,
}

/// Serializable form of a [`Worksheet`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSnapshot {
    pub name: String,
    #[serde(default)]
    pub cells: Vec<CellSnapshot>,
    #[serde(default)]
    pub merges: Vec<MergeRegion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_cell: Option<CellPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AppSettings>,
}

/// One stored cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub row: u32,
    pub col: u32,
    #[serde(default, skip_serializing_if = "CellValue::is_empty")]
    pub value: CellValue,
    /// Omitted when the cell has the default style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl From<&Worksheet> for SheetSnapshot {
    fn from(sheet: &Worksheet) -> Self {
        let default_style = Style::default();
        let cells = sheet
            .iter_cells()
            .map(|(row, col, data)| {
                let style = sheet.cell_style(row, col);
                CellSnapshot {
                    row,
                    col,
                    value: data.value.clone(),
                    style: (*style != default_style).then(|| style.clone()),
                }
            })
            .collect();
        let settings = *sheet.settings();

        Self {
            name: sheet.name().to_string(),
            cells,
            merges: sheet.merged_regions().to_vec(),
            active_cell: sheet.selection(),
            settings: (settings != AppSettings::default()).then_some(settings),
        }
    }
}

impl TryFrom<SheetSnapshot> for Worksheet {
    type Error = crate::error::Error;

    fn try_from(snapshot: SheetSnapshot) -> Result<Self> {
        let mut sheet = Worksheet::new(snapshot.name);
        for cell in snapshot.cells {
            if let Some(style) = &cell.style {
                sheet.set_cell_style(cell.row, cell.col, style)?;
            }
            sheet.set_cell_value(cell.row, cell.col, cell.value)?;
        }
        for region in snapshot.merges {
            sheet.set_merge_region(region)?;
        }
        if let Some(pos) = snapshot.active_cell {
            sheet.set_active_cell(pos.row, pos.col)?;
        }
        if let Some(settings) = snapshot.settings {
            sheet.set_app_settings(&settings)?;
        }
        Ok(sheet)
    }
}

impl From<&Workbook> for WorkbookSnapshot {
    fn from(workbook: &Workbook) -> Self {
        Self {
            active_sheet: workbook.active_sheet(),
            sheets: workbook.worksheets().map(SheetSnapshot::from).collect(),
        }
    }
}

impl TryFrom<WorkbookSnapshot> for Workbook {
    type Error = crate::error::Error;

    fn try_from(snapshot: WorkbookSnapshot) -> Result<Self> {
        let mut workbook = Workbook::empty();
        for sheet in snapshot.sheets {
            workbook.add_existing_worksheet(Worksheet::try_from(sheet)?)?;
        }
        if !workbook.is_empty() {
            workbook.set_active_sheet(snapshot.active_sheet)?;
        }
        Ok(workbook)
    }
}

impl WorkbookSnapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read a workbook from a snapshot file
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let text = fs::read_to_string(path)?;
    Workbook::try_from(WorkbookSnapshot::from_json(&text)?)
}

/// Write a workbook to a snapshot file
pub fn write_workbook<P: AsRef<Path>>(workbook: &Workbook, path: P) -> Result<()> {
    let text = WorkbookSnapshot::from(workbook).to_json()?;
    fs::write(path, text)?;
    Ok(())
}

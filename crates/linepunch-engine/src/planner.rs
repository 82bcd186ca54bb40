//! Row insertion planning
//!
//! The two end-to-end operations: add a row inside a category, and add a
//! new category (a header row plus its first data row). Each is a fixed
//! sequence of insert, analyze, propagate, reconcile and select steps.
//!
//! Nothing is rolled back. Once a row is physically inserted the operation
//! runs to completion, and property-level failures end up in
//! [`InsertionOutcome::warnings`].

use linepunch_core::{CellPosition, GridAccessor, MergeRegion};
use tracing::{debug, info};

use crate::detect::StructureDetector;
use crate::error::{Error, Result};
use crate::options::DetectionOptions;
use crate::propagate::{restore_selection, FormatPropagator, MergePolicy, PropagationWarning};

/// What an insertion did to the grid
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertionOutcome {
    /// Rows inserted, in the order they were inserted
    pub inserted_rows: Vec<u32>,
    /// The selection after the operation, if it was moved
    pub selection: Option<CellPosition>,
    /// Reference row used for each inserted row
    pub template_rows: Vec<u32>,
    /// Vertical merges grown to cover the new row
    pub extended_merges: Vec<MergeRegion>,
    /// Property copies that failed
    pub warnings: Vec<PropagationWarning>,
}

fn check_row<G: GridAccessor + ?Sized>(grid: &G, row: u32) -> Result<()> {
    if grid.row_exists(row) && grid.row_exists(row.saturating_add(1)) {
        Ok(())
    } else {
        Err(Error::InvalidRow(row))
    }
}

/// Column to restore the selection to (1 when the grid cannot say)
fn active_column<G: GridAccessor + ?Sized>(grid: &G) -> u32 {
    grid.active_cell().map(|pos| pos.col).unwrap_or(1)
}

fn insert_below<G: GridAccessor + ?Sized>(grid: &mut G, after: u32) -> Result<()> {
    grid.insert_row(after)
        .map_err(|source| Error::InsertFailed { after, source })
}

/// Insert a row below `active_row` that continues its category
///
/// When `active_row` closes a vertical category block, style is copied from
/// the row above it, since a closing row often carries a heavier bottom edge.
/// Vertical merges touching `active_row` are grown to cover the new row.
pub fn add_row_to_category<G: GridAccessor + ?Sized>(
    grid: &mut G,
    active_row: u32,
    options: &DetectionOptions,
) -> Result<InsertionOutcome> {
    check_row(grid, active_row)?;

    let verticals = StructureDetector::new(&*grid, options)
        .vertical_merges_touching_row(active_row, options.vertical_scan_cols);
    let is_bottom = verticals.iter().any(|r| r.bottom() == active_row);
    let active_col = active_column(grid);

    insert_below(grid, active_row)?;
    let target = active_row + 1;

    let used_cols = StructureDetector::new(&*grid, options).effective_max_cols(active_row);
    let reference = if is_bottom {
        active_row.saturating_sub(1).max(1)
    } else {
        active_row
    };
    debug!(active_row, is_bottom, reference, used_cols, "adding row to category");

    let mut propagator = FormatPropagator::new(&mut *grid);
    propagator.propagate_row(reference, target, used_cols, MergePolicy::Replicate);
    let extended_merges = if verticals.is_empty() {
        Vec::new()
    } else {
        propagator.extend_vertical_merges(&verticals)
    };
    let mut warnings = propagator.into_warnings();

    let selection = restore_selection(grid, target, active_col, &mut warnings)
        .then_some(CellPosition {
            row: target,
            col: active_col,
        });

    info!(row = target, reference, warnings = warnings.len(), "row added to category");
    Ok(InsertionOutcome {
        inserted_rows: vec![target],
        selection,
        template_rows: vec![reference],
        extended_merges,
        warnings,
    })
}

/// Insert a new category below `active_row`
///
/// With a section header in the scan window, the header row is replicated
/// (merges included) and, when a data row can be found, a data row styled
/// after it is inserted below the new header. Without a header, the active
/// row itself is the template and merges are not replicated.
pub fn add_new_category<G: GridAccessor + ?Sized>(
    grid: &mut G,
    active_row: u32,
    options: &DetectionOptions,
) -> Result<InsertionOutcome> {
    check_row(grid, active_row)?;

    let active_col = active_column(grid);
    insert_below(grid, active_row)?;
    let header_row = active_row + 1;

    let detector = StructureDetector::new(&*grid, options);
    let used_cols = detector.effective_max_cols(active_row);
    let header = detector.nearest_header_merge(
        active_row,
        options.header_scan_up,
        options.header_scan_cols,
    );

    let mut outcome = InsertionOutcome {
        inserted_rows: vec![header_row],
        ..Default::default()
    };

    let Some(header) = header else {
        debug!(active_row, used_cols, "no header in scan window, copying active row");
        let mut propagator = FormatPropagator::new(&mut *grid);
        propagator.propagate_row(active_row, header_row, used_cols, MergePolicy::Skip);
        outcome.warnings = propagator.into_warnings();
        outcome.template_rows.push(active_row);
        outcome.selection = restore_selection(grid, header_row, active_col, &mut outcome.warnings)
            .then_some(CellPosition {
                row: header_row,
                col: active_col,
            });
        info!(row = header_row, "category added without header");
        return Ok(outcome);
    };

    debug!(active_row, header_row = header.row, used_cols, "adding category from header");
    let mut propagator = FormatPropagator::new(&mut *grid);
    propagator.propagate_row(header.row, header_row, used_cols, MergePolicy::Replicate);
    outcome.warnings = propagator.into_warnings();
    outcome.template_rows.push(header.row);

    let data_row = StructureDetector::new(&*grid, options).nearest_data_row(active_row, used_cols);
    let Some(mut data_row) = data_row else {
        info!(row = header_row, "category header added, no data row template");
        return Ok(outcome);
    };

    insert_below(grid, header_row)?;
    let first_data_row = header_row + 1;
    // A template found below the new header moved down with the insertion
    if data_row > header_row {
        data_row += 1;
    }

    let mut propagator = FormatPropagator::new(&mut *grid);
    propagator.propagate_row(data_row, first_data_row, used_cols, MergePolicy::Replicate);
    outcome.warnings.extend(propagator.into_warnings());
    outcome.inserted_rows.push(first_data_row);
    outcome.template_rows.push(data_row);
    outcome.selection = restore_selection(grid, first_data_row, active_col, &mut outcome.warnings)
        .then_some(CellPosition {
            row: first_data_row,
            col: active_col,
        });

    info!(
        header_row,
        data_row = first_data_row,
        warnings = outcome.warnings.len(),
        "category added"
    );
    Ok(outcome)
}

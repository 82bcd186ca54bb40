//! Background dispatch of row insertion actions

mod common;

use std::sync::PoisonError;
use std::time::Duration;

use common::{category_sheet, Faults, FaultyGrid};
use linepunch_core::{AppSettings, CalculationMode, CellPosition, GridAccessor};
use linepunch_engine::{run_action, Action, ActionDispatcher, DetectionOptions, Error};
use pretty_assertions::assert_eq;

#[test]
fn test_dispatch_reports_outcome() {
    let mut sheet = category_sheet();
    sheet.set_active_cell(7, 4).unwrap();
    let dispatcher = ActionDispatcher::new(sheet, DetectionOptions::default());

    let handle = dispatcher.dispatch(Action::AddRowToCategory).unwrap();
    assert_eq!(handle.action(), Action::AddRowToCategory);
    let outcome = handle.wait().unwrap();

    assert_eq!(outcome.inserted_rows, vec![8]);
    assert_eq!(outcome.selection, Some(CellPosition { row: 8, col: 4 }));
    assert!(!dispatcher.is_busy());

    let grid = dispatcher.grid();
    let sheet = grid.lock().unwrap();
    assert_eq!(sheet.cell_text(9, 2).unwrap(), "item 8");
}

#[test]
fn test_second_dispatch_is_busy() {
    let mut sheet = category_sheet();
    sheet.set_active_cell(9, 1).unwrap();
    let dispatcher = ActionDispatcher::new(sheet, DetectionOptions::default());

    // Hold the grid so the first action cannot finish
    let grid = dispatcher.grid();
    let held = grid.lock().unwrap();

    let first = dispatcher.dispatch(Action::AddRowToCategory).unwrap();
    assert!(dispatcher.is_busy());
    assert!(matches!(
        dispatcher.dispatch(Action::AddNewCategory),
        Err(Error::Busy)
    ));
    assert!(first.try_result().is_none());

    drop(held);
    assert!(first.wait().is_ok());

    let second = dispatcher.dispatch(Action::AddRowToCategory).unwrap();
    assert_eq!(second.wait().unwrap().inserted_rows, vec![11]);
}

#[test]
fn test_missing_active_cell_comes_back_through_handle() {
    let dispatcher = ActionDispatcher::new(category_sheet(), DetectionOptions::default());

    let handle = dispatcher.dispatch(Action::AddNewCategory).unwrap();
    let result = handle
        .wait_timeout(Duration::from_secs(10))
        .expect("action finished");

    assert!(matches!(result, Err(Error::NoActiveCell(_))));
    assert!(!dispatcher.is_busy());
}

#[test]
fn test_panic_is_reported_and_settings_restored() {
    let mut sheet = category_sheet();
    sheet.set_active_cell(8, 2).unwrap();
    let faults = Faults {
        panic_on_insert: true,
        ..Faults::default()
    };
    let dispatcher = ActionDispatcher::new(FaultyGrid::new(sheet, faults), DetectionOptions::default());

    let result = dispatcher.dispatch(Action::AddRowToCategory).unwrap().wait();

    match result {
        Err(Error::ActionPanicked(message)) => assert!(message.contains("insert_row exploded")),
        other => panic!("expected a panic report, got {:?}", other),
    }
    assert!(!dispatcher.is_busy());

    let grid = dispatcher.grid();
    let grid = grid.lock().unwrap_or_else(PoisonError::into_inner);
    assert_eq!(grid.app_settings().unwrap(), AppSettings::default());
}

#[test]
fn test_run_action_restores_settings_after_error() {
    let mut sheet = category_sheet();
    sheet.set_active_cell(8, 2).unwrap();
    let manual = AppSettings {
        calculation: CalculationMode::Manual,
        ..AppSettings::default()
    };
    sheet.set_app_settings(&manual).unwrap();
    let faults = Faults {
        inserts_allowed: Some(0),
        ..Faults::default()
    };
    let mut grid = FaultyGrid::new(sheet, faults);

    let result = run_action(&mut grid, Action::AddRowToCategory, &DetectionOptions::default());

    assert!(matches!(result, Err(Error::InsertFailed { .. })));
    assert_eq!(grid.app_settings().unwrap(), manual);
}

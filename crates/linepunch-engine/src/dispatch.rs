//! Trigger surface
//!
//! User-invocable actions resolved against the active cell, and a dispatcher
//! that runs them off the caller's thread. One action runs at a time; every
//! outcome, including errors and panics, comes back through an
//! [`ActionHandle`].

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use linepunch_core::GridAccessor;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::options::DetectionOptions;
use crate::performance::PerformanceMode;
use crate::planner::{add_new_category, add_row_to_category, InsertionOutcome};

/// A row-insertion action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    /// Add a row inside the category at the active cell
    AddRowToCategory,
    /// Add a new category below the active cell
    AddNewCategory,
}

impl Action {
    /// Short name used in logs and thread names
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddRowToCategory => "add-row",
            Action::AddNewCategory => "add-category",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run `action` at the grid's active cell, in performance mode
pub fn run_action<G: GridAccessor + ?Sized>(
    grid: &mut G,
    action: Action,
    options: &DetectionOptions,
) -> Result<InsertionOutcome> {
    let active = grid
        .active_cell()
        .map_err(|err| Error::NoActiveCell(err.to_string()))?;
    debug!(%action, row = active.row, col = active.col, "running action");

    let mut fast = PerformanceMode::enter(grid);
    match action {
        Action::AddRowToCategory => add_row_to_category(&mut *fast, active.row, options),
        Action::AddNewCategory => add_new_category(&mut *fast, active.row, options),
    }
}

/// Clears the busy flag however the worker exits
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs actions against a shared grid on a background thread
pub struct ActionDispatcher<G> {
    grid: Arc<Mutex<G>>,
    busy: Arc<AtomicBool>,
    options: DetectionOptions,
}

impl<G: GridAccessor + Send + 'static> ActionDispatcher<G> {
    /// Take ownership of `grid`
    pub fn new(grid: G, options: DetectionOptions) -> Self {
        Self::from_shared(Arc::new(Mutex::new(grid)), options)
    }

    /// Share a grid the caller keeps a handle to
    pub fn from_shared(grid: Arc<Mutex<G>>, options: DetectionOptions) -> Self {
        Self {
            grid,
            busy: Arc::new(AtomicBool::new(false)),
            options,
        }
    }

    /// The shared grid
    pub fn grid(&self) -> Arc<Mutex<G>> {
        Arc::clone(&self.grid)
    }

    /// Whether an action is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start `action` on a background thread
    ///
    /// Fails with [`Error::Busy`] while a previous action is still running.
    pub fn dispatch(&self, action: Action) -> Result<ActionHandle> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Busy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let (tx, rx) = mpsc::channel();
        let grid = Arc::clone(&self.grid);
        let options = self.options.clone();

        thread::Builder::new()
            .name(format!("linepunch-{}", action.name()))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    let mut grid = grid.lock().unwrap_or_else(PoisonError::into_inner);
                    run_action(&mut *grid, action, &options)
                }))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    error!(%action, %message, "action panicked");
                    Err(Error::ActionPanicked(message))
                });

                drop(guard);
                // The caller may have dropped its handle
                let _ = tx.send(result);
            })
            .map_err(Error::Spawn)?;

        Ok(ActionHandle { action, rx })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Receiving end for one dispatched action
pub struct ActionHandle {
    action: Action,
    rx: mpsc::Receiver<Result<InsertionOutcome>>,
}

impl ActionHandle {
    /// The action this handle tracks
    pub fn action(&self) -> Action {
        self.action
    }

    /// Block until the action finishes
    pub fn wait(self) -> Result<InsertionOutcome> {
        self.rx.recv().unwrap_or_else(|_| Err(worker_lost()))
    }

    /// Block for at most `timeout`
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<InsertionOutcome>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(worker_lost())),
        }
    }

    /// The result, if the action has finished
    ///
    /// A result is delivered once; later calls report a lost worker.
    pub fn try_result(&self) -> Option<Result<InsertionOutcome>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_lost())),
        }
    }
}

fn worker_lost() -> Error {
    Error::ActionPanicked("worker exited without reporting a result".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linepunch_core::Worksheet;

    #[test]
    fn test_action_names() {
        assert_eq!(Action::AddRowToCategory.to_string(), "add-row");
        assert_eq!(Action::AddNewCategory.name(), "add-category");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_run_action_needs_active_cell() {
        let mut sheet = Worksheet::new("Plan");
        let result = run_action(&mut sheet, Action::AddNewCategory, &DetectionOptions::default());
        assert!(matches!(result, Err(Error::NoActiveCell(_))));
        assert!(sheet.is_empty());
    }
}

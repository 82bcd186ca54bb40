//! # linepunch-engine
//!
//! Structure detection and format propagation for spreadsheets laid out as
//! categories: vertically merged label blocks under horizontally merged
//! section headers.
//!
//! - [`StructureDetector`] infers header rows, data rows, vertical category
//!   blocks and the effective table width from merge geometry
//! - [`FormatPropagator`] copies style, merges and borders between rows
//! - [`add_row_to_category`] and [`add_new_category`] combine the two
//! - [`ActionDispatcher`] runs those operations off the caller's thread
//!
//! ## Example
//!
//! ```rust
//! use linepunch_core::{GridAccessor, MergeRegion, Worksheet};
//! use linepunch_engine::{add_row_to_category, DetectionOptions};
//!
//! let mut sheet = Worksheet::new("Budget");
//! sheet.set_merge_region(MergeRegion::new(5, 1, 1, 6).unwrap()).unwrap();
//! sheet.set_merge_region(MergeRegion::new(6, 1, 4, 1).unwrap()).unwrap();
//!
//! let outcome = add_row_to_category(&mut sheet, 9, &DetectionOptions::default()).unwrap();
//! assert_eq!(outcome.inserted_rows, vec![10]);
//! assert_eq!(sheet.merge_area(10, 1).unwrap().top, 6);
//! ```

pub mod detect;
pub mod dispatch;
pub mod error;
pub mod options;
pub mod performance;
pub mod planner;
pub mod propagate;

pub use detect::{HorizontalMergeBlock, StructureDetector};
pub use dispatch::{run_action, Action, ActionDispatcher, ActionHandle};
pub use error::{Error, Result};
pub use options::DetectionOptions;
pub use performance::PerformanceMode;
pub use planner::{add_new_category, add_row_to_category, InsertionOutcome};
pub use propagate::{FormatPropagator, MergePolicy, PropagationWarning, StyleProperty};

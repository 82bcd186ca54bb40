//! Format propagation
//!
//! Copies style attributes, horizontal merges and borders from a reference
//! row onto a target row, then reconciles the target's top and bottom edges
//! with its neighbours.
//!
//! Every property copy is independent and best-effort. A failed read or
//! write is logged, recorded as a [`PropagationWarning`], and the remaining
//! properties are still copied.

use std::fmt;

use linepunch_core::{BorderEdge, BorderSide, GridAccessor, MergeRegion};
use tracing::warn;

/// The property a failed copy was working on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StyleProperty {
    NumberFormat,
    Alignment,
    Font,
    Fill,
    Border(BorderSide),
    Merge,
    Selection,
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleProperty::NumberFormat => write!(f, "number format"),
            StyleProperty::Alignment => write!(f, "alignment"),
            StyleProperty::Font => write!(f, "font"),
            StyleProperty::Fill => write!(f, "fill"),
            StyleProperty::Border(side) => write!(f, "{} border", side.name()),
            StyleProperty::Merge => write!(f, "merge"),
            StyleProperty::Selection => write!(f, "selection"),
        }
    }
}

/// A property that could not be copied
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropagationWarning {
    /// Target row
    pub row: u32,
    /// Target column (the left edge for a merged span)
    pub col: u32,
    pub property: StyleProperty,
    pub message: String,
}

impl fmt::Display for PropagationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}, column {}: {} not copied: {}",
            self.row, self.col, self.property, self.message
        )
    }
}

/// Which steps of a full propagation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Replicate the reference row's horizontal merges
    Replicate,
    /// Copy style and borders only
    Skip,
}

/// Copies formatting between rows of a grid
pub struct FormatPropagator<'g, G: GridAccessor + ?Sized> {
    grid: &'g mut G,
    warnings: Vec<PropagationWarning>,
}

impl<'g, G: GridAccessor + ?Sized> FormatPropagator<'g, G> {
    /// Create a propagator writing to `grid`
    pub fn new(grid: &'g mut G) -> Self {
        Self {
            grid,
            warnings: Vec::new(),
        }
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> &[PropagationWarning] {
        &self.warnings
    }

    /// Consume the propagator, returning its warnings
    pub fn into_warnings(self) -> Vec<PropagationWarning> {
        self.warnings
    }

    /// Run one fallible grid step, recording a warning on failure
    fn attempt<T, F>(&mut self, row: u32, col: u32, property: StyleProperty, step: F) -> Option<T>
    where
        F: FnOnce(&mut G) -> linepunch_core::Result<T>,
    {
        match step(&mut *self.grid) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(row, col, %property, error = %err, "property not copied");
                self.warnings.push(PropagationWarning {
                    row,
                    col,
                    property,
                    message: err.to_string(),
                });
                None
            }
        }
    }

    /// Full propagation from `reference` to `target` over columns `1..=max_cols`
    ///
    /// Clears the target's borders, copies scalar style, optionally
    /// replicates horizontal merges, copies borders, and finally reconciles
    /// seams with the rows above and below. Returns the merges created.
    pub fn propagate_row(
        &mut self,
        reference: u32,
        target: u32,
        max_cols: u32,
        merges: MergePolicy,
    ) -> Vec<MergeRegion> {
        if max_cols == 0 {
            return Vec::new();
        }

        self.clear_row_borders(target, max_cols);
        self.copy_row_style(reference, target, max_cols);
        let created = match merges {
            MergePolicy::Replicate => self.replicate_horizontal_merges(reference, target, max_cols),
            MergePolicy::Skip => Vec::new(),
        };
        self.replicate_borders(reference, target, max_cols);
        self.reconcile_seams(target, 1, max_cols);
        created
    }

    /// Set every border side of `row` to "no line" over columns `1..=max_cols`
    pub fn clear_row_borders(&mut self, row: u32, max_cols: u32) {
        let cleared = BorderEdge::cleared();
        for col in 1..=max_cols {
            for side in BorderSide::ALL {
                self.attempt(row, col, StyleProperty::Border(side), |g| {
                    g.set_border(row, col, side, &cleared)
                });
            }
        }
    }

    /// Copy number format, alignment, font and fill cell by cell
    pub fn copy_row_style(&mut self, reference: u32, target: u32, max_cols: u32) {
        for col in 1..=max_cols {
            self.attempt(target, col, StyleProperty::NumberFormat, |g| {
                let format = g.number_format(reference, col)?;
                g.set_number_format(target, col, &format)
            });
            self.attempt(target, col, StyleProperty::Alignment, |g| {
                let alignment = g.alignment(reference, col)?;
                g.set_alignment(target, col, &alignment)
            });
            self.attempt(target, col, StyleProperty::Font, |g| {
                let font = g.font(reference, col)?;
                g.set_font(target, col, &font)
            });
            self.attempt(target, col, StyleProperty::Fill, |g| {
                let fill = g.fill(reference, col)?;
                g.set_fill(target, col, &fill)
            });
        }
    }

    /// Recreate each horizontal merge of `reference` at the same columns on `target`
    ///
    /// A merge crossing `max_cols` is cut at that column; one cut down to a
    /// single cell is not created.
    pub fn replicate_horizontal_merges(
        &mut self,
        reference: u32,
        target: u32,
        max_cols: u32,
    ) -> Vec<MergeRegion> {
        let mut created = Vec::new();
        let mut col = 1;
        while col <= max_cols {
            let area = self.attempt(target, col, StyleProperty::Merge, |g| {
                g.merge_area(reference, col)
            });
            match area {
                Some(area) if area.is_horizontal() && area.top == reference => {
                    let region = clamp_cols(area.on_row(target), max_cols);
                    if region.is_horizontal()
                        && self
                            .attempt(target, area.left, StyleProperty::Merge, |g| {
                                g.set_merge_region(region)
                            })
                            .is_some()
                    {
                        created.push(region);
                    }
                    col = area.right() + 1;
                }
                _ => col += 1,
            }
        }
        created
    }

    /// Copy border edges from `reference` to `target`
    ///
    /// A horizontal merge on the reference row is copied as one range, using
    /// its outer edges, so no interior seams appear on the target. Nothing is
    /// written past `max_cols`.
    pub fn replicate_borders(&mut self, reference: u32, target: u32, max_cols: u32) {
        let mut col = 1;
        while col <= max_cols {
            let span = self
                .grid
                .merge_area(reference, col)
                .ok()
                .filter(|area| area.is_horizontal() && area.top == reference);

            match span {
                Some(source) => {
                    let destination = clamp_cols(source.on_row(target), max_cols);
                    for side in BorderSide::ALL {
                        self.attempt(target, source.left, StyleProperty::Border(side), |g| {
                            let edge = g.range_border(&source, side)?;
                            g.set_range_border(&destination, side, &edge)
                        });
                    }
                    col = source.right() + 1;
                }
                None => {
                    for side in BorderSide::ALL {
                        self.attempt(target, col, StyleProperty::Border(side), |g| {
                            let edge = g.border(reference, col, side)?;
                            g.set_border(target, col, side, &edge)
                        });
                    }
                    col += 1;
                }
            }
        }
    }

    /// Match the top and bottom edges of `target` to its neighbours
    ///
    /// Top takes the bottom edge of the row above; bottom takes the top edge
    /// of the row below. Runs after the border copy so neighbour continuity
    /// wins.
    pub fn reconcile_seams(&mut self, target: u32, left_col: u32, right_col: u32) {
        let has_below = self.grid.row_exists(target.saturating_add(1));
        for col in left_col..=right_col {
            if target > 1 {
                self.attempt(target, col, StyleProperty::Border(BorderSide::Top), |g| {
                    let edge = g.border(target - 1, col, BorderSide::Bottom)?;
                    g.set_border(target, col, BorderSide::Top, &edge)
                });
            }
            if has_below {
                self.attempt(target, col, StyleProperty::Border(BorderSide::Bottom), |g| {
                    let edge = g.border(target + 1, col, BorderSide::Top)?;
                    g.set_border(target, col, BorderSide::Bottom, &edge)
                });
            }
        }
    }

    /// Grow each region by one row at its bottom edge
    ///
    /// Returns the regions as they now stand. A region the grid already
    /// extended during row insertion is rewritten unchanged.
    pub fn extend_vertical_merges(&mut self, regions: &[MergeRegion]) -> Vec<MergeRegion> {
        let mut extended = Vec::new();
        for region in regions {
            let grown = MergeRegion {
                rows: region.rows + 1,
                ..*region
            };
            if self
                .attempt(grown.bottom(), grown.left, StyleProperty::Merge, |g| {
                    g.set_merge_region(grown)
                })
                .is_some()
            {
                extended.push(grown);
            }
        }
        extended
    }
}

/// Cut `region` so it ends at or before `max_cols`
fn clamp_cols(region: MergeRegion, max_cols: u32) -> MergeRegion {
    MergeRegion {
        cols: region.cols.min(max_cols.saturating_sub(region.left) + 1),
        ..region
    }
}

/// Move the selection, recording a warning when the grid refuses
pub(crate) fn restore_selection<G: GridAccessor + ?Sized>(
    grid: &mut G,
    row: u32,
    col: u32,
    warnings: &mut Vec<PropagationWarning>,
) -> bool {
    match grid.select(row, col) {
        Ok(()) => true,
        Err(err) => {
            warn!(row, col, error = %err, "selection not restored");
            warnings.push(PropagationWarning {
                row,
                col,
                property: StyleProperty::Selection,
                message: err.to_string(),
            });
            false
        }
    }
}

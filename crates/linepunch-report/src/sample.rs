//! Bounded cell sampling

/// Coordinates to inspect on a `rows` x `cols` sheet, at most `max_cells`
///
/// Small sheets are covered completely in row-major order. Larger ones are
/// sampled on a square lattice whose step keeps the count near `max_cells`,
/// then truncated to it.
pub fn sample_cells(rows: u32, cols: u32, max_cells: usize) -> Vec<(u32, u32)> {
    if rows == 0 || cols == 0 || max_cells == 0 {
        return Vec::new();
    }

    let total = rows as u64 * cols as u64;
    if total <= max_cells as u64 {
        return (1..=rows)
            .flat_map(|r| (1..=cols).map(move |c| (r, c)))
            .collect();
    }

    let step = ((total as f64 / max_cells as f64).sqrt().floor() as usize).max(1);
    (1..=rows)
        .step_by(step)
        .flat_map(|r| (1..=cols).step_by(step).map(move |c| (r, c)))
        .take(max_cells)
        .collect()
}

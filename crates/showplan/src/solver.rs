//! The row solver.
//!
//! Rows are adjusted only by inserting gap cells above a cell (pushing it and
//! everything below down) or removing removable gaps (pulling cells up). The
//! driver repairs one violation per iteration, constraints before exclusives,
//! and stops when a full scan finds nothing to do. Termination is bounded by
//! a hard iteration cap; hitting it means the validator let a malformed show
//! through.

use crate::constraint::{ConstraintKind, ConstraintSet};
use crate::error::PlanError;
use crate::grid::{Cell, CellId, Grid};
use showgraph::Signal;

const MAX_ITERATIONS: u64 = 1_000_000;

pub(crate) fn solve(grid: &mut Grid, set: &ConstraintSet) -> Result<(), PlanError> {
    for iteration in 0..MAX_ITERATIONS {
        if enforce_one_constraint(grid, set) {
            continue;
        }
        if enforce_one_exclusive(grid, set) {
            continue;
        }
        tracing::debug!(iterations = iteration, "row solver converged");
        return Ok(());
    }
    Err(PlanError::NoConvergence {
        iterations: MAX_ITERATIONS,
        detail: first_unsatisfied(grid, set),
    })
}

/// Repair the first unsatisfied constraint in input order. Returns false when
/// every constraint holds.
fn enforce_one_constraint(grid: &mut Grid, set: &ConstraintSet) -> bool {
    for c in &set.constraints {
        let row_a = grid.row(c.a);
        let row_b = grid.row(c.b);
        match c.kind {
            ConstraintKind::SameRow => {
                // Push whichever cell is higher down toward the other.
                if row_a < row_b {
                    let track = grid.track(c.a);
                    insert_gap(grid, track, row_a);
                    return true;
                }
                if row_b < row_a {
                    let track = grid.track(c.b);
                    insert_gap(grid, track, row_b);
                    return true;
                }
            }
            ConstraintKind::NextRow => {
                if row_b <= row_a {
                    let track = grid.track(c.b);
                    insert_gap(grid, track, row_b);
                    return true;
                }
            }
        }
    }
    false
}

/// For the first group whose members all share a row, clear the first foreign
/// event or title off that row. Returns false when every aligned group has
/// its row to itself.
fn enforce_one_exclusive(grid: &mut Grid, set: &ConstraintSet) -> bool {
    for group in &set.groups {
        let Some(&first) = group.members.first() else {
            continue;
        };
        let row = grid.row(first);
        if !group.members.iter().all(|&m| grid.row(m) == row) {
            continue;
        }
        let member_tracks: Vec<usize> = group.members.iter().map(|&m| grid.track(m)).collect();
        for track in 0..grid.track_count() {
            if member_tracks.contains(&track) {
                continue;
            }
            let Some(id) = grid.cell_at(track, row) else {
                continue;
            };
            if grid.cell(id).occupies_row() {
                insert_gap(grid, track, row);
                return true;
            }
        }
    }
    false
}

/// Open a row at `(track, row)`: the cell there and everything below shift
/// down one. An all-gap row on every other track is collapsed instead, and
/// the new cell inherits a continuation when it lands inside a block's open
/// lifetime, so a strip split by the insertion still renders as one bar.
fn insert_gap(grid: &mut Grid, track: usize, row: usize) {
    // If every other track holds a removable gap at this row, pull those up
    // instead of pushing this track down; it collapses rows earlier repairs
    // over-expanded.
    let mut removable = Vec::new();
    let mut all_removable = true;
    for t in 0..grid.track_count() {
        if t == track || grid.len(t) <= row {
            continue;
        }
        if is_removable_gap(grid, t, row) {
            removable.push(t);
        } else {
            all_removable = false;
            break;
        }
    }
    if all_removable && !removable.is_empty() {
        for t in removable {
            grid.remove(t, row);
        }
        return;
    }

    let cell = match nearest_above(grid, track, row) {
        Some(id) => continuation_from(grid.cell(id)),
        None => Cell::Gap,
    };
    grid.insert(track, row, cell);
}

/// A gap is removable unless pulling the column up would leave event/title
/// cells of two different blocks as nearest non-gap neighbors.
fn is_removable_gap(grid: &Grid, track: usize, row: usize) -> bool {
    let Some(id) = grid.cell_at(track, row) else {
        return false;
    };
    if !grid.cell(id).is_gap() {
        return false;
    }
    let above = nearest_above(grid, track, row);
    let below = nearest_below(grid, track, row);
    if let (Some(a), Some(b)) = (above, below) {
        let a = grid.cell(a);
        let b = grid.cell(b);
        if a.occupies_row() && b.occupies_row() && a.block_id() != b.block_id() {
            return false;
        }
    }
    true
}

/// Nearest non-gap cell above `row`, skipping gaps.
fn nearest_above(grid: &Grid, track: usize, row: usize) -> Option<CellId> {
    (0..row).rev().find_map(|r| {
        let id = grid.cell_at(track, r)?;
        (!grid.cell(id).is_gap()).then_some(id)
    })
}

/// Nearest non-gap cell below `row`, skipping gaps.
fn nearest_below(grid: &Grid, track: usize, row: usize) -> Option<CellId> {
    (row + 1..grid.len(track)).find_map(|r| {
        let id = grid.cell_at(track, r)?;
        (!grid.cell(id).is_gap()).then_some(id)
    })
}

/// What a fresh gap below `above` becomes: a continuation of the block whose
/// lifetime is still open there, otherwise a plain gap. `END` and `GO` close
/// the lifetime; a chain cell marks the run as already handed off.
fn continuation_from(above: &Cell) -> Cell {
    match above {
        Cell::Event(e) if e.signal != Signal::End && e.signal != Signal::Go => Cell::Continuation {
            block: e.block.clone(),
        },
        Cell::Title { block } | Cell::Continuation { block } => Cell::Continuation {
            block: block.clone(),
        },
        _ => Cell::Gap,
    }
}

/// Describe the first violated constraint for the no-convergence diagnostic.
fn first_unsatisfied(grid: &Grid, set: &ConstraintSet) -> String {
    for c in &set.constraints {
        let row_a = grid.row(c.a);
        let row_b = grid.row(c.b);
        let violated = match c.kind {
            ConstraintKind::SameRow => row_a != row_b,
            ConstraintKind::NextRow => row_b <= row_a,
        };
        if violated {
            let kind = match c.kind {
                ConstraintKind::SameRow => "same_row",
                ConstraintKind::NextRow => "next_row",
            };
            return format!(
                "{kind}({} at {:?} row {row_a}, {} at {:?} row {row_b})",
                describe(grid.cell(c.a)),
                grid.tracks[grid.track(c.a)].id,
                describe(grid.cell(c.b)),
                grid.tracks[grid.track(c.b)].id,
            );
        }
    }
    "exclusive groups still contested".to_string()
}

fn describe(cell: &Cell) -> String {
    match cell {
        Cell::Event(e) => format!("{}/{}", e.block, e.signal),
        Cell::Title { block } => format!("{block}/TITLE"),
        Cell::Gap => "gap".to_string(),
        Cell::Chain { block } => format!("{block}/chain"),
        Cell::Continuation { block } => format!("{block}/continuation"),
    }
}

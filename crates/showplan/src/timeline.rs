//! The planned timeline.
//!
//! One column per track (the synthetic cue track first), one row per discrete
//! moment. A cell's row index is its position in its track's cell list; all
//! tracks share the row coordinate system and rows past a track's last cell
//! are implicitly empty.

use crate::grid::{Cell, Grid};
use serde::Serialize;
use showgraph::{Block, Signal};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub tracks: Vec<TimelineTrack>,
    /// Block lookup for rendering. Cue blocks carry the cue track id here.
    pub blocks: BTreeMap<String, Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineTrack {
    pub id: String,
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Timeline {
    /// Height of the grid: the longest track's cell count.
    pub fn row_count(&self) -> usize {
        self.tracks.iter().map(|t| t.cells.len()).max().unwrap_or(0)
    }

    /// Cell at `(track, row)`, if the track reaches that row.
    pub fn cell(&self, track: usize, row: usize) -> Option<&Cell> {
        self.tracks.get(track)?.cells.get(row)
    }

    /// Locate a block's event cell as `(track index, row)`.
    pub fn find_event(&self, block: &str, signal: Signal) -> Option<(usize, usize)> {
        for (track_idx, track) in self.tracks.iter().enumerate() {
            for (row, cell) in track.cells.iter().enumerate() {
                if let Cell::Event(e) = cell {
                    if e.block == block && e.signal == signal {
                        return Some((track_idx, row));
                    }
                }
            }
        }
        None
    }
}

/// Assemble the final timeline from the solved grid: each column keeps its
/// cells in row order, truncated after the last non-gap cell.
pub(crate) fn project(grid: Grid, blocks: BTreeMap<String, Block>) -> Timeline {
    let (tracks, columns) = grid.into_columns();
    let tracks = tracks
        .into_iter()
        .zip(columns)
        .map(|(track, mut cells)| {
            while cells.last().is_some_and(|c| matches!(c, Cell::Gap)) {
                cells.pop();
            }
            TimelineTrack {
                id: track.id,
                name: track.name,
                cells,
            }
        })
        .collect();
    Timeline { tracks, blocks }
}

//! The cell grid the solver operates on.
//!
//! Cells live in an arena and are addressed by a [`CellId`] serial that is
//! never reused within one planning run, so constraints can reference cells
//! without being rewritten when rows shift. A cell's row is its position in
//! its track's column; the grid maintains a derived row table, reindexed
//! from the splice point onward on every insert or removal.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use showgraph::{Signal, Track};

/// Stable handle for one cell. Index into the grid's arena.
pub(crate) type CellId = usize;

/// One entry in one track's column.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A visible moment: a block's `GO`, `START`, `FADE_OUT`, or `END`.
    Event(EventCell),
    /// Label row between a block's `START` and `END`.
    Title { block: String },
    /// Empty row. Removable by the solver.
    Gap,
    /// Spacer after a block whose `END` chains into its same-track
    /// successor's `START`; the two runs abut through it.
    Chain { block: String },
    /// Row inside a block's open lifetime, introduced when the solver opens
    /// a gap there; carries the block id so rendering extends the bar.
    Continuation { block: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventCell {
    pub block: String,
    pub signal: Signal,
    pub is_start: bool,
    pub is_end: bool,
    /// Set when the event drives one or more cross-track targets.
    pub is_signal: bool,
}

impl Cell {
    pub(crate) fn event(block: &str, signal: Signal) -> Cell {
        let (is_start, is_end) = match signal {
            Signal::Go => (true, true),
            Signal::Start => (true, false),
            Signal::End => (false, true),
            Signal::FadeOut => (false, false),
        };
        Cell::Event(EventCell {
            block: block.to_string(),
            signal,
            is_start,
            is_end,
            is_signal: false,
        })
    }

    /// Block this cell belongs to, if any.
    pub fn block_id(&self) -> Option<&str> {
        match self {
            Cell::Event(e) => Some(&e.block),
            Cell::Title { block } | Cell::Chain { block } | Cell::Continuation { block } => {
                Some(block)
            }
            Cell::Gap => None,
        }
    }

    pub(crate) fn is_gap(&self) -> bool {
        matches!(self, Cell::Gap)
    }

    /// Whether the cell claims its row for exclusivity purposes: events and
    /// titles do, filler cells do not.
    pub(crate) fn occupies_row(&self) -> bool {
        matches!(self, Cell::Event(_) | Cell::Title { .. })
    }
}

// External form flattens the variants to the flag shape the front-end reads:
// events/titles carry block_id plus markers, filler cells carry a `type`
// discriminator.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Event(e) => {
                let mut len = 2;
                if e.is_start {
                    len += 1;
                }
                if e.is_end {
                    len += 1;
                }
                if e.is_signal {
                    len += 1;
                }
                let mut s = serializer.serialize_struct("Cell", len)?;
                s.serialize_field("block_id", &e.block)?;
                s.serialize_field("event", &e.signal)?;
                if e.is_start {
                    s.serialize_field("is_start", &true)?;
                }
                if e.is_end {
                    s.serialize_field("is_end", &true)?;
                }
                if e.is_signal {
                    s.serialize_field("is_signal", &true)?;
                }
                s.end()
            }
            Cell::Title { block } => {
                let mut s = serializer.serialize_struct("Cell", 2)?;
                s.serialize_field("block_id", block)?;
                s.serialize_field("is_title", &true)?;
                s.end()
            }
            Cell::Gap => {
                let mut s = serializer.serialize_struct("Cell", 1)?;
                s.serialize_field("type", "gap")?;
                s.end()
            }
            Cell::Chain { block } => {
                let mut s = serializer.serialize_struct("Cell", 2)?;
                s.serialize_field("type", "chain")?;
                s.serialize_field("block_id", block)?;
                s.end()
            }
            Cell::Continuation { block } => {
                let mut s = serializer.serialize_struct("Cell", 2)?;
                s.serialize_field("type", "continuation")?;
                s.serialize_field("block_id", block)?;
                s.end()
            }
        }
    }
}

/// Per-track cell columns over a shared arena.
#[derive(Debug)]
pub(crate) struct Grid {
    pub tracks: Vec<Track>,
    columns: Vec<Vec<CellId>>,
    cells: Vec<Cell>,
    track_of: Vec<usize>,
    row_of: Vec<usize>,
}

impl Grid {
    pub fn new(tracks: Vec<Track>) -> Grid {
        let columns = vec![Vec::new(); tracks.len()];
        Grid {
            tracks,
            columns,
            cells: Vec::new(),
            track_of: Vec::new(),
            row_of: Vec::new(),
        }
    }

    pub fn track_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self, track: usize) -> usize {
        self.columns[track].len()
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub fn row(&self, id: CellId) -> usize {
        self.row_of[id]
    }

    pub fn track(&self, id: CellId) -> usize {
        self.track_of[id]
    }

    pub fn cell_at(&self, track: usize, row: usize) -> Option<CellId> {
        self.columns[track].get(row).copied()
    }

    /// Append a cell to the bottom of a track.
    pub fn push(&mut self, track: usize, cell: Cell) -> CellId {
        let id = self.alloc(track, cell);
        self.row_of[id] = self.columns[track].len();
        self.columns[track].push(id);
        id
    }

    /// Insert a cell at `row`, shifting that row and everything below down.
    pub fn insert(&mut self, track: usize, row: usize, cell: Cell) -> CellId {
        let id = self.alloc(track, cell);
        self.columns[track].insert(row, id);
        self.reindex(track, row);
        id
    }

    /// Remove the cell at `row`, pulling everything below up. The arena slot
    /// stays allocated; the id just leaves the column.
    pub fn remove(&mut self, track: usize, row: usize) -> CellId {
        let id = self.columns[track].remove(row);
        self.reindex(track, row);
        id
    }

    pub fn mark_signal(&mut self, id: CellId) {
        if let Cell::Event(e) = &mut self.cells[id] {
            e.is_signal = true;
        }
    }

    /// Consume the grid into per-track cell lists, in row order.
    pub fn into_columns(self) -> (Vec<Track>, Vec<Vec<Cell>>) {
        let Grid {
            tracks,
            columns,
            cells,
            ..
        } = self;
        let columns = columns
            .into_iter()
            .map(|col| col.into_iter().map(|id| cells[id].clone()).collect())
            .collect();
        (tracks, columns)
    }

    fn alloc(&mut self, track: usize, cell: Cell) -> CellId {
        let id = self.cells.len();
        self.cells.push(cell);
        self.track_of.push(track);
        self.row_of.push(0);
        id
    }

    fn reindex(&mut self, track: usize, from: usize) {
        for row in from..self.columns[track].len() {
            let id = self.columns[track][row];
            self.row_of[id] = row;
        }
    }
}

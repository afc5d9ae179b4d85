//! Show timeline planner.
//!
//! Takes a declarative show graph and produces a two-dimensional timeline
//! grid: one column per track, one row per discrete moment, laid out so that
//! every cross-track trigger's source and targets share a row, every
//! same-track chain places the target below its source, and no unrelated
//! block occupies a row a trigger fires on.
//!
//! The pipeline: validate the show, expand each block to its cell strip,
//! lower triggers to row constraints, solve by inserting (and collapsing)
//! gap rows, then project the per-track cell lists into a [`Timeline`].
//! Everything is single-threaded, allocation-bounded, and deterministic for
//! a given input order; the show itself is never mutated.
//!
//! # Example
//!
//! ```
//! use showgraph::{generate, MockParams};
//!
//! let show = generate(MockParams::default());
//! let timeline = showplan::build_timeline(&show).unwrap();
//! assert_eq!(timeline.tracks[0].id, showgraph::CUE_TRACK_ID);
//! ```

mod constraint;
mod error;
mod grid;
mod materialize;
mod solver;
mod timeline;

pub use error::PlanError;
pub use grid::{Cell, EventCell};
pub use timeline::{Timeline, TimelineTrack};

use showgraph::Show;

/// Plan a show into a timeline.
///
/// Pure: the show is read-only and may be shared across callers. Returns an
/// error (and no timeline) if validation fails, an internal cell lookup
/// misses, or the row solver fails to converge.
pub fn build_timeline(show: &Show) -> Result<Timeline, PlanError> {
    show.validate()?;
    let mut materialized = materialize::materialize(show);
    let constraints = constraint::build(show, &mut materialized)?;
    let materialize::Materialized {
        mut grid, blocks, ..
    } = materialized;
    solver::solve(&mut grid, &constraints)?;
    Ok(timeline::project(grid, blocks))
}

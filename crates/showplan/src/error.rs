//! Planner error kinds.
//!
//! Validation failures are user-input faults; the other two kinds are
//! invariant violations that indicate a bug or a show the validator should
//! have rejected.

use showgraph::{Signal, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The show failed validation.
    #[error("invalid show: {0}")]
    Validation(#[from] ValidationError),

    /// The constraint builder asked for a cell the materializer never
    /// produced. Indicates a validator gap, not a bad show.
    #[error("internal: no cell for block {block:?} signal {signal}")]
    LookupMiss { block: String, signal: Signal },

    /// The row solver exceeded its iteration cap without satisfying every
    /// constraint. Implies malformed or validator-missed input.
    #[error("solver did not converge after {iterations} iterations; first unsatisfied: {detail}")]
    NoConvergence { iterations: u64, detail: String },
}

//! Show graph data model and validator.
//!
//! A show is a declarative graph of tracks, blocks, and triggers. Blocks are
//! the things that happen (cues, lights, media, delays); triggers wire a
//! block's outgoing signal to one or more target hooks. This crate owns the
//! wire form of that graph, the structural/semantic validator that gates it,
//! and a deterministic mock generator used as a test and bench fixture.
//!
//! The planner that turns a validated show into a timeline grid lives in the
//! `showplan` crate.
//!
//! # Example
//!
//! ```
//! use showgraph::Show;
//!
//! let show: Show = serde_json::from_str(r#"{
//!     "tracks": [{"id": "t1", "name": "Media"}],
//!     "blocks": [
//!         {"id": "q1", "type": "cue", "name": "Go"},
//!         {"id": "a", "type": "media", "track": "t1", "name": "Walk-in"}
//!     ],
//!     "triggers": [
//!         {"source": {"block": "q1", "signal": "GO"},
//!          "targets": [{"block": "a", "hook": "START"}]}
//!     ]
//! }"#).unwrap();
//!
//! assert!(show.validate().is_ok());
//! ```

pub mod mock;
pub mod model;
pub mod validate;

pub use mock::{generate, MockParams};
pub use model::{
    Block, BlockType, Show, Signal, Track, Trigger, TriggerSource, TriggerTarget, CUE_TRACK_ID,
    CUE_TRACK_NAME,
};
pub use validate::ValidationError;

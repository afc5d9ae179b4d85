//! Wire types for the show graph.
//!
//! Field names and literals match the JSON interchange form: signals and
//! hooks are upper-case literals from `{GO, START, FADE_OUT, END}`, block
//! types are lowercase, and optional fields are omitted when empty.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Track id of the synthetic cue track. Always the first timeline column.
pub const CUE_TRACK_ID: &str = "_cue";

/// Display name of the synthetic cue track.
pub const CUE_TRACK_NAME: &str = "Cue";

/// A signal a block emits, or a hook a trigger lands on.
///
/// Cue blocks expose exactly `GO`; every other block type exposes
/// `START`, `FADE_OUT`, and `END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Go,
    Start,
    FadeOut,
    End,
}

impl Signal {
    /// Wire literal for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Go => "GO",
            Signal::Start => "START",
            Signal::FadeOut => "FADE_OUT",
            Signal::End => "END",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Cue,
    Light,
    Media,
    Delay,
}

/// A column in the timeline grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A show element with a lifecycle expressed as signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockType,
    /// Omitted for cue blocks; they live on the synthetic cue track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "loop", default, skip_serializing_if = "is_false")]
    pub looped: bool,
}

fn is_false(v: &bool) -> bool {
    !v
}

impl Block {
    pub fn is_cue(&self) -> bool {
        self.kind == BlockType::Cue
    }

    /// Whether the block ends on its own. Blocks without defined timing can
    /// only be closed by an incoming trigger on their `FADE_OUT` or `END`.
    pub fn has_defined_timing(&self) -> bool {
        match self.kind {
            BlockType::Cue | BlockType::Delay => true,
            BlockType::Media => !self.looped,
            BlockType::Light => false,
        }
    }

    /// Whether `signal` is in this block's signal/hook alphabet.
    pub fn accepts(&self, signal: Signal) -> bool {
        if self.is_cue() {
            signal == Signal::Go
        } else {
            signal != Signal::Go
        }
    }

    /// The track this block's cells land on: cues go to the cue track.
    pub fn timeline_track(&self) -> &str {
        if self.is_cue() {
            CUE_TRACK_ID
        } else {
            self.track.as_deref().unwrap_or("")
        }
    }
}

/// A `source -> [targets]` edge in the show graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub source: TriggerSource,
    #[serde(default)]
    pub targets: Vec<TriggerTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSource {
    pub block: String,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerTarget {
    pub block: String,
    pub hook: Signal,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ->", self.source.block, self.source.signal)?;
        for target in &self.targets {
            write!(f, " {}/{}", target.block, target.hook)?;
        }
        Ok(())
    }
}

/// A complete show graph. The planner consumes it read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Show {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

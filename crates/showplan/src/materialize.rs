//! Block-to-cell expansion.
//!
//! Walks `show.blocks` in input order and lays each block out on its track:
//! cues become a single `GO` cell on the synthetic cue track, everything else
//! becomes the fixed `START, TITLE, FADE_OUT, END` strip. A spacer follows
//! every non-last block on a track so the solver has room to tighten (chain)
//! or separate (gap) neighboring runs.

use crate::error::PlanError;
use crate::grid::{Cell, CellId, Grid};
use showgraph::{Block, Show, Signal, Track, CUE_TRACK_ID, CUE_TRACK_NAME};
use std::collections::{BTreeMap, HashMap, HashSet};

/// `(block, signal) -> cell` index for the constraint builder. A miss is an
/// internal invariant violation (the validator admitted a reference the
/// materializer never laid out).
pub(crate) struct CellLookup {
    map: HashMap<(String, Signal), CellId>,
}

impl CellLookup {
    fn register(&mut self, block: &str, signal: Signal, id: CellId) {
        self.map.insert((block.to_string(), signal), id);
    }

    pub fn get(&self, block: &str, signal: Signal) -> Result<CellId, PlanError> {
        self.map
            .get(&(block.to_string(), signal))
            .copied()
            .ok_or_else(|| PlanError::LookupMiss {
                block: block.to_string(),
                signal,
            })
    }
}

pub(crate) struct Materialized {
    pub grid: Grid,
    pub lookup: CellLookup,
    /// Block table with cue blocks re-stamped onto the cue track; becomes
    /// `Timeline.blocks`.
    pub blocks: BTreeMap<String, Block>,
}

/// Expand a validated show into per-track cell columns.
pub(crate) fn materialize(show: &Show) -> Materialized {
    let mut tracks = Vec::with_capacity(show.tracks.len() + 1);
    tracks.push(Track {
        id: CUE_TRACK_ID.to_string(),
        name: CUE_TRACK_NAME.to_string(),
    });
    tracks.extend(show.tracks.iter().cloned());

    let track_idx: HashMap<String, usize> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.clone(), i))
        .collect();

    let mut blocks = BTreeMap::new();
    for block in &show.blocks {
        let mut block = block.clone();
        if block.is_cue() {
            block.track = Some(CUE_TRACK_ID.to_string());
        }
        blocks.insert(block.id.clone(), block);
    }

    // Last block per track, by input order.
    let mut last_on_track: HashMap<&str, &str> = HashMap::new();
    for block in &show.blocks {
        last_on_track.insert(block.timeline_track(), block.id.as_str());
    }

    // Blocks whose END chains into a same-track successor's START.
    let block_track: HashMap<&str, &str> = show
        .blocks
        .iter()
        .map(|b| (b.id.as_str(), b.timeline_track()))
        .collect();
    let mut end_chains: HashSet<&str> = HashSet::new();
    for trigger in &show.triggers {
        if trigger.source.signal != Signal::End {
            continue;
        }
        let Some(&source_track) = block_track.get(trigger.source.block.as_str()) else {
            continue;
        };
        for target in &trigger.targets {
            if target.hook == Signal::Start
                && block_track.get(target.block.as_str()) == Some(&source_track)
            {
                end_chains.insert(trigger.source.block.as_str());
            }
        }
    }

    let mut grid = Grid::new(tracks);
    let mut lookup = CellLookup {
        map: HashMap::new(),
    };

    for block in &show.blocks {
        let Some(&track) = track_idx.get(block.timeline_track()) else {
            continue;
        };
        if block.is_cue() {
            let go = grid.push(track, Cell::event(&block.id, Signal::Go));
            lookup.register(&block.id, Signal::Go, go);
            continue;
        }

        let start = grid.push(track, Cell::event(&block.id, Signal::Start));
        grid.push(
            track,
            Cell::Title {
                block: block.id.clone(),
            },
        );
        let fade_out = grid.push(track, Cell::event(&block.id, Signal::FadeOut));
        let end = grid.push(track, Cell::event(&block.id, Signal::End));
        lookup.register(&block.id, Signal::Start, start);
        lookup.register(&block.id, Signal::FadeOut, fade_out);
        lookup.register(&block.id, Signal::End, end);

        if last_on_track.get(block.timeline_track()) != Some(&block.id.as_str()) {
            let spacer = if end_chains.contains(block.id.as_str()) {
                Cell::Chain {
                    block: block.id.clone(),
                }
            } else {
                Cell::Gap
            };
            grid.push(track, spacer);
        }
    }

    Materialized {
        grid,
        lookup,
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showgraph::{BlockType, Trigger, TriggerSource, TriggerTarget};

    fn show_with_chain() -> Show {
        Show {
            tracks: vec![Track {
                id: "t1".into(),
                name: "T1".into(),
            }],
            blocks: vec![
                Block {
                    id: "q1".into(),
                    kind: BlockType::Cue,
                    track: None,
                    name: String::new(),
                    looped: false,
                },
                Block {
                    id: "a".into(),
                    kind: BlockType::Media,
                    track: Some("t1".into()),
                    name: String::new(),
                    looped: false,
                },
                Block {
                    id: "b".into(),
                    kind: BlockType::Media,
                    track: Some("t1".into()),
                    name: String::new(),
                    looped: false,
                },
            ],
            triggers: vec![
                Trigger {
                    source: TriggerSource {
                        block: "q1".into(),
                        signal: Signal::Go,
                    },
                    targets: vec![TriggerTarget {
                        block: "a".into(),
                        hook: Signal::Start,
                    }],
                },
                Trigger {
                    source: TriggerSource {
                        block: "a".into(),
                        signal: Signal::End,
                    },
                    targets: vec![TriggerTarget {
                        block: "b".into(),
                        hook: Signal::Start,
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_cue_track_is_first() {
        let m = materialize(&show_with_chain());
        assert_eq!(m.grid.tracks[0].id, CUE_TRACK_ID);
        assert_eq!(m.grid.tracks[1].id, "t1");
        assert_eq!(m.blocks["q1"].track.as_deref(), Some(CUE_TRACK_ID));
    }

    #[test]
    fn test_strip_layout_and_chain_spacer() {
        let m = materialize(&show_with_chain());
        // a's strip, the chain spacer, then b's strip.
        assert_eq!(m.grid.len(1), 9);
        let spacer = m.grid.cell_at(1, 4).unwrap();
        assert_eq!(
            m.grid.cell(spacer),
            &Cell::Chain { block: "a".into() }
        );
        // b is last on the track: no trailing spacer.
        let end = m.lookup.get("b", Signal::End).unwrap();
        assert_eq!(m.grid.row(end), 8);
    }

    #[test]
    fn test_gap_spacer_without_chain() {
        let mut show = show_with_chain();
        // Break the chain: close b from the cue instead.
        show.triggers[1] = Trigger {
            source: TriggerSource {
                block: "q1".into(),
                signal: Signal::Go,
            },
            targets: vec![TriggerTarget {
                block: "b".into(),
                hook: Signal::Start,
            }],
        };
        let m = materialize(&show);
        let spacer = m.grid.cell_at(1, 4).unwrap();
        assert_eq!(m.grid.cell(spacer), &Cell::Gap);
    }

    #[test]
    fn test_lookup_miss() {
        let m = materialize(&show_with_chain());
        let err = m.lookup.get("ghost", Signal::Start).unwrap_err();
        assert!(matches!(err, PlanError::LookupMiss { .. }));
    }
}

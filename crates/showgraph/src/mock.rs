//! Deterministic mock show generator.
//!
//! Used as a test and bench fixture: media blocks are dealt round-robin
//! across tracks, consecutive blocks on a track chain `END -> START`, and
//! cues fan out to the current head block of every track, advancing each
//! head so the whole show is consumed by the final cue. No randomness; the
//! same parameters always produce the same show.

use crate::model::{Block, BlockType, Show, Signal, Track, Trigger, TriggerSource, TriggerTarget};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockParams {
    pub num_tracks: usize,
    pub num_scenes: usize,
    pub cues_per_scene: usize,
    pub blocks_per_cue: usize,
}

impl Default for MockParams {
    fn default() -> Self {
        MockParams {
            num_tracks: 4,
            num_scenes: 6,
            cues_per_scene: 4,
            blocks_per_cue: 2,
        }
    }
}

/// Generate a mock show. The result always passes [`Show::validate`].
pub fn generate(params: MockParams) -> Show {
    let num_blocks = if params.num_tracks == 0 {
        0
    } else {
        params.num_scenes * params.cues_per_scene * params.blocks_per_cue
    };
    let mut num_cues = params.num_scenes * params.cues_per_scene;
    if num_blocks > 0 && num_cues == 0 {
        num_cues = 1;
    }

    let mut show = Show::default();

    for i in 0..params.num_tracks {
        show.tracks.push(Track {
            id: format!("track_{i}"),
            name: format!("Track {i}"),
        });
    }

    for i in 0..num_cues {
        show.blocks.push(Block {
            id: format!("cue_{i}"),
            kind: BlockType::Cue,
            track: None,
            name: format!("Cue {i}"),
            looped: false,
        });
    }

    // Deal media blocks round-robin across tracks.
    let mut blocks_by_track: Vec<Vec<String>> = vec![Vec::new(); params.num_tracks];
    for i in 0..num_blocks {
        let track_idx = i % params.num_tracks;
        let id = format!("block_{}_{}", track_idx, blocks_by_track[track_idx].len());
        show.blocks.push(Block {
            id: id.clone(),
            kind: BlockType::Media,
            track: Some(format!("track_{track_idx}")),
            name: format!("Block {}-{}", track_idx, blocks_by_track[track_idx].len()),
            looped: false,
        });
        blocks_by_track[track_idx].push(id);
    }

    // Chain consecutive blocks on each track.
    for blocks in &blocks_by_track {
        for pair in blocks.windows(2) {
            show.triggers.push(Trigger {
                source: TriggerSource {
                    block: pair[0].clone(),
                    signal: Signal::End,
                },
                targets: vec![TriggerTarget {
                    block: pair[1].clone(),
                    hook: Signal::Start,
                }],
            });
        }
    }

    // Fan each cue out to the head block of every track, advancing heads so
    // the remaining depth is spread over the remaining cues.
    let mut head_per_track = vec![0usize; params.num_tracks];
    for i in 0..num_cues {
        let mut targets = Vec::new();
        for (track_idx, blocks) in blocks_by_track.iter().enumerate() {
            let head = head_per_track[track_idx];
            if head >= blocks.len() {
                continue;
            }
            targets.push(TriggerTarget {
                block: blocks[head].clone(),
                hook: Signal::Start,
            });
            let depth = blocks.len() - head;
            let advance = (depth / (num_cues - i)).max(1);
            head_per_track[track_idx] += advance;
        }
        if !targets.is_empty() {
            show.triggers.push(Trigger {
                source: TriggerSource {
                    block: format!("cue_{i}"),
                    signal: Signal::Go,
                },
                targets,
            });
        }
    }

    show
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mock_validates() {
        let show = generate(MockParams::default());
        assert_eq!(show.validate(), Ok(()));
        assert_eq!(show.tracks.len(), 4);
        assert_eq!(show.blocks.len(), 24 + 48);
    }

    #[test]
    fn test_params_partial_deserialize() {
        // Missing fields fall back to the defaults, so a config table can
        // override just one knob.
        let params: MockParams = serde_json::from_str(r#"{"num_tracks": 7}"#).unwrap();
        assert_eq!(params.num_tracks, 7);
        assert_eq!(params.num_scenes, 6);
        assert_eq!(params.cues_per_scene, 4);
        assert_eq!(params.blocks_per_cue, 2);
    }

    #[test]
    fn test_mock_is_deterministic() {
        let a = generate(MockParams::default());
        let b = generate(MockParams::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_params() {
        let show = generate(MockParams {
            num_tracks: 0,
            num_scenes: 0,
            cues_per_scene: 0,
            blocks_per_cue: 0,
        });
        assert_eq!(show.validate(), Ok(()));
        assert!(show.blocks.is_empty());
    }

    #[test]
    fn test_stress_shape_validates() {
        // 7 tracks, 100 cues, 1000 blocks: the benchmark scenario.
        let show = generate(MockParams {
            num_tracks: 7,
            num_scenes: 20,
            cues_per_scene: 5,
            blocks_per_cue: 10,
        });
        assert_eq!(show.validate(), Ok(()));
        let cues = show.blocks.iter().filter(|b| b.is_cue()).count();
        assert_eq!(cues, 100);
        assert_eq!(show.blocks.len() - cues, 1000);
    }
}

//! Structural and semantic validation of a show graph.
//!
//! Checks run in a fixed order and stop at the first failure. Every failure
//! is the same error kind carrying a human-readable detail string; callers
//! decide presentation.

use crate::model::{Show, Signal};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A show failed validation. `detail` names the rule and the entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct ValidationError {
    pub detail: String,
}

impl ValidationError {
    fn new(detail: impl Into<String>) -> Self {
        ValidationError {
            detail: detail.into(),
        }
    }
}

impl Show {
    /// Validate the show graph.
    ///
    /// Rules, in order:
    /// 1. unique track and block ids
    /// 2. non-cue blocks reference a known track
    /// 3. trigger endpoints exist and use the block type's signal alphabet
    /// 4. every non-cue block has a trigger for its `START`
    /// 5. open-ended blocks are closed by a `FADE_OUT` or `END` target
    /// 6. trigger sources are unique, with the same-track singleton exception
    /// 7. one target per track within a trigger
    /// 8. same-track `START` hooks are sourced from `END`
    /// 9. open-ended source signals are reachable
    pub fn validate(&self) -> Result<(), ValidationError> {
        // 1. Unique ids.
        let mut track_ids = HashSet::new();
        for track in &self.tracks {
            if !track_ids.insert(track.id.as_str()) {
                return Err(ValidationError::new(format!(
                    "duplicate track id {:?}",
                    track.id
                )));
            }
        }
        let mut blocks = HashMap::new();
        for block in &self.blocks {
            if blocks.insert(block.id.as_str(), block).is_some() {
                return Err(ValidationError::new(format!(
                    "duplicate block id {:?}",
                    block.id
                )));
            }
        }

        // 2. Non-cue blocks live on a known track.
        for block in &self.blocks {
            if block.is_cue() {
                continue;
            }
            let track = block.track.as_deref().unwrap_or("");
            if !track_ids.contains(track) {
                return Err(ValidationError::new(format!(
                    "block {:?} uses unknown track {:?}",
                    block.id, track
                )));
            }
        }

        // 3. Trigger endpoints exist and respect the signal/hook alphabet.
        for trigger in &self.triggers {
            let source = blocks.get(trigger.source.block.as_str()).ok_or_else(|| {
                ValidationError::new(format!(
                    "trigger source block {:?} not found",
                    trigger.source.block
                ))
            })?;
            if !source.accepts(trigger.source.signal) {
                return Err(ValidationError::new(format!(
                    "trigger source signal {:?} is invalid for block {:?}",
                    trigger.source.signal.as_str(),
                    trigger.source.block
                )));
            }
            for target in &trigger.targets {
                let target_block = blocks.get(target.block.as_str()).ok_or_else(|| {
                    ValidationError::new(format!(
                        "trigger target block {:?} not found",
                        target.block
                    ))
                })?;
                if !target_block.accepts(target.hook) {
                    return Err(ValidationError::new(format!(
                        "trigger target hook {:?} is invalid for block {:?}",
                        target.hook.as_str(),
                        target.block
                    )));
                }
            }
        }

        // Hook indexes used by the remaining rules.
        let mut hook_targeted = HashSet::new();
        let mut targeted_by = HashMap::new();
        for trigger in &self.triggers {
            for target in &trigger.targets {
                hook_targeted.insert((target.block.as_str(), target.hook));
                targeted_by.insert((target.block.as_str(), target.hook), trigger);
            }
        }

        // 4. Every non-cue block is started by something.
        for block in &self.blocks {
            if block.is_cue() {
                continue;
            }
            if !hook_targeted.contains(&(block.id.as_str(), Signal::Start)) {
                return Err(ValidationError::new(format!(
                    "block {:?} has no trigger for its START",
                    block.id
                )));
            }
        }

        // 5. Open-ended blocks are closed by something.
        for block in &self.blocks {
            if block.is_cue() || block.has_defined_timing() {
                continue;
            }
            if !hook_targeted.contains(&(block.id.as_str(), Signal::FadeOut))
                && !hook_targeted.contains(&(block.id.as_str(), Signal::End))
            {
                return Err(ValidationError::new(format!(
                    "block {:?} has no defined timing and nothing triggers its FADE_OUT or END",
                    block.id
                )));
            }
        }

        // 6. Source uniqueness. A source that is itself a target of another
        // trigger is only tolerated for same-track singletons, the shape that
        // lets an END -> START chain absorb its follower without a duplicate
        // edge.
        let mut source_used = HashSet::new();
        for trigger in &self.triggers {
            let source_block = blocks[trigger.source.block.as_str()];
            let key = (trigger.source.block.as_str(), trigger.source.signal);
            if let Some(other) = targeted_by.get(&key) {
                let same_track_single = trigger.targets.len() == 1
                    && blocks[trigger.targets[0].block.as_str()].timeline_track()
                        == source_block.timeline_track();
                if !same_track_single {
                    return Err(ValidationError::new(format!(
                        "trigger conflict: {} vs {}",
                        other, trigger
                    )));
                }
            }
            if !source_used.insert(key) {
                return Err(ValidationError::new(format!(
                    "duplicate trigger source: block {:?} signal {:?}",
                    trigger.source.block,
                    trigger.source.signal.as_str()
                )));
            }
        }

        // 7. One target per track within a trigger.
        for trigger in &self.triggers {
            let mut targeted_tracks: HashMap<&str, &str> = HashMap::new();
            for target in &trigger.targets {
                let track = blocks[target.block.as_str()].timeline_track();
                if let Some(prev) = targeted_tracks.insert(track, target.block.as_str()) {
                    return Err(ValidationError::new(format!(
                        "trigger conflict: {} targets multiple blocks on track {:?} ({:?} and {:?})",
                        trigger, track, prev, target.block
                    )));
                }
            }
        }

        // 8. Same-track START hooks chain through END.
        for trigger in &self.triggers {
            let source_block = blocks[trigger.source.block.as_str()];
            for target in &trigger.targets {
                let target_block = blocks[target.block.as_str()];
                if !source_block.is_cue()
                    && !target_block.is_cue()
                    && source_block.timeline_track() == target_block.timeline_track()
                    && target.hook == Signal::Start
                    && trigger.source.signal != Signal::End
                {
                    return Err(ValidationError::new(format!(
                        "same-track START trigger from {:?} to {:?} must use END signal, not {}",
                        source_block.id, target_block.id, trigger.source.signal
                    )));
                }
            }
        }

        // 9. Open-ended source signals must be able to fire. END is satisfied
        // by a FADE_OUT target because FADE_OUT implies an eventual END.
        for trigger in &self.triggers {
            let source_block = blocks[trigger.source.block.as_str()];
            if source_block.has_defined_timing() {
                continue;
            }
            let signal = trigger.source.signal;
            if signal != Signal::FadeOut && signal != Signal::End {
                continue;
            }
            if signal == Signal::End
                && hook_targeted.contains(&(source_block.id.as_str(), Signal::FadeOut))
            {
                continue;
            }
            if !hook_targeted.contains(&(source_block.id.as_str(), signal)) {
                return Err(ValidationError::new(format!(
                    "block {:?} has no defined timing and nothing triggers its {sig}, so its {sig} signal will never fire",
                    source_block.id,
                    sig = signal.as_str()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockType, Track, Trigger, TriggerSource, TriggerTarget};

    fn track(id: &str) -> Track {
        Track {
            id: id.into(),
            name: id.to_uppercase(),
        }
    }

    fn cue(id: &str) -> Block {
        Block {
            id: id.into(),
            kind: BlockType::Cue,
            track: None,
            name: id.into(),
            looped: false,
        }
    }

    fn block(id: &str, kind: BlockType, track: &str) -> Block {
        Block {
            id: id.into(),
            kind,
            track: Some(track.into()),
            name: id.into(),
            looped: false,
        }
    }

    fn trigger(src: &str, signal: Signal, targets: &[(&str, Signal)]) -> Trigger {
        Trigger {
            source: TriggerSource {
                block: src.into(),
                signal,
            },
            targets: targets
                .iter()
                .map(|(block, hook)| TriggerTarget {
                    block: (*block).into(),
                    hook: *hook,
                })
                .collect(),
        }
    }

    /// Minimal valid show: one cue starting one media block on one track.
    fn valid_show() -> Show {
        Show {
            tracks: vec![track("t1")],
            blocks: vec![cue("q1"), block("a", BlockType::Media, "t1")],
            triggers: vec![trigger("q1", Signal::Go, &[("a", Signal::Start)])],
        }
    }

    fn detail(show: &Show) -> String {
        show.validate().unwrap_err().detail
    }

    #[test]
    fn test_valid_show_passes() {
        assert_eq!(valid_show().validate(), Ok(()));
    }

    #[test]
    fn test_empty_show_passes() {
        assert_eq!(Show::default().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_track_id() {
        let mut show = valid_show();
        show.tracks.push(track("t1"));
        assert!(detail(&show).contains("duplicate track id"));
    }

    #[test]
    fn test_duplicate_block_id() {
        let mut show = valid_show();
        show.blocks.push(block("a", BlockType::Media, "t1"));
        assert!(detail(&show).contains("duplicate block id"));
    }

    #[test]
    fn test_unknown_track() {
        let mut show = valid_show();
        show.blocks.push(block("b", BlockType::Media, "t9"));
        assert!(detail(&show).contains("unknown track"));
    }

    #[test]
    fn test_source_block_missing() {
        let mut show = valid_show();
        show.triggers
            .push(trigger("ghost", Signal::Go, &[("a", Signal::Start)]));
        assert!(detail(&show).contains("source block"));
    }

    #[test]
    fn test_cue_source_signal_must_be_go() {
        let mut show = valid_show();
        show.triggers[0].source.signal = Signal::End;
        assert!(detail(&show).contains("invalid for block"));
    }

    #[test]
    fn test_hook_onto_cue_rejected() {
        let mut show = valid_show();
        show.blocks.push(cue("q2"));
        show.triggers
            .push(trigger("a", Signal::End, &[("q2", Signal::Start)]));
        assert!(detail(&show).contains("target hook"));
    }

    #[test]
    fn test_block_without_start() {
        let mut show = valid_show();
        show.blocks.push(block("b", BlockType::Media, "t1"));
        assert!(detail(&show).contains("no trigger for its START"));
    }

    #[test]
    fn test_open_ended_block_must_be_closed() {
        let mut show = valid_show();
        show.blocks.push(block("w", BlockType::Light, "t1"));
        show.triggers
            .push(trigger("a", Signal::End, &[("w", Signal::Start)]));
        assert!(detail(&show).contains("nothing triggers its FADE_OUT or END"));
    }

    #[test]
    fn test_duplicate_source() {
        let mut show = valid_show();
        show.blocks.push(block("b", BlockType::Media, "t1"));
        show.triggers
            .push(trigger("q1", Signal::Go, &[("b", Signal::Start)]));
        assert!(detail(&show).contains("duplicate trigger source"));
    }

    #[test]
    fn test_targeted_source_conflict() {
        // q2/GO lands on a/END while a/END also fans out cross-track: conflict.
        let mut show = valid_show();
        show.tracks.push(track("t2"));
        show.blocks.push(cue("q2"));
        show.blocks.push(block("b", BlockType::Media, "t2"));
        show.triggers
            .push(trigger("q2", Signal::Go, &[("a", Signal::End)]));
        show.triggers
            .push(trigger("a", Signal::End, &[("b", Signal::Start)]));
        assert!(detail(&show).contains("trigger conflict"));
    }

    #[test]
    fn test_targeted_source_same_track_singleton_allowed() {
        // Same shape, but the follower sits on the source's track: permitted.
        let mut show = valid_show();
        show.blocks.push(cue("q2"));
        show.blocks.push(block("b", BlockType::Media, "t1"));
        show.triggers
            .push(trigger("q2", Signal::Go, &[("a", Signal::End)]));
        show.triggers
            .push(trigger("a", Signal::End, &[("b", Signal::Start)]));
        assert_eq!(show.validate(), Ok(()));
    }

    #[test]
    fn test_self_close_allowed() {
        let mut show = valid_show();
        show.blocks.push(block("w", BlockType::Light, "t1"));
        show.triggers
            .push(trigger("a", Signal::End, &[("w", Signal::Start)]));
        show.triggers
            .push(trigger("w", Signal::End, &[("w", Signal::End)]));
        assert_eq!(show.validate(), Ok(()));
    }

    #[test]
    fn test_one_target_per_track() {
        let mut show = valid_show();
        show.blocks.push(block("b", BlockType::Media, "t1"));
        show.triggers[0]
            .targets
            .push(TriggerTarget {
                block: "b".into(),
                hook: Signal::Start,
            });
        assert!(detail(&show).contains("multiple blocks on track"));
    }

    #[test]
    fn test_same_track_start_requires_end() {
        let mut show = valid_show();
        show.blocks.push(block("b", BlockType::Media, "t1"));
        show.triggers
            .push(trigger("a", Signal::FadeOut, &[("b", Signal::Start)]));
        assert!(detail(&show).contains("must use END signal"));
    }

    #[test]
    fn test_unreachable_open_ended_signal() {
        // w never fades out or ends on its own and nothing closes it before
        // its FADE_OUT is used as a source.
        let mut show = valid_show();
        show.tracks.push(track("t2"));
        show.blocks.push(block("w", BlockType::Light, "t1"));
        show.blocks.push(block("b", BlockType::Media, "t2"));
        show.triggers
            .push(trigger("a", Signal::End, &[("w", Signal::Start)]));
        show.triggers
            .push(trigger("w", Signal::End, &[("w", Signal::End)]));
        show.triggers
            .push(trigger("w", Signal::FadeOut, &[("b", Signal::Start)]));
        assert!(detail(&show).contains("will never fire"));
    }

    #[test]
    fn test_end_reachable_via_fade_out_target() {
        let mut show = valid_show();
        show.tracks.push(track("t2"));
        show.blocks.push(cue("q2"));
        show.blocks.push(block("w", BlockType::Light, "t1"));
        show.blocks.push(block("b", BlockType::Media, "t2"));
        show.triggers
            .push(trigger("a", Signal::End, &[("w", Signal::Start)]));
        show.triggers
            .push(trigger("q2", Signal::Go, &[("w", Signal::FadeOut)]));
        show.triggers
            .push(trigger("w", Signal::End, &[("b", Signal::Start)]));
        assert_eq!(show.validate(), Ok(()));
    }
}

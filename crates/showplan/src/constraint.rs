//! Trigger-to-constraint lowering.
//!
//! Every trigger pair becomes a row relation between two cells: same-track
//! pairs demand the target strictly below the source (`next_row`), cross-track
//! pairs demand a shared row (`same_row`). Each trigger with a cross-track
//! pair also claims its shared row exclusively for its member tracks.
//!
//! A block strip's internal `START < TITLE < FADE_OUT < END` order needs no
//! constraints: cells are materialized in that order and row motion is
//! insert/remove only, which preserves relative order within a track.

use crate::error::PlanError;
use crate::grid::CellId;
use crate::materialize::Materialized;
use showgraph::Show;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintKind {
    /// Both cells must land on the same row (cross-track sync).
    SameRow,
    /// `b` must land strictly below `a` (same-track chaining).
    NextRow,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Constraint {
    pub kind: ConstraintKind,
    pub a: CellId,
    pub b: CellId,
}

/// A trigger's endpoints. When all members share a row, no other track may
/// carry an event or title there.
#[derive(Debug, Clone)]
pub(crate) struct ExclusiveGroup {
    pub members: Vec<CellId>,
}

#[derive(Debug, Default)]
pub(crate) struct ConstraintSet {
    pub constraints: Vec<Constraint>,
    pub groups: Vec<ExclusiveGroup>,
}

/// Lower the show's triggers onto the materialized grid. Order follows the
/// input trigger order; the solver depends on that for determinism.
pub(crate) fn build(show: &Show, m: &mut Materialized) -> Result<ConstraintSet, PlanError> {
    let mut set = ConstraintSet::default();

    for trigger in &show.triggers {
        let source = m.lookup.get(&trigger.source.block, trigger.source.signal)?;
        let mut members = vec![source];
        let mut has_cross_track = false;

        for target in &trigger.targets {
            let target_cell = m.lookup.get(&target.block, target.hook)?;
            if target_cell == source {
                // Self-target: the trigger closes its own block; there is no
                // row relation to enforce.
                continue;
            }
            if m.grid.track(target_cell) == m.grid.track(source) {
                set.constraints.push(Constraint {
                    kind: ConstraintKind::NextRow,
                    a: source,
                    b: target_cell,
                });
            } else {
                set.constraints.push(Constraint {
                    kind: ConstraintKind::SameRow,
                    a: source,
                    b: target_cell,
                });
                members.push(target_cell);
                has_cross_track = true;
            }
        }

        // Same-track targets sit strictly below the shared row and never
        // align with it, so only the cross-track endpoints form the group.
        if has_cross_track {
            m.grid.mark_signal(source);
            set.groups.push(ExclusiveGroup { members });
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::materialize::materialize;
    use showgraph::{generate, MockParams, Signal};

    fn parse(json: &str) -> Show {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_cross_track_pair() {
        let show = parse(
            r#"{
            "tracks": [{"id": "t1", "name": "T1"}],
            "blocks": [
                {"id": "q1", "type": "cue", "name": ""},
                {"id": "a", "type": "media", "track": "t1", "name": ""}
            ],
            "triggers": [
                {"source": {"block": "q1", "signal": "GO"},
                 "targets": [{"block": "a", "hook": "START"}]}
            ]
        }"#,
        );
        let mut m = materialize(&show);
        let set = build(&show, &mut m).unwrap();

        assert_eq!(set.constraints.len(), 1);
        assert_eq!(set.constraints[0].kind, ConstraintKind::SameRow);
        assert_eq!(set.groups.len(), 1);
        assert_eq!(set.groups[0].members.len(), 2);

        // Cross-track fan-out marks the source as a signal.
        let go = m.lookup.get("q1", Signal::Go).unwrap();
        match m.grid.cell(go) {
            Cell::Event(e) => assert!(e.is_signal),
            other => panic!("unexpected cell {other:?}"),
        }
    }

    #[test]
    fn test_same_track_pair_has_no_group() {
        let show = parse(
            r#"{
            "tracks": [{"id": "t1", "name": "T1"}],
            "blocks": [
                {"id": "q1", "type": "cue", "name": ""},
                {"id": "a", "type": "media", "track": "t1", "name": ""},
                {"id": "b", "type": "media", "track": "t1", "name": ""}
            ],
            "triggers": [
                {"source": {"block": "q1", "signal": "GO"},
                 "targets": [{"block": "a", "hook": "START"}]},
                {"source": {"block": "a", "signal": "END"},
                 "targets": [{"block": "b", "hook": "START"}]}
            ]
        }"#,
        );
        let mut m = materialize(&show);
        let set = build(&show, &mut m).unwrap();

        // The chain trigger contributes a next_row but no exclusive group.
        assert_eq!(set.groups.len(), 1);
        let chain = set.constraints.last().unwrap();
        assert_eq!(chain.kind, ConstraintKind::NextRow);

        // Same-track chaining is not a signal.
        let end = m.lookup.get("a", Signal::End).unwrap();
        match m.grid.cell(end) {
            Cell::Event(e) => assert!(!e.is_signal),
            other => panic!("unexpected cell {other:?}"),
        }
    }

    #[test]
    fn test_self_target_emits_nothing() {
        let show = parse(
            r#"{
            "tracks": [{"id": "t1", "name": "T1"}],
            "blocks": [
                {"id": "q1", "type": "cue", "name": ""},
                {"id": "w", "type": "light", "track": "t1", "name": ""}
            ],
            "triggers": [
                {"source": {"block": "q1", "signal": "GO"},
                 "targets": [{"block": "w", "hook": "START"}]},
                {"source": {"block": "w", "signal": "END"},
                 "targets": [{"block": "w", "hook": "END"}]}
            ]
        }"#,
        );
        let mut m = materialize(&show);
        let set = build(&show, &mut m).unwrap();
        // The cue's same_row only; the self-close adds nothing.
        assert_eq!(set.constraints.len(), 1);
        assert_eq!(set.groups.len(), 1);
    }

    #[test]
    fn test_mock_show_lowers_cleanly() {
        let show = generate(MockParams::default());
        let mut m = materialize(&show);
        let set = build(&show, &mut m).unwrap();
        assert!(!set.constraints.is_empty());
        assert!(!set.groups.is_empty());
    }
}

//! Wire-format tests: a show survives a JSON round trip and the interchange
//! defaults behave as documented (missing fields default, unknown ignored).

use showgraph::{BlockType, Show, Signal};

const SHOW_JSON: &str = r#"{
    "tracks": [
        {"id": "lights", "name": "Lights"},
        {"id": "media", "name": "Media"}
    ],
    "blocks": [
        {"id": "q1", "type": "cue", "name": "House Open"},
        {"id": "wash", "type": "light", "track": "lights", "name": "Warm Wash"},
        {"id": "preshow", "type": "media", "track": "media", "name": "Preshow Loop", "loop": true},
        {"id": "q2", "type": "cue", "name": "Act One"}
    ],
    "triggers": [
        {"source": {"block": "q1", "signal": "GO"},
         "targets": [{"block": "wash", "hook": "START"}, {"block": "preshow", "hook": "START"}]},
        {"source": {"block": "q2", "signal": "GO"},
         "targets": [{"block": "wash", "hook": "FADE_OUT"}, {"block": "preshow", "hook": "FADE_OUT"}]}
    ]
}"#;

#[test]
fn test_round_trip() {
    let show: Show = serde_json::from_str(SHOW_JSON).expect("parse show");
    let json = serde_json::to_string(&show).expect("serialize show");
    let back: Show = serde_json::from_str(&json).expect("reparse show");
    assert_eq!(show, back);
}

#[test]
fn test_fixture_validates() {
    let show: Show = serde_json::from_str(SHOW_JSON).unwrap();
    assert_eq!(show.validate(), Ok(()));
}

#[test]
fn test_parsed_fields() {
    let show: Show = serde_json::from_str(SHOW_JSON).unwrap();
    assert_eq!(show.tracks.len(), 2);
    assert_eq!(show.blocks.len(), 4);

    let preshow = show.blocks.iter().find(|b| b.id == "preshow").unwrap();
    assert_eq!(preshow.kind, BlockType::Media);
    assert!(preshow.looped);
    assert!(!preshow.has_defined_timing());

    let q1 = show.blocks.iter().find(|b| b.id == "q1").unwrap();
    assert!(q1.track.is_none());
    assert_eq!(q1.timeline_track(), showgraph::CUE_TRACK_ID);

    assert_eq!(show.triggers[0].source.signal, Signal::Go);
    assert_eq!(show.triggers[1].targets[1].hook, Signal::FadeOut);
}

#[test]
fn test_cue_serializes_without_track() {
    let show: Show = serde_json::from_str(SHOW_JSON).unwrap();
    let value = serde_json::to_value(&show).unwrap();
    let q1 = &value["blocks"][0];
    assert_eq!(q1["type"], "cue");
    assert!(q1.get("track").is_none());
    assert!(q1.get("loop").is_none());
}

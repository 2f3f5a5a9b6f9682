// Host-side tests for preset documents: round trips, legacy shapes, lenient
// decoding, the three-tier resolve and the save acknowledgement.

use glam::Vec3;
use pano_core::preset::parse_save_response;
use pano_core::{
    resolve, Adjustments, HotspotEdit, HotspotKind, KindTag, LocalSnapshot, PanoError,
    PresetDocument, Ray, ViewMode, ViewModePermission, Viewer, ViewerPreset,
};
use pretty_assertions::assert_eq;

const FILES: [&str; 4] = ["FINAL.png", "FINAL_B.png", "0 - Dome.png", "3 - Spot.png"];

fn edited_viewer() -> Viewer {
    let mut v = Viewer::with_seed(99);
    v.load_environment("sala", &FILES, None, None);
    v.toggle_debug();
    let sw = v
        .create_hotspot(KindTag::Switch, Ray::new(Vec3::ZERO, Vec3::NEG_Z))
        .unwrap();
    v.commit_lights(&sw, ["3 - Spot.png"]).unwrap();
    let portal = v
        .create_hotspot(KindTag::Switch, Ray::new(Vec3::ZERO, Vec3::X))
        .unwrap();
    v.edit_hotspot(&portal, HotspotEdit::Kind(KindTag::Portal))
        .unwrap();
    v.edit_hotspot(&portal, HotspotEdit::TargetEnvironment(Some("cozinha".into())))
        .unwrap();
    let swap = v
        .create_hotspot(KindTag::Switch, Ray::new(Vec3::ZERO, Vec3::Z))
        .unwrap();
    v.edit_hotspot(&swap, HotspotEdit::Kind(KindTag::Swap)).unwrap();
    v.edit_hotspot(
        &swap,
        HotspotEdit::TargetImages(vec!["FINAL.png".into(), "FINAL_B.png".into()]),
    )
    .unwrap();
    v.set_intensity("3 - Spot.png", 72.0);
    v.toggle_dimmable("0 - Dome.png");
    v.set_adjustments(Adjustments {
        temperature: 10.0,
        bloom: 25.0,
        ..Adjustments::default()
    });
    v.rotate_camera(120.0, -30.0, 800.0);
    v
}

#[test]
fn snapshot_round_trips_through_json() {
    let snap = edited_viewer().snapshot();
    let text = snap.to_json_pretty().unwrap();
    let back = ViewerPreset::from_json(&text).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn reloading_a_snapshot_restores_the_viewer() {
    let original = edited_viewer();
    let text = original.snapshot().to_json_pretty().unwrap();
    let doc = PresetDocument::from_json(&text).unwrap();
    let mut reloaded = Viewer::with_seed(1);
    reloaded.load_environment("sala", &FILES, None, Some(&doc));
    let expected = original.snapshot();
    let mut got = reloaded.snapshot();
    // the orbit is rebuilt from yaw and pitch
    assert!(got
        .camera
        .position
        .abs_diff_eq(expected.camera.position, 1e-4));
    got.camera = expected.camera;
    assert_eq!(got, expected);
}

#[test]
fn wire_names_are_camel_case() {
    let text = edited_viewer().snapshot().to_json_pretty().unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in [
        "values",
        "lightsState",
        "hotspots",
        "layers",
        "daylightTargets",
        "adjustments",
        "camera",
        "viewModePermission",
        "viewMode",
    ] {
        assert!(raw.get(key).is_some(), "missing {key}");
    }
    assert!(raw.get("showFinal").is_none());
    assert!(raw.get("portals").is_none());
    assert_eq!(raw["hotspots"][1]["targetEnvironment"], "cozinha");
}

#[test]
fn legacy_fields_are_migrated_on_read() {
    let text = r#"{
        "showFinal": true,
        "portals": [{"id": 1700000000000, "position": [10, 0, 0], "targetEnvironment": "cozinha"}],
        "hotspots": [{"id": "s1", "type": "swap", "position": [0, 0, -10], "targetImage": "FINAL_B.png"}],
        "lightsState": {
            "3 - Spot.png": {"nome": "Spot", "estado": false, "dimmerizavel": true, "valor": 30, "pontos": ["x"]}
        }
    }"#;
    let p = ViewerPreset::from_json(text).unwrap();
    assert_eq!(p.view_mode, ViewMode::Final);
    assert_eq!(p.hotspots.len(), 2);
    assert_eq!(
        p.hotspots[0].kind,
        HotspotKind::Swap {
            target_images: vec!["FINAL_B.png".into()]
        }
    );
    assert_eq!(p.hotspots[1].tag(), KindTag::Portal);
    assert_eq!(p.hotspots[1].id.as_str(), "1700000000000");
    let rec = &p.lights_state["3 - Spot.png"];
    assert_eq!(rec.display_name, "Spot");
    assert!(!rec.on);
    assert!(rec.dimmable);
    assert_eq!(rec.intensity, Some(30.0));

    let out = p.to_json_pretty().unwrap();
    assert!(!out.contains("showFinal"));
    assert!(!out.contains("targetImage\""));
    assert!(!out.contains("nome"));
}

#[test]
fn explicit_view_mode_wins_over_show_final() {
    let p = ViewerPreset::from_json(r#"{"showFinal": true, "viewMode": "lights"}"#).unwrap();
    assert_eq!(p.view_mode, ViewMode::Lights);
}

#[test]
fn malformed_fields_fall_back_one_by_one() {
    let text = r#"{
        "values": 5,
        "viewMode": "sideways",
        "layers": ["a.png", 3, "b.png"],
        "hotspots": [{"id": "ok", "position": [0, 0, -10]}, "garbage"],
        "adjustments": {"saturation": "80", "contrast": [1]},
        "camera": "nope"
    }"#;
    let p = ViewerPreset::from_json(text).unwrap();
    assert!(p.values.is_empty());
    assert_eq!(p.view_mode, ViewMode::Lights);
    assert_eq!(p.layers, vec!["a.png", "b.png"]);
    assert_eq!(p.hotspots.len(), 1);
    assert_eq!(p.adjustments.saturation, 80.0);
    assert_eq!(p.adjustments.contrast, 100.0);
    assert_eq!(p.camera, Default::default());
}

#[test]
fn non_object_preset_is_empty_and_bad_json_is_an_error() {
    assert_eq!(ViewerPreset::from_json("[1,2]").unwrap(), ViewerPreset::default());
    assert!(matches!(
        ViewerPreset::from_json("{"),
        Err(PanoError::Parse { what: "preset", .. })
    ));
}

#[test]
fn permission_pins_the_stored_mode() {
    let p = ViewerPreset::from_json(r#"{"viewModePermission":"lights_only","viewMode":"final"}"#)
        .unwrap();
    assert_eq!(p.view_mode_permission, ViewModePermission::LightsOnly);
    assert_eq!(p.view_mode, ViewMode::Lights);
}

#[test]
fn resolve_layers_defaults_local_then_remote() {
    let defaults = Viewer::defaults_for(&FILES);
    let local = LocalSnapshot {
        debug_mode: Some(true),
        adjustments: Some(Adjustments {
            brightness: 120.0,
            ..Adjustments::default()
        }),
        view_mode: Some(ViewMode::Final),
    };
    let only_local = resolve(defaults.clone(), Some(&local), None);
    assert!(only_local.debug_mode);
    assert_eq!(only_local.preset.view_mode, ViewMode::Final);
    assert_eq!(only_local.preset.adjustments.brightness, 120.0);

    let remote = PresetDocument::from_json(r#"{"viewMode":"lights","values":{"3 - Spot.png":10}}"#)
        .unwrap();
    let both = resolve(defaults.clone(), Some(&local), Some(&remote));
    assert_eq!(both.preset.view_mode, ViewMode::Lights);
    assert_eq!(both.preset.adjustments.brightness, 120.0);
    assert_eq!(both.preset.values.get("3 - Spot.png"), Some(&10.0));

    let none = resolve(defaults.clone(), None, None);
    assert!(!none.debug_mode);
    assert_eq!(none.preset, defaults);
}

#[test]
fn defaults_tier_matches_a_fresh_board() {
    let d = Viewer::defaults_for(&FILES);
    assert_eq!(d.values["FINAL.png"], 0.0);
    assert_eq!(d.values["3 - Spot.png"], 50.0);
    assert_eq!(d.values["__daylight"], 50.0);
    assert_eq!(d.daylight_targets, vec!["0 - Dome.png"]);
    assert_eq!(d.layers[0], "FINAL.png");
    assert!(d.hotspots.is_empty());
}

#[test]
fn local_snapshot_is_lenient() {
    assert_eq!(
        LocalSnapshot::from_json_or_default("not json"),
        LocalSnapshot::default()
    );
    let s = LocalSnapshot::from_json_or_default(r#"{"debugMode":"yes","viewMode":"final"}"#);
    assert_eq!(s.debug_mode, None);
    assert_eq!(s.view_mode, Some(ViewMode::Final));
    let text = s.to_json().unwrap();
    assert_eq!(text, r#"{"viewMode":"final"}"#);
}

#[test]
fn local_snapshot_feeds_the_next_load() {
    let mut v = Viewer::with_seed(3);
    v.load_environment("sala", &FILES, None, None);
    v.toggle_debug();
    v.toggle_view_mode();
    let local = v.local_snapshot();
    let mut next = Viewer::with_seed(4);
    next.load_environment("sala", &FILES, Some(&local), None);
    assert!(next.debug());
    assert_eq!(next.view_mode(), ViewMode::Final);
}

#[test]
fn save_ack_success_and_failures() {
    assert_eq!(
        parse_save_response(200, r#"{"ok":true,"path":"public/presets/sala.json"}"#).unwrap(),
        "public/presets/sala.json"
    );
    let err = parse_save_response(500, r#"{"ok":false,"error":"disk full"}"#).unwrap_err();
    assert_eq!(err.to_string(), "save failed: HTTP 500: disk full");
    let err = parse_save_response(200, r#"{"ok":false,"error":"denied"}"#).unwrap_err();
    assert_eq!(err.to_string(), "save failed: denied");
    assert!(matches!(
        parse_save_response(200, "<html>"),
        Err(PanoError::Save(_))
    ));
}

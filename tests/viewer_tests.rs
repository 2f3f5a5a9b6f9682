// Host-side tests for the viewer aggregate: view-mode gating, hotspot clicks,
// swap cycles, drags and polygon drawing.

use glam::{Vec2, Vec3};
use pano_core::gesture::{DragTarget, GestureCoordinator, Press, PRIMARY_BUTTON};
use pano_core::{
    ClickOutcome, HotspotEdit, HotspotId, HotspotKind, KindTag, LocalSnapshot, PanoError,
    PickHit, PresetDocument, Ray, ShapeTag, ViewMode, ViewModePermission, Viewer,
};

const FILES: [&str; 6] = [
    "FINAL.png",
    "FINAL_A.png",
    "FINAL_B.png",
    "FINAL_C.png",
    "0 - Dome.png",
    "3 - Spot.png",
];

fn viewer() -> Viewer {
    let mut v = Viewer::with_seed(42);
    v.load_environment("sala", &FILES, None, None);
    v
}

fn ray_towards(dir: Vec3) -> Ray {
    Ray::new(Vec3::ZERO, dir)
}

/// Creates a hotspot in debug mode and leaves debug mode on.
fn create(v: &mut Viewer, kind: KindTag, dir: Vec3) -> HotspotId {
    if !v.debug() {
        v.toggle_debug();
    }
    let id = v.create_hotspot(KindTag::Switch, ray_towards(dir)).unwrap();
    if kind != KindTag::Switch {
        v.edit_hotspot(&id, HotspotEdit::Kind(kind)).unwrap();
    }
    id
}

#[test]
fn editing_requires_debug_mode() {
    let mut v = viewer();
    assert!(matches!(
        v.create_hotspot(KindTag::Switch, ray_towards(Vec3::NEG_Z)),
        Err(PanoError::NotEditing)
    ));
    v.toggle_debug();
    let id = v.create_hotspot(KindTag::Switch, ray_towards(Vec3::NEG_Z)).unwrap();
    let pos = v.hotspots().get(&id).unwrap().position;
    assert!((pos.length() - 10.0).abs() < 1e-3);
    assert_eq!(v.selected(), Some(&id));
}

#[test]
fn leaving_debug_stops_editing() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.edit_hotspot(&id, HotspotEdit::Shape(ShapeTag::Polygon)).unwrap();
    assert!(v.toggle_drawing().unwrap());
    v.toggle_debug();
    assert!(!v.drawing());
    assert!(v.selected().is_none());
}

#[test]
fn view_toggle_is_gated_by_permission_outside_debug() {
    let doc =
        PresetDocument::from_json(r#"{"viewModePermission":"final_only","viewMode":"lights"}"#)
            .unwrap();
    let mut v = Viewer::with_seed(1);
    v.load_environment("sala", &FILES, None, Some(&doc));
    assert_eq!(v.view_mode(), ViewMode::Final);
    assert!(!v.toggle_view_mode());
    assert_eq!(v.view_mode(), ViewMode::Final);
    v.toggle_debug();
    assert!(v.toggle_view_mode());
    assert_eq!(v.view_mode(), ViewMode::Lights);
}

#[test]
fn switch_click_toggles_lights_only_in_lights_mode() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.commit_lights(&id, ["3 - Spot.png"]).unwrap();
    v.toggle_debug();

    let out = v.click_hotspot(&id).unwrap();
    assert_eq!(out, ClickOutcome::ToggledLights(vec!["3 - Spot.png".into()]));
    assert!(!v.board().light("3 - Spot.png").unwrap().on);

    assert!(v.toggle_view_mode());
    assert_eq!(v.click_hotspot(&id).unwrap(), ClickOutcome::Nothing);
    assert!(!v.board().light("3 - Spot.png").unwrap().on);
}

#[test]
fn click_in_debug_selects_instead_of_acting() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.commit_lights(&id, ["3 - Spot.png"]).unwrap();
    assert_eq!(v.click_hotspot(&id).unwrap(), ClickOutcome::Selected(id.clone()));
    assert!(v.board().light("3 - Spot.png").unwrap().on);
}

#[test]
fn portal_click_navigates_in_any_mode() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Portal, Vec3::X);
    v.toggle_debug();
    assert_eq!(v.click_hotspot(&id).unwrap(), ClickOutcome::Nothing);
    v.toggle_debug();
    v.edit_hotspot(&id, HotspotEdit::TargetEnvironment(Some("cozinha".into())))
        .unwrap();
    v.toggle_debug();
    assert_eq!(
        v.click_hotspot(&id).unwrap(),
        ClickOutcome::Navigate("cozinha".into())
    );
    v.toggle_view_mode();
    assert_eq!(
        v.click_hotspot(&id).unwrap(),
        ClickOutcome::Navigate("cozinha".into())
    );
}

#[test]
fn swap_cycles_through_targets_and_wraps() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Swap, Vec3::X);
    v.edit_hotspot(
        &id,
        HotspotEdit::TargetImages(vec![
            "FINAL_A.png".into(),
            "FINAL_B.png".into(),
            "FINAL_C.png".into(),
        ]),
    )
    .unwrap();
    v.toggle_debug();

    assert_eq!(v.click_hotspot(&id).unwrap(), ClickOutcome::Nothing);
    assert!(v.toggle_view_mode());

    let mut seen = Vec::new();
    for _ in 0..4 {
        match v.click_hotspot(&id).unwrap() {
            ClickOutcome::Swapped(f) => seen.push(f),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(
        seen,
        vec!["FINAL_A.png", "FINAL_B.png", "FINAL_C.png", "FINAL_A.png"]
    );
    assert_eq!(v.board().intensity("FINAL_A.png"), 100.0);
    assert_eq!(v.board().intensity("FINAL_B.png"), 0.0);
    assert_eq!(v.board().intensity("FINAL_C.png"), 0.0);
    let shown = v
        .composite()
        .into_iter()
        .find(|d| d.file == "FINAL_A.png")
        .unwrap();
    assert_eq!(shown.opacity, 1.0);
}

#[test]
fn picking_finds_the_marker_under_the_ray() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    assert_eq!(v.pick(ray_towards(Vec3::NEG_Z)), Some(PickHit::Hotspot(id)));
    assert_eq!(v.pick(ray_towards(Vec3::Z)), None);
}

#[test]
fn dragging_moves_a_hotspot_along_the_sphere() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    assert!(v.pointer_down(&PickHit::Hotspot(id.clone())));
    assert!(v.is_dragging());
    assert!(!v.pointer_move(ray_towards(Vec3::X), 0));
    assert!(v.pointer_move(ray_towards(Vec3::X), PRIMARY_BUTTON));
    let pos = v.hotspots().get(&id).unwrap().position;
    assert!(pos.abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-3));
    let end = v.pointer_up().unwrap();
    assert!(end.moved);
    assert_eq!(end.target, DragTarget::Hotspot(id));
    assert!(v.pointer_up().is_none());
}

#[test]
fn no_drag_outside_debug_and_delete_cancels_drag() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.toggle_debug();
    assert!(!v.pointer_down(&PickHit::Hotspot(id.clone())));
    v.toggle_debug();
    assert!(v.pointer_down(&PickHit::Hotspot(id.clone())));
    v.delete_hotspot(&id).unwrap();
    assert!(!v.is_dragging());
    assert!(!v.pointer_move(ray_towards(Vec3::X), PRIMARY_BUTTON));
}

#[test]
fn coordinator_refuses_nested_or_non_edit_drags() {
    let mut g = GestureCoordinator::new();
    let target = DragTarget::Hotspot(HotspotId::new("a"));
    assert!(!g.begin(target.clone(), false));
    assert!(g.begin(target.clone(), true));
    assert!(!g.begin(target, true));
    let end = g.end().unwrap();
    assert!(!end.moved);
    assert!(g.end().is_none());
}

#[test]
fn drawing_appends_vertices_on_background_clicks() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    assert!(matches!(
        v.toggle_drawing(),
        Err(PanoError::WrongKind { expected: "polygon", .. })
    ));
    v.edit_hotspot(&id, HotspotEdit::Shape(ShapeTag::Polygon)).unwrap();
    assert!(v.toggle_drawing().unwrap());
    for (i, dir) in [
        Vec3::new(-0.1, -0.1, -1.0),
        Vec3::new(0.1, -0.1, -1.0),
        Vec3::new(0.0, 0.1, -1.0),
    ]
    .into_iter()
    .enumerate()
    {
        assert_eq!(
            v.click_background(ray_towards(dir)).unwrap(),
            ClickOutcome::VertexAdded {
                hotspot: id.clone(),
                count: i + 1
            }
        );
    }
    assert!(!v.toggle_drawing().unwrap());
    assert_eq!(
        v.click_background(ray_towards(Vec3::NEG_Z)).unwrap(),
        ClickOutcome::Nothing
    );
    let visual = v
        .hotspot_visuals()
        .into_iter()
        .find(|h| h.id == id)
        .unwrap();
    assert_eq!(visual.handles.len(), 3);
    assert!(matches!(
        v.pick(ray_towards(Vec3::new(-0.1, -0.1, -1.0))),
        Some(PickHit::Vertex { index: 0, .. })
    ));
}

#[test]
fn drawing_claims_clicks_over_the_polygon_fill() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.edit_hotspot(&id, HotspotEdit::Shape(ShapeTag::Polygon)).unwrap();
    assert!(v.toggle_drawing().unwrap());
    for dir in [
        Vec3::new(-0.1, -0.1, -1.0),
        Vec3::new(0.1, -0.1, -1.0),
        Vec3::new(0.0, 0.1, -1.0),
    ] {
        v.click(None, ray_towards(dir)).unwrap();
    }
    let anchor = v.hotspots().get(&id).unwrap().position;

    let inside = ray_towards(Vec3::NEG_Z);
    let hit = v.pick(inside);
    assert_eq!(hit, Some(PickHit::Hotspot(id.clone())));
    assert!(!v.can_drag());
    assert!(!v.pointer_down(&PickHit::Hotspot(id.clone())));
    assert!(!v.pointer_move(ray_towards(Vec3::X), PRIMARY_BUTTON));
    assert_eq!(
        v.click(hit.as_ref(), inside).unwrap(),
        ClickOutcome::VertexAdded {
            hotspot: id.clone(),
            count: 4
        }
    );
    assert_eq!(v.hotspots().get(&id).unwrap().position, anchor);
}

#[test]
fn a_press_inside_the_slop_selects_without_moving() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.select(None).unwrap();
    let anchor = v.hotspots().get(&id).unwrap().position;

    let ray = ray_towards(Vec3::NEG_Z);
    let mut press = Press::new(Vec2::new(100.0, 100.0), v.pick(ray), !v.can_drag());
    press.advance(Vec2::new(102.0, 101.0));
    assert!(press.is_click());
    assert!(!press.wants_drag());
    assert!(!v.is_dragging());
    assert_eq!(
        v.click(press.hit.as_ref(), ray).unwrap(),
        ClickOutcome::Selected(id.clone())
    );
    assert_eq!(v.hotspots().get(&id).unwrap().position, anchor);

    press.advance(Vec2::new(110.0, 100.0));
    assert!(press.wants_drag());
    let hit = press.hit.clone().unwrap();
    press.dragging = v.pointer_down(&hit);
    assert!(press.dragging);
    assert!(!press.wants_drag());
}

#[test]
fn orbit_presses_never_drag() {
    let v = viewer();
    let mut press = Press::new(Vec2::ZERO, v.pick(ray_towards(Vec3::NEG_Z)), !v.can_drag());
    assert!(press.orbit);
    press.advance(Vec2::new(50.0, 0.0));
    assert!(!press.wants_drag());
    let mut empty = Press::new(Vec2::ZERO, None, false);
    empty.advance(Vec2::new(50.0, 0.0));
    assert!(!empty.wants_drag());
}

#[test]
fn local_snapshot_applies_debug_adjustments_and_view_mode() {
    let mut v = Viewer::with_seed(3);
    let local = LocalSnapshot::from_json_or_default(
        r#"{"debugMode":true,"viewMode":"final","adjustments":{"saturation":150}}"#,
    );
    v.apply_local(&local);
    assert!(v.debug());
    assert_eq!(v.view_mode(), ViewMode::Final);
    assert_eq!(v.adjustments().saturation, 150.0);
}

#[test]
fn switch_links_ignore_final_and_unknown_files() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.commit_lights(&id, ["3 - Spot.png", "FINAL.png", "missing.png"])
        .unwrap();
    let Some(HotspotKind::Switch { lights, .. }) = v.hotspots().get(&id).map(|h| &h.kind) else {
        panic!("not a switch");
    };
    assert_eq!(
        lights.iter().cloned().collect::<Vec<String>>(),
        vec!["3 - Spot.png".to_string()]
    );
    assert!(v.hotspots().linked_hotspots("FINAL.png").is_empty());
}

#[test]
fn drawing_without_selection_is_a_no_op() {
    let mut v = viewer();
    v.toggle_debug();
    assert!(!v.toggle_drawing().unwrap());
}

#[test]
fn visuals_hide_markers_outside_debug() {
    let mut v = viewer();
    create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    assert!(v.hotspot_visuals()[0].rgba.w > 0.0);
    v.toggle_debug();
    let vis = &v.hotspot_visuals()[0];
    assert_eq!(vis.rgba.w, 0.0);
    assert!(vis.interactive);
    assert!(!vis.selected);
}

#[test]
fn snapshot_derives_light_links_from_switches() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.commit_lights(&id, ["3 - Spot.png"]).unwrap();
    let snap = v.snapshot();
    assert_eq!(snap.lights_state["3 - Spot.png"].linked_hotspot_ids, vec![id]);
    assert!(snap.lights_state["0 - Dome.png"].linked_hotspot_ids.is_empty());
    assert!(!snap.lights_state.contains_key("FINAL.png"));
    assert_eq!(snap.daylight_targets, vec!["0 - Dome.png"]);
}

#[test]
fn editor_panel_changes_reach_the_saved_preset() {
    let mut v = viewer();
    let id = create(&mut v, KindTag::Switch, Vec3::NEG_Z);
    v.edit_hotspot(&id, HotspotEdit::Shape(ShapeTag::Polygon)).unwrap();
    assert!(v.toggle_drawing().unwrap());
    for dir in [Vec3::new(-0.1, 0.0, -1.0), Vec3::new(0.1, 0.0, -1.0)] {
        v.click_background(ray_towards(dir)).unwrap();
    }
    v.clear_points(&id).unwrap();
    v.edit_hotspot(&id, HotspotEdit::Color("#ff0000".into())).unwrap();
    v.set_view_permission(ViewModePermission::FinalOnly);
    let first = v.layers()[0].clone();
    assert!(v.reorder_layers(0, 3));

    let saved = v.snapshot();
    let h = saved.hotspots.iter().find(|h| h.id == id).unwrap();
    assert_eq!(h.color, "#ff0000");
    assert_eq!(h.polygon_points().map(<[Vec3]>::len), Some(0));
    assert_eq!(saved.layers[3], first);
    assert_eq!(saved.view_mode_permission, ViewModePermission::FinalOnly);
    assert_eq!(saved.view_mode, ViewMode::Final);
}

#[test]
fn reorder_layers_moves_one_entry() {
    let mut v = viewer();
    let before = v.layers().to_vec();
    assert!(v.reorder_layers(0, 2));
    assert_eq!(v.layers()[2], before[0]);
    assert!(!v.reorder_layers(0, 99));
}

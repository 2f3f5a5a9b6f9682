// Host-side tests for the hotspot collection: links, editing, delete and duplicate.

use glam::Vec3;
use pano_core::constants::DUPLICATE_OFFSET;
use pano_core::{
    Hotspot, HotspotEdit, HotspotId, HotspotKind, HotspotSet, KindTag, PanoError, Shape, ShapeTag,
};

fn switch_at(set: &mut HotspotSet, x: f32) -> HotspotId {
    set.create_at(KindTag::Switch, Vec3::new(x, 0.0, -10.0))
}

#[test]
fn seeded_sets_generate_the_same_ids() {
    let mut a = HotspotSet::with_seed(7);
    let mut b = HotspotSet::with_seed(7);
    let ids_a: Vec<_> = (0..3).map(|i| switch_at(&mut a, i as f32)).collect();
    let ids_b: Vec<_> = (0..3).map(|i| switch_at(&mut b, i as f32)).collect();
    assert_eq!(ids_a, ids_b);
    assert_ne!(ids_a[0], ids_a[1]);
}

#[test]
fn commit_lights_updates_both_link_directions() {
    let mut set = HotspotSet::with_seed(1);
    let id = switch_at(&mut set, 0.0);
    set.commit_lights(&id, ["1 - A.png", "2 - B.png"]).unwrap();
    assert_eq!(set.linked_hotspots("1 - A.png"), vec![id.clone()]);
    assert_eq!(set.linked_hotspots("2 - B.png"), vec![id.clone()]);

    set.commit_lights(&id, ["2 - B.png"]).unwrap();
    assert!(set.linked_hotspots("1 - A.png").is_empty());
    let lights: Vec<&str> = set.get(&id).unwrap().lights().collect();
    assert_eq!(lights, vec!["2 - B.png"]);
}

#[test]
fn commit_lights_rejects_non_switches() {
    let mut set = HotspotSet::with_seed(1);
    let id = set.create_at(KindTag::Portal, Vec3::NEG_Z * 10.0);
    let err = set.commit_lights(&id, ["1 - A.png"]).unwrap_err();
    assert!(matches!(err, PanoError::WrongKind { expected: "switch", .. }));
}

#[test]
fn retyping_a_switch_drops_its_links() {
    let mut set = HotspotSet::with_seed(2);
    let id = switch_at(&mut set, 0.0);
    set.commit_lights(&id, ["1 - A.png"]).unwrap();
    set.apply(&id, HotspotEdit::Kind(KindTag::Swap)).unwrap();
    assert!(set.linked_hotspots("1 - A.png").is_empty());
    assert!(set.link_index().is_empty());
}

#[test]
fn delete_removes_hotspot_and_links() {
    let mut set = HotspotSet::with_seed(3);
    let keep = switch_at(&mut set, 0.0);
    let gone = switch_at(&mut set, 1.0);
    set.commit_lights(&keep, ["1 - A.png"]).unwrap();
    set.commit_lights(&gone, ["1 - A.png"]).unwrap();
    let removed = set.delete(&gone).unwrap();
    assert_eq!(removed.id, gone);
    assert_eq!(set.len(), 1);
    assert_eq!(set.linked_hotspots("1 - A.png"), vec![keep]);
    assert!(matches!(
        set.delete(&gone),
        Err(PanoError::UnknownHotspot(_))
    ));
}

#[test]
fn duplicate_offsets_and_shares_links() {
    let mut set = HotspotSet::with_seed(4);
    let id = switch_at(&mut set, 0.0);
    set.commit_lights(&id, ["1 - A.png"]).unwrap();
    let copy = set.duplicate(&id).unwrap();
    assert_ne!(copy, id);
    let original = set.get(&id).unwrap().position;
    let moved = set.get(&copy).unwrap().position;
    assert_eq!(
        moved - original,
        Vec3::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET, 0.0)
    );
    assert_eq!(set.linked_hotspots("1 - A.png").len(), 2);
}

#[test]
fn replace_all_reassigns_duplicate_ids() {
    let mut set = HotspotSet::with_seed(5);
    let dup = HotspotId::new("same");
    let kind = HotspotKind::with_defaults(KindTag::Switch);
    set.replace_all(vec![
        Hotspot::new(dup.clone(), Vec3::X, kind.clone()),
        Hotspot::new(dup.clone(), Vec3::Y, kind),
    ]);
    let ids: Vec<&HotspotId> = set.iter().map(|h| &h.id).collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], &dup);
    assert_ne!(ids[1], &dup);
}

#[test]
fn shape_edits_are_clamped_and_kind_checked() {
    let mut set = HotspotSet::with_seed(6);
    let id = switch_at(&mut set, 0.0);
    set.apply(&id, HotspotEdit::Size(10.0)).unwrap();
    assert_eq!(
        set.get(&id).unwrap().kind,
        HotspotKind::Switch {
            shape: Shape::Sphere { size: 2.0 },
            lights: Default::default(),
        }
    );
    assert!(set.apply(&id, HotspotEdit::Width(2.0)).is_err());
    set.apply(&id, HotspotEdit::Shape(ShapeTag::Box)).unwrap();
    set.apply(&id, HotspotEdit::RotationDeg(270.0)).unwrap();
    set.apply(&id, HotspotEdit::Depth(-1.0)).unwrap();
    match &set.get(&id).unwrap().kind {
        HotspotKind::Switch {
            shape:
                Shape::Box {
                    rotation_deg,
                    depth,
                    ..
                },
            ..
        } => {
            assert_eq!(*rotation_deg, 180.0);
            assert_eq!(*depth, 0.1);
        }
        other => panic!("expected a box, got {other:?}"),
    }
    assert!(set.apply(&id, HotspotEdit::Label("x".into())).is_err());
}

#[test]
fn polygon_vertices_can_be_appended_moved_and_cleared() {
    let mut set = HotspotSet::with_seed(8);
    let id = switch_at(&mut set, 0.0);
    assert!(set.append_vertex(&id, Vec3::X).is_err());
    set.apply(&id, HotspotEdit::Shape(ShapeTag::Polygon)).unwrap();
    assert_eq!(set.append_vertex(&id, Vec3::X).unwrap(), 1);
    assert_eq!(set.append_vertex(&id, Vec3::Y).unwrap(), 2);
    set.move_vertex(&id, 1, Vec3::Z).unwrap();
    assert_eq!(set.get(&id).unwrap().polygon_points(), Some(&[Vec3::X, Vec3::Z][..]));
    assert!(matches!(
        set.move_vertex(&id, 5, Vec3::Z),
        Err(PanoError::VertexOutOfRange { index: 5, len: 2, .. })
    ));
    set.clear_points(&id).unwrap();
    assert_eq!(set.get(&id).unwrap().polygon_points(), Some(&[][..]));
    assert_eq!(set.polygons().count(), 1);
}

#[test]
fn portal_text_prefers_custom_label_then_target() {
    let mut set = HotspotSet::with_seed(9);
    let id = set.create_at(KindTag::Portal, Vec3::NEG_Z * 10.0);
    assert_eq!(
        set.get(&id).unwrap().portal_display_text().as_deref(),
        Some("Sem destino")
    );
    set.apply(&id, HotspotEdit::TargetEnvironment(Some("cozinha".into())))
        .unwrap();
    assert_eq!(
        set.get(&id).unwrap().portal_display_text().as_deref(),
        Some("cozinha")
    );
    set.apply(&id, HotspotEdit::Label("Ir para a cozinha".into()))
        .unwrap();
    assert_eq!(
        set.get(&id).unwrap().portal_display_text().as_deref(),
        Some("Ir para a cozinha")
    );
}

#[test]
fn color_history_keeps_recent_unique_colors() {
    let mut set = HotspotSet::with_seed(10);
    let id = switch_at(&mut set, 0.0);
    set.apply(&id, HotspotEdit::Color("#123456".into())).unwrap();
    set.apply(&id, HotspotEdit::Color("#ffffff".into())).unwrap();
    assert_eq!(set.color_history()[0], "#123456");
    assert_eq!(
        set.color_history()
            .iter()
            .filter(|c| c.as_str() == "#ffffff")
            .count(),
        1
    );
}

#[test]
fn swap_targets_are_deduplicated_and_checked_against_files() {
    let mut set = HotspotSet::with_seed(11);
    let id = set.create_at(KindTag::Swap, Vec3::NEG_Z * 10.0);
    set.apply(
        &id,
        HotspotEdit::TargetImages(vec![
            "FINAL_A.png".into(),
            "FINAL_A.png".into(),
            "".into(),
            "FINAL_X.png".into(),
        ]),
    )
    .unwrap();
    let known = vec!["FINAL_A.png".to_string()];
    let dangling = set.dangling_swap_targets(&known);
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].1, "FINAL_X.png");
}

// Host-side tests for sphere geometry, polygon triangulation and marker meshes.

use glam::{Vec2, Vec3};
use pano_core::geometry::{project_to_sphere, ray_sphere, uv_sphere};
use pano_core::polygon::{check_fan, fan_triangles, triangulate, FanCheck};
use pano_core::visuals::{handle_triangles, marker_triangles, parse_hex_color};
use pano_core::{panorama_sphere, Marker, Ray, Viewer};

#[test]
fn ray_sphere_hits_from_inside_and_misses_behind() {
    let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::ZERO, 10.0).unwrap();
    assert!((t - 10.0).abs() < 1e-5);
    let t = ray_sphere(Vec3::ZERO, Vec3::Z * 3.0, Vec3::new(0.0, 0.0, 5.0), 1.0).unwrap();
    assert!((t - 4.0).abs() < 1e-5);
    assert!(ray_sphere(Vec3::ZERO, Vec3::NEG_Z, Vec3::new(0.0, 0.0, 5.0), 1.0).is_none());
}

#[test]
fn projection_always_lands_on_the_sphere() {
    let p = project_to_sphere(Ray::new(Vec3::new(0.0, 0.0, 0.01), Vec3::X), 10.0);
    assert!((p.length() - 10.0).abs() < 1e-3);
    let outside = project_to_sphere(Ray::new(Vec3::new(0.0, 50.0, 0.0), Vec3::Y), 10.0);
    assert!(outside.abs_diff_eq(Vec3::new(0.0, 10.0, 0.0), 1e-4));
}

#[test]
fn uv_sphere_counts_and_poles() {
    let m = uv_sphere(1.0, 8, 6);
    assert_eq!(m.positions.len(), 9 * 7);
    assert_eq!(m.uvs.len(), m.positions.len());
    assert_eq!(m.indices.len(), 3 * 8 * (2 * 6 - 2));
    assert!(m.positions[0].abs_diff_eq(Vec3::Y, 1e-6));
    assert_eq!(m.uvs[0], Vec2::ZERO);
    assert!(m.positions.last().unwrap().abs_diff_eq(Vec3::NEG_Y, 1e-6));
    assert!(m.indices.iter().all(|&i| (i as usize) < m.positions.len()));
}

#[test]
fn panorama_sphere_is_mirrored_on_x() {
    let pano = panorama_sphere();
    let plain = uv_sphere(10.0, 64, 64);
    assert_eq!(pano.positions.len(), plain.positions.len());
    let i = 65 * 32 + 5;
    assert_eq!(pano.positions[i].x, -plain.positions[i].x);
    assert_eq!(pano.positions[i].y, plain.positions[i].y);
    assert!(pano
        .positions
        .iter()
        .all(|p| (p.length() - 10.0).abs() < 1e-3));
}

/// Flat outline a little in front of the camera, x/y in the tangent plane.
fn outline(xy: &[(f32, f32)]) -> Vec<Vec3> {
    xy.iter().map(|&(x, y)| Vec3::new(x, y, -10.0)).collect()
}

#[test]
fn fan_check_classifies_outlines() {
    let square = outline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    assert_eq!(check_fan(&square), FanCheck::Valid);
    assert_eq!(check_fan(&square[..2]), FanCheck::TooFewPoints);
    let line = outline(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    assert_eq!(check_fan(&line), FanCheck::Degenerate);
    let bowtie = outline(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 1.0)]);
    assert_eq!(check_fan(&bowtie), FanCheck::SelfIntersecting);
    let u_shape = outline(&[
        (0.0, 0.0),
        (3.0, 0.0),
        (3.0, 3.0),
        (2.0, 3.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 3.0),
        (0.0, 3.0),
    ]);
    assert_eq!(check_fan(&u_shape), FanCheck::NotStarFromFirst);
}

#[test]
fn closing_duplicate_vertex_is_ignored() {
    let closed = outline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
    assert_eq!(check_fan(&closed), FanCheck::Valid);
    assert_eq!(triangulate(&closed).len(), 2);
}

#[test]
fn triangulation_covers_every_outline_vertex() {
    assert_eq!(fan_triangles(2), Vec::<[usize; 3]>::new());
    assert_eq!(fan_triangles(4), vec![[0, 1, 2], [0, 2, 3]]);
    let u_shape = outline(&[
        (0.0, 0.0),
        (3.0, 0.0),
        (3.0, 3.0),
        (2.0, 3.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 3.0),
        (0.0, 3.0),
    ]);
    let tris = triangulate(&u_shape);
    assert_eq!(tris.len(), u_shape.len() - 2);
    assert!(tris.iter().flatten().all(|&i| i < u_shape.len()));
    assert_ne!(tris, fan_triangles(u_shape.len()));
}

#[test]
fn hex_colors_parse_or_fall_back_to_white() {
    assert_eq!(parse_hex_color("#ff0000"), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(parse_hex_color("#0f0"), Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(parse_hex_color("blue"), Vec3::ONE);
}

#[test]
fn marker_meshes_match_their_shape() {
    let mut v = Viewer::with_seed(5);
    v.load_environment("sala", &["1 - A.png"], None, None);
    v.toggle_debug();
    let sphere = v
        .create_hotspot(pano_core::KindTag::Switch, Ray::new(Vec3::ZERO, Vec3::NEG_Z))
        .unwrap();
    let boxed = v
        .create_hotspot(pano_core::KindTag::Switch, Ray::new(Vec3::ZERO, Vec3::X))
        .unwrap();
    v.edit_hotspot(&boxed, pano_core::HotspotEdit::Shape(pano_core::ShapeTag::Box))
        .unwrap();

    let visuals = v.hotspot_visuals();
    let s = visuals.iter().find(|h| h.id == sphere).unwrap();
    assert!(matches!(s.marker, Marker::Sphere { .. }));
    let tris = marker_triangles(s);
    assert_eq!(tris.len(), 3 * 16 * (2 * 10 - 2));
    assert!(tris.iter().all(|p| p.distance(s.position) < 0.2 + 1e-4));

    let b = visuals.iter().find(|h| h.id == boxed).unwrap();
    let tris = marker_triangles(b);
    assert_eq!(tris.len(), 36);
    assert!(handle_triangles(b).is_empty());
}

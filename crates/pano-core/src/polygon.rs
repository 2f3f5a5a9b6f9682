//! Polygon hotspot fill triangulation.
//!
//! The fill is a fan from vertex 0, which is only correct for polygons that
//! are star-shaped from their first vertex. `check_fan` classifies a vertex
//! list so the editor can warn, and `triangulate` switches to ear clipping
//! for simple polygons the fan would get wrong.

use earcutr::earcut;
use glam::{Vec2, Vec3};

const AREA_EPS: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanCheck {
    Valid,
    TooFewPoints,
    /// Collinear or coincident vertices; zero area.
    Degenerate,
    SelfIntersecting,
    /// Simple, but some fan triangle folds back over the others.
    NotStarFromFirst,
}

impl FanCheck {
    pub fn is_valid(self) -> bool {
        self == FanCheck::Valid
    }
}

/// Triangle index list for a fan rooted at vertex 0.
pub fn fan_triangles(len: usize) -> Vec<[usize; 3]> {
    if len < 3 {
        return Vec::new();
    }
    (1..len - 1).map(|i| [0, i, i + 1]).collect()
}

fn drop_closing_duplicate(points: &[Vec3]) -> &[Vec3] {
    match points {
        [first, .., last] if points.len() > 3 && first.abs_diff_eq(*last, 1e-6) => {
            &points[..points.len() - 1]
        }
        _ => points,
    }
}

/// Project onto the plane tangent to the sphere at the centroid direction.
fn tangent_plane(points: &[Vec3]) -> Vec<Vec2> {
    let centroid = points.iter().copied().sum::<Vec3>() / points.len() as f32;
    let n = centroid.try_normalize().unwrap_or(Vec3::NEG_Z);
    let east = Vec3::Y
        .cross(n)
        .try_normalize()
        .unwrap_or_else(|| Vec3::X.cross(n).normalize_or_zero());
    let north = n.cross(east);
    points
        .iter()
        .map(|p| {
            let v = *p - centroid;
            Vec2::new(v.dot(east), v.dot(north))
        })
        .collect()
}

#[inline]
fn cross2(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

fn signed_area(poly: &[Vec2]) -> f32 {
    let n = poly.len();
    (0..n)
        .map(|i| poly[i].perp_dot(poly[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn segments_cross(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let d1 = cross2(b0, b1, a0);
    let d2 = cross2(b0, b1, a1);
    let d3 = cross2(a0, a1, b0);
    let d4 = cross2(a0, a1, b1);
    ((d1 > AREA_EPS && d2 < -AREA_EPS) || (d1 < -AREA_EPS && d2 > AREA_EPS))
        && ((d3 > AREA_EPS && d4 < -AREA_EPS) || (d3 < -AREA_EPS && d4 > AREA_EPS))
}

fn is_self_intersecting(poly: &[Vec2]) -> bool {
    let n = poly.len();
    for i in 0..n {
        let (a0, a1) = (poly[i], poly[(i + 1) % n]);
        for j in i + 1..n {
            // adjacent edges share a vertex
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (b0, b1) = (poly[j], poly[(j + 1) % n]);
            if segments_cross(a0, a1, b0, b1) {
                return true;
            }
        }
    }
    false
}

pub fn check_fan(points: &[Vec3]) -> FanCheck {
    let points = drop_closing_duplicate(points);
    if points.len() < 3 {
        return FanCheck::TooFewPoints;
    }
    let poly = tangent_plane(points);
    let total = signed_area(&poly);
    let scale = poly.iter().map(|p| p.length_squared()).fold(0.0, f32::max);
    if total.abs() <= AREA_EPS * scale.max(1.0) {
        return FanCheck::Degenerate;
    }
    if is_self_intersecting(&poly) {
        return FanCheck::SelfIntersecting;
    }
    let sign = total.signum();
    let folds = fan_triangles(poly.len())
        .iter()
        .any(|[a, b, c]| cross2(poly[*a], poly[*b], poly[*c]) * sign < -AREA_EPS);
    if folds {
        FanCheck::NotStarFromFirst
    } else {
        FanCheck::Valid
    }
}

/// Triangles (indices into `points`) covering the polygon fill.
pub fn triangulate(points: &[Vec3]) -> Vec<[usize; 3]> {
    let ring = drop_closing_duplicate(points);
    match check_fan(points) {
        FanCheck::TooFewPoints => Vec::new(),
        FanCheck::Valid | FanCheck::Degenerate => fan_triangles(ring.len()),
        FanCheck::SelfIntersecting => {
            log::warn!(
                "[polygon] self-intersecting outline ({} points), fill will overlap",
                ring.len()
            );
            fan_triangles(ring.len())
        }
        FanCheck::NotStarFromFirst => {
            let coords: Vec<f64> = tangent_plane(ring)
                .iter()
                .flat_map(|p| [p.x as f64, p.y as f64])
                .collect();
            match earcut(&coords, &[], 2) {
                Ok(ix) if ix.len() >= 3 => ix
                    .chunks_exact(3)
                    .map(|t| [t[0], t[1], t[2]])
                    .collect(),
                Ok(_) | Err(_) => {
                    log::warn!("[polygon] ear clipping failed, using fan");
                    fan_triangles(ring.len())
                }
            }
        }
    }
}

/// Flat triangle list in world space.
pub fn triangulate_world(points: &[Vec3]) -> Vec<Vec3> {
    triangulate(points)
        .into_iter()
        .flat_map(|[a, b, c]| [points[a], points[b], points[c]])
        .collect()
}

//! Per-frame marker descriptions and pointer picking against them.

use crate::constants::{
    DEBUG_PORTAL_COLOR, DEBUG_PORTAL_HIT_ALPHA, DEBUG_SWITCH_ALPHA, DEBUG_SWITCH_COLOR,
    DEFAULT_SPHERE_SIZE, PORTAL_HIT_RADIUS, SELECTED_COLOR, VERTEX_HANDLE_SIZE,
};
use crate::geometry::{ray_sphere, uv_sphere, Ray};
use crate::hotspot::{Hotspot, HotspotId, HotspotKind, KindTag, Shape};
use crate::polygon;
use crate::view_mode::ViewModeState;
use glam::{Quat, Vec3, Vec4};
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    Sphere { radius: f32 },
    /// Faces the sphere centre; rotated about the view axis.
    Box { half_extents: Vec3, rotation_deg: f32 },
    /// Flat triangle list in world space.
    Polygon { triangles: Vec<Vec3>, outline: Vec<Vec3> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotspotVisual {
    pub id: HotspotId,
    pub kind: KindTag,
    pub position: Vec3,
    pub marker: Marker,
    /// Straight (non-premultiplied) RGBA of the hit marker.
    pub rgba: Vec4,
    /// Portal icon colour and label; `None` for other kinds.
    pub icon: Option<PortalIcon>,
    pub interactive: bool,
    pub selected: bool,
    /// Draggable vertex handles (selected polygon in edit mode).
    pub handles: SmallVec<[Vec3; 8]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortalIcon {
    pub name: String,
    pub text: String,
    pub rgba: Vec4,
    pub size_px: f32,
}

/// `#rgb` / `#rrggbb` to linear-ish RGB in [0, 1]; white when unparsable.
pub fn parse_hex_color(s: &str) -> Vec3 {
    let hex = s.trim().trim_start_matches('#');
    let expand = |c: u8| c * 17;
    let parsed = match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok().map(|v| {
            [(v >> 16) & 0xff, (v >> 8) & 0xff, v & 0xff].map(|c| c as u8)
        }),
        3 => u16::from_str_radix(hex, 16).ok().map(|v| {
            [(v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf].map(|c| expand(c as u8))
        }),
        _ => None,
    };
    match parsed {
        Some([r, g, b]) => Vec3::new(r as f32, g as f32, b as f32) / 255.0,
        None => Vec3::ONE,
    }
}

fn marker_for(h: &Hotspot) -> Marker {
    match &h.kind {
        HotspotKind::Switch { shape, .. } => match shape {
            Shape::Sphere { size } => Marker::Sphere {
                radius: size * h.scale,
            },
            Shape::Box {
                width,
                height,
                depth,
                rotation_deg,
            } => Marker::Box {
                half_extents: Vec3::new(*width, *height, *depth) * 0.5 * h.scale,
                rotation_deg: *rotation_deg,
            },
            Shape::Polygon { points } => Marker::Polygon {
                triangles: polygon::triangulate_world(points),
                outline: points.clone(),
            },
        },
        HotspotKind::Portal { .. } => Marker::Sphere {
            radius: PORTAL_HIT_RADIUS * h.scale,
        },
        HotspotKind::Swap { .. } => Marker::Sphere {
            radius: DEFAULT_SPHERE_SIZE * h.scale,
        },
    }
}

/// Describe every hotspot for the current frame.
pub fn hotspot_visuals<'a>(
    hotspots: impl IntoIterator<Item = &'a Hotspot>,
    view: &ViewModeState,
    debug: bool,
    selected: Option<&HotspotId>,
    drawing: bool,
) -> Vec<HotspotVisual> {
    hotspots
        .into_iter()
        .map(|h| {
            let kind = h.tag();
            let is_selected = debug && selected == Some(&h.id);
            let base = match (kind, is_selected) {
                (_, true) => parse_hex_color(SELECTED_COLOR),
                (KindTag::Portal, _) => parse_hex_color(DEBUG_PORTAL_COLOR),
                _ => parse_hex_color(DEBUG_SWITCH_COLOR),
            };
            let alpha = match (debug, kind) {
                (false, _) => 0.0,
                (true, KindTag::Portal) => DEBUG_PORTAL_HIT_ALPHA,
                (true, _) => DEBUG_SWITCH_ALPHA,
            };
            let icon = match &h.kind {
                HotspotKind::Portal { icon, .. } => Some(PortalIcon {
                    name: icon.clone(),
                    text: h.portal_display_text().unwrap_or_default(),
                    rgba: parse_hex_color(&h.color).extend(h.opacity),
                    size_px: 32.0 * h.scale,
                }),
                _ => None,
            };
            let handles = match h.polygon_points() {
                Some(points) if is_selected && !drawing => points.iter().copied().collect(),
                _ => SmallVec::new(),
            };
            HotspotVisual {
                id: h.id.clone(),
                kind,
                position: h.position,
                marker: marker_for(h),
                rgba: base.extend(alpha),
                icon,
                interactive: debug || view.interactive(kind),
                selected: is_selected,
                handles,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickHit {
    Hotspot(HotspotId),
    Vertex { hotspot: HotspotId, index: usize },
}

/// Möller–Trumbore; distance along the normalized ray.
fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let dir = ray.dir.try_normalize()?;
    let e1 = b - a;
    let e2 = c - a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-8 {
        return None;
    }
    let inv = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t >= 0.0).then_some(t)
}

fn hit_distance(ray: &Ray, v: &HotspotVisual) -> Option<f32> {
    match &v.marker {
        Marker::Sphere { radius } => ray_sphere(ray.origin, ray.dir, v.position, *radius),
        Marker::Box { half_extents, .. } => {
            ray_sphere(ray.origin, ray.dir, v.position, half_extents.length())
        }
        Marker::Polygon { triangles, .. } => triangles
            .chunks_exact(3)
            .filter_map(|t| ray_triangle(ray, t[0], t[1], t[2]))
            .min_by(|a, b| a.total_cmp(b)),
    }
}

/// Nearest marker or vertex handle under the ray. Vertex handles win ties
/// with their own polygon so they stay grabbable.
pub fn pick(ray: Ray, visuals: &[HotspotVisual]) -> Option<PickHit> {
    let mut best: Option<(f32, PickHit)> = None;
    let mut consider = |t: f32, hit: PickHit| {
        if best.as_ref().map_or(true, |(bt, _)| t < *bt) {
            best = Some((t, hit));
        }
    };
    for v in visuals {
        for (index, p) in v.handles.iter().enumerate() {
            if let Some(t) = ray_sphere(ray.origin, ray.dir, *p, VERTEX_HANDLE_SIZE) {
                consider(
                    t - VERTEX_HANDLE_SIZE,
                    PickHit::Vertex {
                        hotspot: v.id.clone(),
                        index,
                    },
                );
            }
        }
        if let Some(t) = hit_distance(&ray, v) {
            consider(t, PickHit::Hotspot(v.id.clone()));
        }
    }
    best.map(|(_, hit)| hit)
}

const MARKER_SPHERE_SEGMENTS: (u32, u32) = (16, 10);

fn sphere_triangles(center: Vec3, radius: f32, out: &mut Vec<Vec3>) {
    let mesh = uv_sphere(radius, MARKER_SPHERE_SEGMENTS.0, MARKER_SPHERE_SEGMENTS.1);
    out.extend(
        mesh.indices
            .iter()
            .map(|&i| center + mesh.positions[i as usize]),
    );
}

/// Box facing the sphere centre, spun about that axis by `rotation_deg`.
fn box_triangles(center: Vec3, half: Vec3, rotation_deg: f32, out: &mut Vec<Vec3>) {
    let facing = (-center).try_normalize().unwrap_or(Vec3::NEG_Z);
    let rot = Quat::from_rotation_arc(Vec3::Z, facing)
        * Quat::from_rotation_z(rotation_deg.to_radians());
    let corner = |x: f32, y: f32, z: f32| center + rot * (half * Vec3::new(x, y, z));
    let c = [
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
    ];
    const FACES: [[usize; 4]; 6] = [
        [0, 1, 2, 3],
        [5, 4, 7, 6],
        [4, 0, 3, 7],
        [1, 5, 6, 2],
        [3, 2, 6, 7],
        [4, 5, 1, 0],
    ];
    for [a, b, cc, d] in FACES {
        out.extend_from_slice(&[c[a], c[b], c[cc], c[a], c[cc], c[d]]);
    }
}

/// World-space triangle list for a marker's hit geometry.
pub fn marker_triangles(v: &HotspotVisual) -> Vec<Vec3> {
    let mut out = Vec::new();
    match &v.marker {
        Marker::Sphere { radius } => sphere_triangles(v.position, *radius, &mut out),
        Marker::Box {
            half_extents,
            rotation_deg,
        } => box_triangles(v.position, *half_extents, *rotation_deg, &mut out),
        Marker::Polygon { triangles, .. } => out.extend_from_slice(triangles),
    }
    out
}

/// Triangles for the draggable vertex handles.
pub fn handle_triangles(v: &HotspotVisual) -> Vec<Vec3> {
    let mut out = Vec::new();
    for p in &v.handles {
        sphere_triangles(*p, VERTEX_HANDLE_SIZE, &mut out);
    }
    out
}

use crate::constants::{SPHERE_RADIUS, SPHERE_SEGMENTS};
use glam::{Vec2, Vec3};

/// World-space ray. `dir` need not be normalized; helpers normalize it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + unit_dir(self.dir) * t
    }
}

#[inline]
fn unit_dir(dir: Vec3) -> Vec3 {
    dir.try_normalize().unwrap_or(Vec3::NEG_Z)
}

/// Smallest non-negative hit distance of a ray against a sphere.
///
/// Works from inside the sphere too (the far root is returned), which is the
/// normal case for a camera sitting at the panorama centre.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let d = unit_dir(ray_dir);
    let oc = ray_origin - center;
    let b = oc.dot(d);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 || !disc.is_finite() {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = -b - sq;
    let t1 = -b + sq;
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

/// First intersection of `ray` with the origin-centred picking sphere.
pub fn intersect_picking_sphere(ray: Ray, radius: f32) -> Option<Vec3> {
    ray_sphere(ray.origin, ray.dir, Vec3::ZERO, radius).map(|t| ray.at(t))
}

/// Scale a vector so it lies on the sphere of `radius`.
#[inline]
pub fn normalize_to_radius(v: Vec3, radius: f32) -> Vec3 {
    unit_dir(v) * radius
}

/// Deterministic sphere-surface point for any pointer ray.
///
/// Falls back to the ray direction pushed out to `radius` when the ray misses,
/// so grazing angles never leave a dead zone.
pub fn project_to_sphere(ray: Ray, radius: f32) -> Vec3 {
    intersect_picking_sphere(ray, radius).unwrap_or_else(|| normalize_to_radius(ray.dir, radius))
}

/// Latitude/longitude sphere. `uv.y` runs from the north pole (0) to the
/// south pole (1); `uv.x` wraps once around the equator.
#[derive(Debug, Clone, Default)]
pub struct SphereMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> SphereMesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = SphereMesh::default();
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = v * std::f32::consts::PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = u * std::f32::consts::TAU;
            mesh.positions.push(Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
            mesh.uvs.push(Vec2::new(u, v));
        }
    }
    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix;
            let b = a + row;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
            }
            if iy != hs - 1 {
                mesh.indices.extend_from_slice(&[b, b + 1, a + 1]);
            }
        }
    }
    mesh
}

/// The panorama sphere, mirrored on x so equirectangular images read
/// correctly from the inside.
pub fn panorama_sphere() -> SphereMesh {
    let mut mesh = uv_sphere(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
    for p in &mut mesh.positions {
        p.x = -p.x;
    }
    mesh
}

//! Camera types shared by the web renderer and the inspector.
//!
//! The viewer camera sits a hair off the sphere centre and orbits its target;
//! there is no pan or zoom.

use crate::constants::{
    default_camera_position, CAMERA_FOVY_DEG, CAMERA_ZFAR, CAMERA_ZNEAR, ORBIT_PITCH_LIMIT,
    ORBIT_ROTATE_SPEED,
};
use crate::geometry::Ray;
use crate::lenient::lenient;
use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space picking ray through a normalized device coordinate.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far: Vec3 = p_far.truncate() / p_far.w;
        Ray::new(self.eye, far - self.eye)
    }
}

/// Pixel position inside a `width` x `height` viewport to NDC (y up).
#[inline]
pub fn ndc_from_pixels(px: f32, py: f32, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new(2.0 * px / w - 1.0, 1.0 - 2.0 * py / h)
}

/// Persisted camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    #[serde(deserialize_with = "lenient")]
    pub position: Vec3,
    #[serde(deserialize_with = "lenient")]
    pub target: Vec3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: Vec3::ZERO,
        }
    }
}

/// Yaw/pitch orbit around a fixed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_pose(CameraPose::default())
    }
}

impl OrbitCamera {
    pub fn from_pose(pose: CameraPose) -> Self {
        let offset = pose.position - pose.target;
        let (offset, radius) = match offset.try_normalize() {
            Some(dir) => (dir, offset.length()),
            None => {
                let d = default_camera_position();
                (d.normalize(), d.length())
            }
        };
        Self {
            target: pose.target,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: offset
                .y
                .clamp(-1.0, 1.0)
                .asin()
                .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT),
        }
    }

    pub fn pose(&self) -> CameraPose {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        CameraPose {
            position: self.target + Vec3::new(cp * sy, sp, cp * cy) * self.radius,
            target: self.target,
        }
    }

    /// Pointer drag in pixels; a full viewport height turns 2π * speed.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        let k = std::f32::consts::TAU * ORBIT_ROTATE_SPEED / h;
        self.yaw -= dx * k;
        self.pitch = (self.pitch + dy * k).clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        let pose = self.pose();
        Camera {
            eye: pose.position,
            target: pose.target,
            up: Vec3::Y,
            aspect: if aspect.is_finite() && aspect > 0.0 {
                aspect
            } else {
                1.0
            },
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

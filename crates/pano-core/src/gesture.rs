//! Single owner of pointer-drag state: Idle → Dragging(target) → Idle.
//!
//! The front-end registers window-level move/up listeners when `begin`
//! returns true and removes them when `end` runs, so a drag keeps tracking
//! after the pointer leaves the marker.

use crate::constants::{CLICK_SLOP_PX, SPHERE_RADIUS};
use crate::geometry::{project_to_sphere, Ray};
use crate::hotspot::HotspotId;
use crate::visuals::PickHit;
use glam::{Vec2, Vec3};

/// Primary button bit in `PointerEvent.buttons`.
pub const PRIMARY_BUTTON: u16 = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum DragTarget {
    Hotspot(HotspotId),
    Vertex { hotspot: HotspotId, index: usize },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging { target: DragTarget, moves: u32 },
}

/// Position update produced by a pointer move while dragging.
#[derive(Debug, Clone, PartialEq)]
pub struct DragMove {
    pub target: DragTarget,
    pub point: Vec3,
}

/// How a finished gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEnd {
    pub target: DragTarget,
    pub moved: bool,
}

#[derive(Debug, Default)]
pub struct GestureCoordinator {
    state: Gesture,
}

impl GestureCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Gesture {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, Gesture::Dragging { .. })
    }

    /// Start a drag. Only allowed in edit mode and when idle.
    pub fn begin(&mut self, target: DragTarget, edit_mode: bool) -> bool {
        if !edit_mode || self.is_dragging() {
            return false;
        }
        log::debug!("[gesture] begin {:?}", target);
        self.state = Gesture::Dragging { target, moves: 0 };
        true
    }

    /// Project the pointer ray while the primary button is held.
    pub fn update(&mut self, ray: Ray, buttons: u16) -> Option<DragMove> {
        let Gesture::Dragging { target, moves } = &mut self.state else {
            return None;
        };
        if buttons & PRIMARY_BUTTON == 0 {
            return None;
        }
        *moves += 1;
        Some(DragMove {
            target: target.clone(),
            point: project_to_sphere(ray, SPHERE_RADIUS),
        })
    }

    /// pointerup / pointercancel / pointerleave, anywhere.
    pub fn end(&mut self) -> Option<DragEnd> {
        match std::mem::replace(&mut self.state, Gesture::Idle) {
            Gesture::Idle => None,
            Gesture::Dragging { target, moves } => {
                log::debug!("[gesture] end {:?} after {} moves", target, moves);
                Some(DragEnd {
                    target,
                    moved: moves > 0,
                })
            }
        }
    }

    /// Drop any drag whose hotspot disappeared.
    pub fn cancel_for(&mut self, id: &HotspotId) {
        let hit = match &self.state {
            Gesture::Dragging {
                target: DragTarget::Hotspot(h),
                ..
            } => h == id,
            Gesture::Dragging {
                target: DragTarget::Vertex { hotspot, .. },
                ..
            } => hotspot == id,
            Gesture::Idle => false,
        };
        if hit {
            self.state = Gesture::Idle;
        }
    }
}

/// One pointer press on the canvas, from pointerdown to pointerup.
///
/// A press on a draggable marker only becomes a drag once it leaves the
/// click slop; until then it is still a click and nothing moves.
#[derive(Debug, Clone)]
pub struct Press {
    pub start_px: Vec2,
    pub last_px: Vec2,
    /// What was under the pointer at pointerdown.
    pub hit: Option<PickHit>,
    /// Orbit the camera rather than drag a marker.
    pub orbit: bool,
    /// The marker drag has been handed to the coordinator.
    pub dragging: bool,
    pub travelled: f32,
}

impl Press {
    pub fn new(at: Vec2, hit: Option<PickHit>, orbit: bool) -> Self {
        Self {
            start_px: at,
            last_px: at,
            hit,
            orbit,
            dragging: false,
            travelled: 0.0,
        }
    }

    /// Record a move; returns the delta since the last one.
    pub fn advance(&mut self, at: Vec2) -> Vec2 {
        let d = at - self.last_px;
        self.last_px = at;
        self.travelled = self.travelled.max((at - self.start_px).length());
        d
    }

    pub fn is_click(&self) -> bool {
        self.travelled < CLICK_SLOP_PX
    }

    /// A marker press that just left the slop and has no drag yet.
    pub fn wants_drag(&self) -> bool {
        !self.orbit && !self.dragging && !self.is_click() && self.hit.is_some()
    }
}

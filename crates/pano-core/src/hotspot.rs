//! Hotspot value types: a tagged union over switch / portal / swap markers.
//!
//! On the wire a hotspot is one flat camelCase object (`HotspotRecord`);
//! conversion in both directions goes through `From` so legacy shapes are
//! normalized as soon as they are read.

use crate::constants::{
    DEFAULT_BOX_DEPTH, DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH, DEFAULT_HOTSPOT_COLOR,
    DEFAULT_PORTAL_ICON, DEFAULT_PORTAL_LABEL, DEFAULT_SPHERE_SIZE, PORTAL_ICONS,
    PORTAL_NO_TARGET_TEXT, ROTATION_RANGE_DEG, SCALE_RANGE, SPHERE_SIZE_RANGE,
};
use crate::error::{PanoError, Result};
use crate::lenient::{lenient, lenient_list, lenient_number};
use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct HotspotId(String);

impl HotspotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HotspotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HotspotId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// Older presets stored numeric timestamp ids.
impl<'de> Deserialize<'de> for HotspotId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        match serde_json::Value::deserialize(d)? {
            serde_json::Value::String(s) => Ok(Self(s)),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a hotspot id, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    Switch,
    Portal,
    Swap,
}

impl KindTag {
    pub fn as_str(self) -> &'static str {
        match self {
            KindTag::Switch => "switch",
            KindTag::Portal => "portal",
            KindTag::Swap => "swap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeTag {
    #[default]
    Sphere,
    Box,
    Polygon,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere {
        size: f32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
        rotation_deg: f32,
    },
    /// Ordered boundary on the picking sphere.
    Polygon { points: Vec<Vec3> },
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Sphere {
            size: DEFAULT_SPHERE_SIZE,
        }
    }
}

impl Shape {
    pub fn with_defaults(tag: ShapeTag) -> Self {
        match tag {
            ShapeTag::Sphere => Shape::default(),
            ShapeTag::Box => Shape::Box {
                width: DEFAULT_BOX_WIDTH,
                height: DEFAULT_BOX_HEIGHT,
                depth: DEFAULT_BOX_DEPTH,
                rotation_deg: 0.0,
            },
            ShapeTag::Polygon => Shape::Polygon { points: Vec::new() },
        }
    }

    pub fn tag(&self) -> ShapeTag {
        match self {
            Shape::Sphere { .. } => ShapeTag::Sphere,
            Shape::Box { .. } => ShapeTag::Box,
            Shape::Polygon { .. } => ShapeTag::Polygon,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HotspotKind {
    Switch {
        shape: Shape,
        lights: BTreeSet<String>,
    },
    Portal {
        target_environment: Option<String>,
        icon: String,
        label: String,
    },
    /// Cycles through `target_images` on each click.
    Swap { target_images: Vec<String> },
}

impl HotspotKind {
    pub fn with_defaults(tag: KindTag) -> Self {
        match tag {
            KindTag::Switch => HotspotKind::Switch {
                shape: Shape::default(),
                lights: BTreeSet::new(),
            },
            KindTag::Portal => HotspotKind::Portal {
                target_environment: None,
                icon: DEFAULT_PORTAL_ICON.to_string(),
                label: DEFAULT_PORTAL_LABEL.to_string(),
            },
            KindTag::Swap => HotspotKind::Swap {
                target_images: Vec::new(),
            },
        }
    }

    pub fn tag(&self) -> KindTag {
        match self {
            HotspotKind::Switch { .. } => KindTag::Switch,
            HotspotKind::Portal { .. } => KindTag::Portal,
            HotspotKind::Swap { .. } => KindTag::Swap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HotspotRecord", into = "HotspotRecord")]
pub struct Hotspot {
    pub id: HotspotId,
    pub position: Vec3,
    pub color: String,
    pub opacity: f32,
    pub scale: f32,
    pub kind: HotspotKind,
}

/// A single editor field change. Light links are not editable here; they go
/// through [`crate::hotspots::HotspotSet::commit_lights`].
#[derive(Debug, Clone, PartialEq)]
pub enum HotspotEdit {
    Kind(KindTag),
    Shape(ShapeTag),
    Size(f32),
    Width(f32),
    Height(f32),
    Depth(f32),
    RotationDeg(f32),
    Color(String),
    Opacity(f32),
    Scale(f32),
    TargetEnvironment(Option<String>),
    Icon(String),
    Label(String),
    TargetImages(Vec<String>),
}

#[inline]
fn clamp_or(v: f32, (lo, hi): (f32, f32), fallback: f32) -> f32 {
    if v.is_finite() {
        v.clamp(lo, hi)
    } else {
        fallback
    }
}

#[inline]
fn positive_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        fallback
    }
}

impl Hotspot {
    pub fn new(id: HotspotId, position: Vec3, kind: HotspotKind) -> Self {
        Self {
            id,
            position,
            color: DEFAULT_HOTSPOT_COLOR.to_string(),
            opacity: 1.0,
            scale: 1.0,
            kind,
        }
    }

    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// Linked light files; empty for non-switch hotspots.
    pub fn lights(&self) -> impl Iterator<Item = &str> + '_ {
        let set = match &self.kind {
            HotspotKind::Switch { lights, .. } => Some(lights),
            _ => None,
        };
        set.into_iter().flat_map(|s| s.iter().map(String::as_str))
    }

    pub fn polygon_points(&self) -> Option<&[Vec3]> {
        match &self.kind {
            HotspotKind::Switch {
                shape: Shape::Polygon { points },
                ..
            } => Some(points),
            _ => None,
        }
    }

    pub(crate) fn polygon_points_mut(&mut self) -> Result<&mut Vec<Vec3>> {
        match &mut self.kind {
            HotspotKind::Switch {
                shape: Shape::Polygon { points },
                ..
            } => Ok(points),
            _ => Err(PanoError::WrongKind {
                id: self.id.clone(),
                expected: "polygon",
            }),
        }
    }

    /// Text shown on a portal marker.
    pub fn portal_display_text(&self) -> Option<String> {
        let HotspotKind::Portal {
            target_environment,
            label,
            ..
        } = &self.kind
        else {
            return None;
        };
        let label = label.trim();
        let target = target_environment.as_deref().filter(|t| !t.is_empty());
        let text = match target {
            _ if !label.is_empty() && label != DEFAULT_PORTAL_LABEL => label,
            Some(t) => t,
            None => PORTAL_NO_TARGET_TEXT,
        };
        Some(text.to_string())
    }

    fn box_dims_mut(&mut self) -> Result<[&mut f32; 3]> {
        match &mut self.kind {
            HotspotKind::Switch {
                shape:
                    Shape::Box {
                        width,
                        height,
                        depth,
                        ..
                    },
                ..
            } => Ok([width, height, depth]),
            _ => Err(PanoError::WrongKind {
                id: self.id.clone(),
                expected: "box",
            }),
        }
    }

    /// Apply one field edit. Switching type resets the payload to defaults.
    pub fn apply(&mut self, edit: HotspotEdit) -> Result<()> {
        let wrong = |id: &HotspotId, expected| PanoError::WrongKind {
            id: id.clone(),
            expected,
        };
        match edit {
            HotspotEdit::Kind(tag) => {
                if self.tag() != tag {
                    self.kind = HotspotKind::with_defaults(tag);
                }
            }
            HotspotEdit::Color(c) => self.color = c,
            HotspotEdit::Opacity(v) => self.opacity = clamp_or(v, (0.0, 1.0), 1.0),
            HotspotEdit::Scale(v) => self.scale = clamp_or(v, SCALE_RANGE, 1.0),
            HotspotEdit::Shape(tag) => match &mut self.kind {
                HotspotKind::Switch { shape, .. } => {
                    if shape.tag() != tag {
                        *shape = Shape::with_defaults(tag);
                    }
                }
                _ => return Err(wrong(&self.id, "switch")),
            },
            HotspotEdit::Size(v) => match &mut self.kind {
                HotspotKind::Switch {
                    shape: Shape::Sphere { size },
                    ..
                } => *size = clamp_or(v, SPHERE_SIZE_RANGE, DEFAULT_SPHERE_SIZE),
                _ => return Err(wrong(&self.id, "sphere")),
            },
            HotspotEdit::Width(v) => *self.box_dims_mut()?[0] = positive_or(v, DEFAULT_BOX_WIDTH),
            HotspotEdit::Height(v) => {
                *self.box_dims_mut()?[1] = positive_or(v, DEFAULT_BOX_HEIGHT)
            }
            HotspotEdit::Depth(v) => *self.box_dims_mut()?[2] = positive_or(v, DEFAULT_BOX_DEPTH),
            HotspotEdit::RotationDeg(v) => match &mut self.kind {
                HotspotKind::Switch {
                    shape: Shape::Box { rotation_deg, .. },
                    ..
                } => *rotation_deg = clamp_or(v, ROTATION_RANGE_DEG, 0.0),
                _ => return Err(wrong(&self.id, "box")),
            },
            HotspotEdit::TargetEnvironment(t) => match &mut self.kind {
                HotspotKind::Portal {
                    target_environment, ..
                } => *target_environment = t.filter(|s| !s.is_empty()),
                _ => return Err(wrong(&self.id, "portal")),
            },
            HotspotEdit::Icon(i) => match &mut self.kind {
                HotspotKind::Portal { icon, .. } => {
                    if !PORTAL_ICONS.contains(&i.as_str()) {
                        log::warn!("[hotspot] unknown portal icon {:?}", i);
                    }
                    *icon = i;
                }
                _ => return Err(wrong(&self.id, "portal")),
            },
            HotspotEdit::Label(l) => match &mut self.kind {
                HotspotKind::Portal { label, .. } => *label = l,
                _ => return Err(wrong(&self.id, "portal")),
            },
            HotspotEdit::TargetImages(images) => match &mut self.kind {
                HotspotKind::Swap { target_images } => {
                    let mut out: Vec<String> = Vec::with_capacity(images.len());
                    for img in images {
                        if !img.is_empty() && !out.contains(&img) {
                            out.push(img);
                        }
                    }
                    *target_images = out;
                }
                _ => return Err(wrong(&self.id, "swap")),
            },
        }
        Ok(())
    }
}

/// Flat wire form, including the legacy spellings accepted on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotspotRecord {
    #[serde(deserialize_with = "lenient")]
    id: Option<HotspotId>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    kind: Option<KindTag>,
    #[serde(deserialize_with = "lenient")]
    position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    shape: Option<ShapeTag>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_number")]
    size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_number")]
    width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_number")]
    height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_number")]
    depth: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_number")]
    rotation: Option<f32>,
    #[serde(
        alias = "pontos",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "lenient_list"
    )]
    points: Vec<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    lights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    target_environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    target_images: Option<Vec<String>>,
    #[serde(skip_serializing, deserialize_with = "lenient")]
    target_image: Option<String>,
    #[serde(deserialize_with = "lenient")]
    color: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    opacity: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    scale: Option<f32>,
}

impl From<HotspotRecord> for Hotspot {
    fn from(r: HotspotRecord) -> Self {
        let id = r.id.unwrap_or_else(|| {
            log::warn!("[hotspot] record without id");
            HotspotId::new("")
        });
        let kind = match r.kind.unwrap_or(KindTag::Switch) {
            KindTag::Switch => {
                let shape = match r.shape.unwrap_or_default() {
                    ShapeTag::Sphere => Shape::Sphere {
                        size: clamp_or(
                            r.size.unwrap_or(DEFAULT_SPHERE_SIZE),
                            SPHERE_SIZE_RANGE,
                            DEFAULT_SPHERE_SIZE,
                        ),
                    },
                    ShapeTag::Box => Shape::Box {
                        width: positive_or(r.width.unwrap_or(DEFAULT_BOX_WIDTH), DEFAULT_BOX_WIDTH),
                        height: positive_or(
                            r.height.unwrap_or(DEFAULT_BOX_HEIGHT),
                            DEFAULT_BOX_HEIGHT,
                        ),
                        depth: positive_or(r.depth.unwrap_or(DEFAULT_BOX_DEPTH), DEFAULT_BOX_DEPTH),
                        rotation_deg: clamp_or(r.rotation.unwrap_or(0.0), ROTATION_RANGE_DEG, 0.0),
                    },
                    ShapeTag::Polygon => Shape::Polygon { points: r.points },
                };
                HotspotKind::Switch {
                    shape,
                    lights: r.lights.unwrap_or_default().into_iter().collect(),
                }
            }
            KindTag::Portal => HotspotKind::Portal {
                target_environment: r.target_environment.filter(|t| !t.is_empty()),
                icon: r.icon.unwrap_or_else(|| DEFAULT_PORTAL_ICON.to_string()),
                label: r.label.unwrap_or_else(|| DEFAULT_PORTAL_LABEL.to_string()),
            },
            KindTag::Swap => {
                let mut target_images = r.target_images.unwrap_or_default();
                if target_images.is_empty() {
                    target_images.extend(r.target_image.filter(|t| !t.is_empty()));
                }
                HotspotKind::Swap { target_images }
            }
        };
        Hotspot {
            id,
            position: r.position.unwrap_or_else(|| {
                log::warn!("[hotspot] record without position");
                Vec3::ZERO
            }),
            color: r
                .color
                .unwrap_or_else(|| DEFAULT_HOTSPOT_COLOR.to_string()),
            opacity: clamp_or(r.opacity.unwrap_or(1.0), (0.0, 1.0), 1.0),
            scale: clamp_or(r.scale.unwrap_or(1.0), SCALE_RANGE, 1.0),
            kind,
        }
    }
}

impl From<Hotspot> for HotspotRecord {
    fn from(h: Hotspot) -> Self {
        let mut r = HotspotRecord {
            id: Some(h.id),
            kind: Some(h.kind.tag()),
            position: Some(h.position),
            color: Some(h.color),
            opacity: Some(h.opacity),
            scale: Some(h.scale),
            ..Default::default()
        };
        match h.kind {
            HotspotKind::Switch { shape, lights } => {
                r.shape = Some(shape.tag());
                match shape {
                    Shape::Sphere { size } => r.size = Some(size),
                    Shape::Box {
                        width,
                        height,
                        depth,
                        rotation_deg,
                    } => {
                        r.width = Some(width);
                        r.height = Some(height);
                        r.depth = Some(depth);
                        r.rotation = Some(rotation_deg);
                    }
                    Shape::Polygon { points } => r.points = points,
                }
                r.lights = Some(lights.into_iter().collect());
            }
            HotspotKind::Portal {
                target_environment,
                icon,
                label,
            } => {
                r.target_environment = target_environment;
                r.icon = Some(icon);
                r.label = Some(label);
            }
            HotspotKind::Swap { target_images } => r.target_images = Some(target_images),
        }
        r
    }
}

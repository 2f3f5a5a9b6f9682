pub mod compositor;
pub mod constants;
pub mod environment;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod hotspot;
pub mod hotspots;
pub mod labels;
pub mod lenient;
pub mod lights;
pub mod polygon;
pub mod preset;
pub mod state;
pub mod view_mode;
pub mod viewer;
pub mod visuals;

pub static LAYER_WGSL: &str = include_str!("../shaders/layer.wgsl");
pub static MARKER_WGSL: &str = include_str!("../shaders/marker.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use compositor::{compose, Adjustments, Blend, LayerDraw, OpacitySmoother};
pub use environment::Environment;
pub use error::{PanoError, Result};
pub use geometry::{panorama_sphere, Ray, SphereMesh};
pub use hotspot::{Hotspot, HotspotEdit, HotspotId, HotspotKind, KindTag, Shape, ShapeTag};
pub use hotspots::HotspotSet;
pub use lights::{IntensityMap, LightBoard, LightRecord, LightState};
pub use preset::{resolve, LocalSnapshot, PresetDocument, ViewerPreset};
pub use state::{Camera, CameraPose, OrbitCamera};
pub use view_mode::{ViewMode, ViewModePermission, ViewModeState};
pub use viewer::{ClickOutcome, Viewer};
pub use visuals::{HotspotVisual, Marker, PickHit};

use glam::Vec3;

// Shared tuning constants used by the core, the web front-end and the inspector.

// Scene layout
pub const SPHERE_RADIUS: f32 = 10.0; // panorama sphere and picking sphere share this radius
pub const SPHERE_SEGMENTS: u32 = 64; // width/height segments of the layer sphere mesh
pub const DEFAULT_CAMERA_POSITION: [f32; 3] = [0.0, 0.0, 0.01];
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.01;
pub const CAMERA_ZFAR: f32 = 100.0;
pub const ORBIT_ROTATE_SPEED: f32 = 0.5;
/// Pixel travel below which a press still counts as a click.
pub const CLICK_SLOP_PX: f32 = 4.0;
pub const ORBIT_PITCH_LIMIT: f32 = 1.55; // radians, just short of the poles

// Lights
pub const DAYLIGHT_KEY: &str = "__daylight";
pub const OTHERS_GROUP: &str = "OUTROS";
pub const MAX_INTENSITY: f32 = 100.0;
pub const DEFAULT_LIGHT_INTENSITY: f32 = 50.0;
pub const DEFAULT_DAYLIGHT_INTENSITY: f32 = 50.0;

// Hotspots
pub const DUPLICATE_OFFSET: f32 = 0.5; // applied on x and y
pub const DEFAULT_HOTSPOT_COLOR: &str = "#ffffff";
pub const DEFAULT_SPHERE_SIZE: f32 = 0.2;
pub const SPHERE_SIZE_RANGE: (f32, f32) = (0.1, 2.0);
pub const DEFAULT_BOX_WIDTH: f32 = 1.0;
pub const DEFAULT_BOX_HEIGHT: f32 = 1.0;
pub const DEFAULT_BOX_DEPTH: f32 = 0.1;
pub const ROTATION_RANGE_DEG: (f32, f32) = (-180.0, 180.0);
pub const SCALE_RANGE: (f32, f32) = (0.5, 5.0);
pub const DEFAULT_PORTAL_ICON: &str = "geo-alt-fill";
pub const DEFAULT_PORTAL_LABEL: &str = "Portal";
pub const PORTAL_NO_TARGET_TEXT: &str = "Sem destino";
pub const PORTAL_ICONS: &[&str] = &[
    "geo-alt",
    "geo-alt-fill",
    "pin",
    "pin-fill",
    "record-circle",
    "circle-fill",
    "caret-down",
    "caret-down-fill",
    "door-open",
    "door-open-fill",
    "arrow-right-circle",
    "box-arrow-in-right",
];
pub const COLOR_HISTORY_LEN: usize = 10;
pub const DEFAULT_COLOR_HISTORY: [&str; 4] = ["#ffffff", "#000000", "#ff00ff", "#0000ff"];

// Marker alphas
pub const DEBUG_SWITCH_ALPHA: f32 = 0.6;
pub const DEBUG_SWITCH_COLOR: &str = "#3b82f6";
pub const DEBUG_PORTAL_COLOR: &str = "#ff00ff";
pub const SELECTED_COLOR: &str = "#facc15";
pub const DEBUG_PORTAL_HIT_ALPHA: f32 = 0.3;
pub const PORTAL_HIT_RADIUS: f32 = 0.3; // multiplied by the portal scale
pub const VERTEX_HANDLE_SIZE: f32 = 0.08;

// Compositing
pub const OPACITY_SMOOTHING_TAU_SEC: f32 = 0.15;
pub const OPACITY_EPSILON: f32 = 1e-3;
pub const TEMPERATURE_MAX: f32 = 40.0;
pub const WARM_TINT: [f32; 3] = [1.0, 0.86, 0.68];
pub const COOL_TINT: [f32; 3] = [0.72, 0.85, 1.0];
pub const DENOISE_MAX_PX: f32 = 4.0;

// Documents and endpoints
pub const ENVIRONMENTS_PATH: &str = "/environments.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const SAVE_CONFIG_ENDPOINT: &str = "/save-config";
pub const EXPORT_FILE_NAME: &str = "viewerState.json";
pub const LOCAL_SNAPSHOT_KEY: &str = "pano.viewer.local";
pub const FALLBACK_ENVIRONMENT: &str = "luzes";
pub const FALLBACK_IMG_PATH: &str = "/img/luzes";
pub const ENV_QUERY_PARAM: &str = "env";

#[inline]
pub fn default_camera_position() -> Vec3 {
    Vec3::from(DEFAULT_CAMERA_POSITION)
}

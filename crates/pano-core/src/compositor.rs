//! Layer stack resolution: z-order, per-layer opacity and blend, smoothing,
//! and the global colour adjustments applied over the composite.

use crate::constants::{
    COOL_TINT, DENOISE_MAX_PX, MAX_INTENSITY, OPACITY_EPSILON, OPACITY_SMOOTHING_TAU_SEC,
    TEMPERATURE_MAX, WARM_TINT,
};
use crate::labels;
use crate::lenient::lenient_number;
use crate::lights::LightBoard;
use crate::view_mode::ViewMode;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Source-over.
    Normal,
    Additive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerDraw {
    pub file: String,
    pub opacity: f32,
    pub blend: Blend,
}

impl LayerDraw {
    pub fn visible(&self) -> bool {
        self.opacity > OPACITY_EPSILON
    }
}

/// Target stack for the current state; index 0 is drawn first.
///
/// Files listed in `layers` but unknown to the board resolve to opacity 0.
pub fn compose(layers: &[String], mode: ViewMode, board: &LightBoard) -> Vec<LayerDraw> {
    let primary = labels::primary_final(layers);
    layers
        .iter()
        .map(|file| {
            let is_final = labels::is_final(file);
            let known = board.contains(file);
            let opacity = match (mode, is_final) {
                (_, _) if !known => 0.0,
                (ViewMode::Final, true) if Some(file.as_str()) == primary => 1.0,
                (ViewMode::Final, true) => board.intensity(file) / MAX_INTENSITY,
                (ViewMode::Final, false) => 0.0,
                (ViewMode::Lights, true) => 0.0,
                (ViewMode::Lights, false) => board.opacity(file),
            };
            LayerDraw {
                file: file.clone(),
                opacity,
                blend: if is_final {
                    Blend::Normal
                } else {
                    Blend::Additive
                },
            }
        })
        .collect()
}

/// Exponential approach of displayed opacity toward the composed target.
#[derive(Debug, Default)]
pub struct OpacitySmoother {
    current: HashMap<String, f32>,
}

impl OpacitySmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt_sec` and return the stack with smoothed opacities.
    pub fn step(&mut self, target: &[LayerDraw], dt_sec: f32) -> Vec<LayerDraw> {
        let dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        let alpha = 1.0 - (-dt / OPACITY_SMOOTHING_TAU_SEC).exp();
        self.current
            .retain(|file, _| target.iter().any(|d| &d.file == file));
        target
            .iter()
            .map(|d| {
                let cur = self.current.entry(d.file.clone()).or_insert(0.0);
                *cur += (d.opacity - *cur) * alpha;
                if (*cur - d.opacity).abs() < OPACITY_EPSILON {
                    *cur = d.opacity;
                }
                LayerDraw {
                    file: d.file.clone(),
                    opacity: *cur,
                    blend: d.blend,
                }
            })
            .collect()
    }

    /// Jump straight to `target`, e.g. after an environment change.
    pub fn snap(&mut self, target: &[LayerDraw]) {
        self.current = target
            .iter()
            .map(|d| (d.file.clone(), d.opacity))
            .collect();
    }

    pub fn settled(&self, target: &[LayerDraw]) -> bool {
        target.iter().all(|d| {
            self.current
                .get(&d.file)
                .is_some_and(|c| (c - d.opacity).abs() < OPACITY_EPSILON)
        })
    }
}

/// Global post adjustments. Percent values; 100 is neutral for the
/// multiplicative ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "AdjustmentsRecord")]
pub struct Adjustments {
    pub temperature: f32,
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub highlights: f32,
    pub denoise: f32,
    pub bloom: f32,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AdjustmentsRecord {
    #[serde(deserialize_with = "lenient_number")]
    temperature: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    saturation: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    contrast: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    brightness: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    highlights: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    denoise: Option<f32>,
    #[serde(deserialize_with = "lenient_number")]
    bloom: Option<f32>,
}

impl From<AdjustmentsRecord> for Adjustments {
    fn from(r: AdjustmentsRecord) -> Self {
        let d = Adjustments::default();
        Adjustments {
            temperature: r.temperature.unwrap_or(d.temperature),
            saturation: r.saturation.unwrap_or(d.saturation),
            contrast: r.contrast.unwrap_or(d.contrast),
            brightness: r.brightness.unwrap_or(d.brightness),
            highlights: r.highlights.unwrap_or(d.highlights),
            denoise: r.denoise.unwrap_or(d.denoise),
            bloom: r.bloom.unwrap_or(d.bloom),
        }
        .clamped()
    }
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            saturation: 100.0,
            contrast: 100.0,
            brightness: 100.0,
            highlights: 0.0,
            denoise: 0.0,
            bloom: 0.0,
        }
    }
}

impl Adjustments {
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let fix = |v: f32, def: f32, lo: f32, hi: f32| {
            if v.is_finite() {
                v.clamp(lo, hi)
            } else {
                def
            }
        };
        Self {
            temperature: fix(self.temperature, d.temperature, -TEMPERATURE_MAX, TEMPERATURE_MAX),
            saturation: fix(self.saturation, d.saturation, 0.0, 200.0),
            contrast: fix(self.contrast, d.contrast, 0.0, 200.0),
            brightness: fix(self.brightness, d.brightness, 0.0, 200.0),
            highlights: fix(self.highlights, d.highlights, 0.0, 100.0),
            denoise: fix(self.denoise, d.denoise, 0.0, 100.0),
            bloom: fix(self.bloom, d.bloom, 0.0, 100.0),
        }
    }

    /// RGB multiplier applied to every sampled layer texel.
    pub fn tint(&self) -> Vec3 {
        let t = (self.temperature / TEMPERATURE_MAX).clamp(-1.0, 1.0);
        let t = if t.is_finite() { t } else { 0.0 };
        if t >= 0.0 {
            Vec3::ONE.lerp(Vec3::from(WARM_TINT), t)
        } else {
            Vec3::ONE.lerp(Vec3::from(COOL_TINT), -t)
        }
    }

    pub fn blur_px(&self) -> f32 {
        self.denoise.clamp(0.0, 100.0) / 100.0 * DENOISE_MAX_PX
    }

    /// CSS filter string for the canvas element.
    pub fn css_filter(&self) -> String {
        let a = self.clamped();
        format!(
            "saturate({}%) contrast({}%) brightness({}%) blur({}px)",
            a.saturation,
            a.contrast,
            a.brightness,
            a.blur_px()
        )
    }

    /// Bloom strength in [0, 1] for the GPU post pass.
    pub fn bloom_strength(&self) -> f32 {
        self.bloom.clamp(0.0, 100.0) / 100.0
    }

    pub fn highlight_boost(&self) -> f32 {
        self.highlights.clamp(0.0, 100.0) / 100.0
    }
}

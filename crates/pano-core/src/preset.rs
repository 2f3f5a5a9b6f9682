//! Persisted viewer state: the preset document, the browser-local snapshot,
//! the three-tier `resolve`, and the save-endpoint acknowledgement.

use crate::compositor::Adjustments;
use crate::error::{PanoError, Result};
use crate::hotspot::Hotspot;
use crate::lenient::{self, lenient, lenient_list, lenient_map};
use crate::lights::{IntensityMap, LightRecord};
use crate::state::CameraPose;
use crate::view_mode::{ViewMode, ViewModePermission};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Full snapshot of editable state for one environment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PresetDocument")]
pub struct ViewerPreset {
    pub values: IntensityMap,
    pub lights_state: BTreeMap<String, LightRecord>,
    pub hotspots: Vec<Hotspot>,
    /// z-order, bottom first.
    pub layers: Vec<String>,
    pub daylight_targets: Vec<String>,
    pub adjustments: Adjustments,
    pub camera: CameraPose,
    pub view_mode_permission: ViewModePermission,
    pub view_mode: ViewMode,
}

impl ViewerPreset {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(PresetDocument::from_json(text)?.into())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(PanoError::Encode)
    }
}

/// A preset as read from disk or the network: every field optional so the
/// resolver can tell "absent" from "default".
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresetDocument {
    #[serde(deserialize_with = "lenient_opt_map")]
    pub values: Option<IntensityMap>,
    #[serde(deserialize_with = "lenient_opt_map")]
    pub lights_state: Option<BTreeMap<String, LightRecord>>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub hotspots: Option<Vec<Hotspot>>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub layers: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_opt_list")]
    pub daylight_targets: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient")]
    pub adjustments: Option<Adjustments>,
    #[serde(deserialize_with = "lenient")]
    pub camera: Option<CameraPose>,
    #[serde(deserialize_with = "lenient")]
    pub view_mode_permission: Option<ViewModePermission>,
    #[serde(deserialize_with = "lenient")]
    pub view_mode: Option<ViewMode>,
    #[serde(deserialize_with = "lenient")]
    pub show_final: Option<bool>,
    #[serde(deserialize_with = "lenient_list")]
    pub portals: Vec<Value>,
}

fn lenient_opt_map<'de, D, T>(d: D) -> std::result::Result<Option<BTreeMap<String, T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    lenient_map(d).map(Some)
}

fn lenient_opt_list<'de, D, T>(d: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    lenient_list(d).map(Some)
}

impl PresetDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(text).map_err(|source| PanoError::Parse {
            what: "preset",
            source,
        })?;
        if !raw.is_object() {
            log::warn!("[preset] document is not an object, ignoring it");
            return Ok(Self::default());
        }
        serde_json::from_value(raw).map_err(|source| PanoError::Parse {
            what: "preset",
            source,
        })
    }

    /// Hotspots with the legacy `portals` array folded in.
    fn merged_hotspots(&self) -> Option<Vec<Hotspot>> {
        if self.portals.is_empty() {
            return self.hotspots.clone();
        }
        let mut out = self.hotspots.clone().unwrap_or_default();
        let legacy: Vec<Hotspot> = self
            .portals
            .iter()
            .cloned()
            .map(|mut v| {
                if let Value::Object(map) = &mut v {
                    map.entry("type").or_insert_with(|| Value::from("portal"));
                }
                v
            })
            .filter_map(|v| match serde_json::from_value::<Hotspot>(v) {
                Ok(h) => Some(h),
                Err(e) => {
                    log::warn!("[preset] dropping legacy portal: {}", e);
                    None
                }
            })
            .collect();
        log::info!("[preset] migrated {} legacy portals", legacy.len());
        out.extend(legacy);
        Some(out)
    }

    /// `viewMode`, or the legacy `showFinal` flag.
    fn effective_view_mode(&self) -> Option<ViewMode> {
        self.view_mode.or_else(|| {
            self.show_final.map(|f| {
                if f {
                    ViewMode::Final
                } else {
                    ViewMode::Lights
                }
            })
        })
    }

    /// Overlay every field this document carries onto `base`.
    pub fn apply_to(&self, base: &mut ViewerPreset) {
        if let Some(v) = &self.values {
            base.values = v.clone();
        }
        if let Some(l) = &self.lights_state {
            base.lights_state = l.clone();
        }
        if let Some(h) = self.merged_hotspots() {
            base.hotspots = h;
        }
        if let Some(l) = &self.layers {
            base.layers = l.clone();
        }
        if let Some(d) = &self.daylight_targets {
            base.daylight_targets = d.clone();
        }
        if let Some(a) = self.adjustments {
            base.adjustments = a;
        }
        if let Some(c) = self.camera {
            base.camera = c;
        }
        if let Some(p) = self.view_mode_permission {
            base.view_mode_permission = p;
        }
        if let Some(m) = self.effective_view_mode() {
            base.view_mode = m;
        }
        base.view_mode = base.view_mode_permission.gate(base.view_mode);
    }
}

impl From<PresetDocument> for ViewerPreset {
    fn from(doc: PresetDocument) -> Self {
        let mut p = ViewerPreset::default();
        doc.apply_to(&mut p);
        p
    }
}

/// UI-only fields kept in browser storage so a reload doesn't flash.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalSnapshot {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub debug_mode: Option<bool>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<Adjustments>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewMode>,
}

impl LocalSnapshot {
    /// Unreadable storage is the same as no storage.
    pub fn from_json_or_default(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(v) => lenient::coerce(v),
            Err(e) => {
                log::warn!("[preset] ignoring unreadable local snapshot: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(PanoError::Encode)
    }
}

/// State after applying defaults, then the local snapshot, then the preset.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub preset: ViewerPreset,
    pub debug_mode: bool,
}

pub fn resolve(
    defaults: ViewerPreset,
    local: Option<&LocalSnapshot>,
    remote: Option<&PresetDocument>,
) -> Resolved {
    let mut preset = defaults;
    let mut debug_mode = false;
    if let Some(l) = local {
        debug_mode = l.debug_mode.unwrap_or(debug_mode);
        if let Some(a) = l.adjustments {
            preset.adjustments = a;
        }
        if let Some(m) = l.view_mode {
            preset.view_mode = m;
        }
    }
    match remote {
        Some(doc) => doc.apply_to(&mut preset),
        None => preset.view_mode = preset.view_mode_permission.gate(preset.view_mode),
    }
    Resolved { preset, debug_mode }
}

#[derive(Debug, Clone, Deserialize)]
struct SaveAck {
    ok: bool,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret the save endpoint's reply; `Ok` carries the written path.
pub fn parse_save_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_str::<SaveAck>(body)
            .ok()
            .and_then(|a| a.error)
            .unwrap_or_else(|| body.to_string());
        return Err(PanoError::Save(format!("HTTP {}: {}", status, detail)));
    }
    let ack: SaveAck = serde_json::from_str(body)
        .map_err(|_| PanoError::Save(format!("invalid response: {}", body)))?;
    if ack.ok {
        Ok(ack.path.unwrap_or_default())
    } else {
        Err(PanoError::Save(
            ack.error.unwrap_or_else(|| body.to_string()),
        ))
    }
}

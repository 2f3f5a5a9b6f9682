//! Per-file light state: intensity, on/off, dimmable, daylight slaving.
//!
//! Intensity and on/off are independent axes; a light may hold a nonzero
//! intensity while switched off. Hotspot links are not stored here, see
//! [`crate::hotspots::HotspotSet::linked_hotspots`].

use crate::constants::{
    DAYLIGHT_KEY, DEFAULT_DAYLIGHT_INTENSITY, DEFAULT_LIGHT_INTENSITY, MAX_INTENSITY,
};
use crate::hotspot::HotspotId;
use crate::labels::{self, LightGroup};
use crate::lenient::{lenient, lenient_list, lenient_number};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// filename → intensity in [0, 100], plus the `__daylight` pseudo-key.
pub type IntensityMap = BTreeMap<String, f32>;

#[derive(Debug, Clone, PartialEq)]
pub struct LightState {
    pub display_name: String,
    pub on: bool,
    pub dimmable: bool,
}

/// Wire form of a light inside a preset's `lightsState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LightRecord {
    #[serde(alias = "nome", deserialize_with = "lenient")]
    pub display_name: String,
    #[serde(alias = "estado", deserialize_with = "lenient")]
    pub on: bool,
    #[serde(alias = "dimmerizavel", deserialize_with = "lenient")]
    pub dimmable: bool,
    #[serde(
        alias = "valor",
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub intensity: Option<f32>,
    /// Derived on write; ignored on read.
    #[serde(alias = "pontos", deserialize_with = "lenient_list")]
    pub linked_hotspot_ids: Vec<HotspotId>,
}

impl Default for LightRecord {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            on: true,
            dimmable: false,
            intensity: None,
            linked_hotspot_ids: Vec::new(),
        }
    }
}

#[inline]
fn clamp_intensity(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, MAX_INTENSITY)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct LightBoard {
    files: Vec<String>,
    lights: BTreeMap<String, LightState>,
    values: IntensityMap,
    daylight_targets: Vec<String>,
}

impl LightBoard {
    /// Defaults for a freshly loaded manifest.
    pub fn from_files<S: AsRef<str>>(files: &[S]) -> Self {
        let files = labels::sort_lights(files);
        let mut lights = BTreeMap::new();
        let mut values = IntensityMap::new();
        for f in &files {
            if labels::is_final(f) {
                values.insert(f.clone(), 0.0);
            } else {
                values.insert(f.clone(), DEFAULT_LIGHT_INTENSITY);
                lights.insert(
                    f.clone(),
                    LightState {
                        display_name: labels::sanitize_label(f),
                        on: true,
                        dimmable: false,
                    },
                );
            }
        }
        values.insert(DAYLIGHT_KEY.to_string(), DEFAULT_DAYLIGHT_INTENSITY);
        log::debug!(
            "[lights] board with {} files ({} lights)",
            files.len(),
            lights.len()
        );
        Self {
            files,
            lights,
            values,
            daylight_targets: Vec::new(),
        }
    }

    /// Every file in canonical order, FINAL files first.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn contains(&self, file: &str) -> bool {
        self.values.contains_key(file) && file != DAYLIGHT_KEY
    }

    pub fn light(&self, file: &str) -> Option<&LightState> {
        self.lights.get(file)
    }

    /// Non-FINAL lights in canonical order.
    pub fn lights(&self) -> impl Iterator<Item = (&str, &LightState)> + '_ {
        self.files
            .iter()
            .filter_map(|f| self.lights.get(f).map(|l| (f.as_str(), l)))
    }

    pub fn values(&self) -> &IntensityMap {
        &self.values
    }

    /// Stored intensity, 0 for unknown files.
    pub fn intensity(&self, file: &str) -> f32 {
        self.values.get(file).copied().unwrap_or(0.0)
    }

    pub fn daylight(&self) -> f32 {
        self.values
            .get(DAYLIGHT_KEY)
            .copied()
            .unwrap_or(DEFAULT_DAYLIGHT_INTENSITY)
    }

    pub fn daylight_targets(&self) -> &[String] {
        &self.daylight_targets
    }

    /// Replace the daylight set; unknown, FINAL and duplicate entries are dropped.
    pub fn set_daylight_targets<S: AsRef<str>>(&mut self, targets: &[S]) {
        let mut out: Vec<String> = Vec::with_capacity(targets.len());
        for t in targets.iter().map(AsRef::as_ref) {
            if !self.lights.contains_key(t) {
                log::debug!("[lights] ignoring daylight target {:?}", t);
                continue;
            }
            if !out.iter().any(|o| o == t) {
                out.push(t.to_string());
            }
        }
        self.daylight_targets = out;
    }

    pub fn toggle_daylight_target(&mut self, file: &str) {
        if let Some(i) = self.daylight_targets.iter().position(|t| t == file) {
            self.daylight_targets.remove(i);
        } else if self.lights.contains_key(file) {
            self.daylight_targets.push(file.to_string());
        }
    }

    pub fn is_daylight_target(&self, file: &str) -> bool {
        self.daylight_targets.iter().any(|t| t == file)
    }

    /// Clamp and store; the daylight key fans out to every target.
    pub fn set_intensity(&mut self, file: &str, value: f32) {
        let v = clamp_intensity(value);
        if file == DAYLIGHT_KEY {
            self.values.insert(DAYLIGHT_KEY.to_string(), v);
            let targets = self.daylight_targets.clone();
            for t in &targets {
                self.write_light(t, v);
            }
            return;
        }
        if !self.values.contains_key(file) {
            log::debug!("[lights] set_intensity on unknown file {:?}", file);
            return;
        }
        self.write_light(file, v);
    }

    fn write_light(&mut self, file: &str, v: f32) {
        self.values.insert(file.to_string(), v);
        if let Some(l) = self.lights.get_mut(file) {
            if l.dimmable {
                l.on = true;
            }
        }
    }

    pub fn toggle_on(&mut self, file: &str) {
        if let Some(l) = self.lights.get_mut(file) {
            l.on = !l.on;
        }
    }

    pub fn toggle_dimmable(&mut self, file: &str) {
        if let Some(l) = self.lights.get_mut(file) {
            l.dimmable = !l.dimmable;
        }
    }

    pub fn set_display_name(&mut self, file: &str, name: &str) {
        if let Some(l) = self.lights.get_mut(file) {
            l.display_name = name.to_string();
        }
    }

    /// Layer-manager eye button: > 0 goes to 0, otherwise to full.
    pub fn toggle_layer_visibility(&mut self, file: &str) {
        if !self.contains(file) {
            return;
        }
        let next = if self.intensity(file) > 0.0 {
            0.0
        } else {
            MAX_INTENSITY
        };
        self.values.insert(file.to_string(), next);
    }

    pub fn turn_off_except_daylight(&mut self) {
        let keep = self.daylight_targets.clone();
        for (file, light) in self.lights.iter_mut() {
            if keep.iter().any(|k| k == file) {
                continue;
            }
            light.on = false;
            self.values.insert(file.clone(), 0.0);
        }
        log::info!("[lights] all off except {} daylight targets", keep.len());
    }

    /// Reapply a loaded preset's lights, or force everything fully on.
    pub fn preset_all(&mut self, loaded: Option<(&IntensityMap, &BTreeMap<String, LightRecord>)>) {
        match loaded {
            Some((values, records)) => {
                self.apply_records(values, records);
                for file in records.keys() {
                    if let Some(l) = self.lights.get_mut(file) {
                        l.on = true;
                    }
                }
            }
            None => {
                for (file, light) in self.lights.iter_mut() {
                    light.on = true;
                    self.values.insert(file.clone(), MAX_INTENSITY);
                }
                for f in self.files.iter().filter(|f| labels::is_final(f)) {
                    self.values.insert(f.clone(), 0.0);
                }
            }
        }
    }

    /// Overlay stored values and records onto the current board.
    ///
    /// Entries naming files outside the manifest are skipped; the daylight
    /// value is restored without fanning out.
    pub fn apply_records(&mut self, values: &IntensityMap, records: &BTreeMap<String, LightRecord>) {
        for (file, rec) in records {
            let Some(l) = self.lights.get_mut(file) else {
                log::debug!("[lights] preset names unknown light {:?}", file);
                continue;
            };
            if !rec.display_name.trim().is_empty() {
                l.display_name = rec.display_name.clone();
            }
            l.on = rec.on;
            l.dimmable = rec.dimmable;
            if let Some(v) = rec.intensity {
                self.values.insert(file.clone(), clamp_intensity(v));
            }
        }
        for (file, v) in values {
            if file == DAYLIGHT_KEY || self.values.contains_key(file) {
                self.values.insert(file.clone(), clamp_intensity(*v));
            }
        }
    }

    /// Effective opacity of a light layer.
    pub fn opacity(&self, file: &str) -> f32 {
        match self.lights.get(file) {
            Some(l) if l.on => self.intensity(file) / MAX_INTENSITY,
            Some(_) => 0.0,
            None => 0.0,
        }
    }

    /// Lights exposed on the end-user panel.
    pub fn dimmable_lights(&self) -> Vec<&str> {
        self.lights()
            .filter(|(_, l)| l.dimmable)
            .map(|(f, _)| f)
            .collect()
    }

    /// Non-FINAL lights grouped by numeric prefix.
    pub fn light_groups(&self) -> Vec<LightGroup> {
        let names: Vec<&str> = self.lights().map(|(f, _)| f).collect();
        labels::group_by_number(&names)
    }

    /// Wire records, with link lists supplied by the caller.
    pub fn records<F>(&self, mut links: F) -> BTreeMap<String, LightRecord>
    where
        F: FnMut(&str) -> Vec<HotspotId>,
    {
        self.lights()
            .map(|(f, l)| {
                (
                    f.to_string(),
                    LightRecord {
                        display_name: l.display_name.clone(),
                        on: l.on,
                        dimmable: l.dimmable,
                        intensity: Some(self.intensity(f)),
                        linked_hotspot_ids: links(f),
                    },
                )
            })
            .collect()
    }
}

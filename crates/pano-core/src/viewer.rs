//! The `Viewer` aggregate: one environment's lights, hotspots, layer order,
//! view mode, adjustments and camera, plus the editor/session flags.
//!
//! Front-ends translate DOM events into these calls and render from
//! [`Viewer::composite`] and [`Viewer::hotspot_visuals`]; neither of those
//! mutates anything.

use crate::compositor::{compose, Adjustments, LayerDraw};
use crate::constants::{MAX_INTENSITY, SPHERE_RADIUS};
use crate::error::{PanoError, Result};
use crate::gesture::{DragEnd, DragTarget, GestureCoordinator};
use crate::geometry::{project_to_sphere, Ray};
use crate::hotspot::{HotspotEdit, HotspotId, HotspotKind, KindTag};
use crate::hotspots::HotspotSet;
use crate::labels;
use crate::lights::LightBoard;
use crate::polygon::{self, FanCheck};
use crate::preset::{resolve, LocalSnapshot, PresetDocument, ViewerPreset};
use crate::state::{Camera, OrbitCamera};
use crate::view_mode::{ViewMode, ViewModePermission, ViewModeState};
use crate::visuals::{self, HotspotVisual, PickHit};

/// What a click on a hotspot (or the background) did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Nothing,
    Selected(HotspotId),
    ToggledLights(Vec<String>),
    /// Load this environment next.
    Navigate(String),
    Swapped(String),
    VertexAdded { hotspot: HotspotId, count: usize },
}

#[derive(Debug)]
pub struct Viewer {
    env_id: Option<String>,
    board: LightBoard,
    hotspots: HotspotSet,
    layers: Vec<String>,
    view: ViewModeState,
    adjustments: Adjustments,
    orbit: OrbitCamera,
    debug: bool,
    selected: Option<HotspotId>,
    drawing: bool,
    gesture: GestureCoordinator,
    loaded: Option<ViewerPreset>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::with_hotspots(HotspotSet::new())
    }
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic hotspot ids.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_hotspots(HotspotSet::with_seed(seed))
    }

    fn with_hotspots(hotspots: HotspotSet) -> Self {
        Self {
            env_id: None,
            board: LightBoard::default(),
            hotspots,
            layers: Vec::new(),
            view: ViewModeState::default(),
            adjustments: Adjustments::default(),
            orbit: OrbitCamera::default(),
            debug: false,
            selected: None,
            drawing: false,
            gesture: GestureCoordinator::new(),
            loaded: None,
        }
    }

    /// Built-in tier of `resolve` for a manifest.
    pub fn defaults_for<S: AsRef<str>>(files: &[S]) -> ViewerPreset {
        let mut board = LightBoard::from_files(files);
        board.set_daylight_targets(&labels::suggest_daylight_targets(files));
        ViewerPreset {
            values: board.values().clone(),
            lights_state: board.records(|_| Vec::new()),
            hotspots: Vec::new(),
            layers: board.files().to_vec(),
            daylight_targets: board.daylight_targets().to_vec(),
            ..ViewerPreset::default()
        }
    }

    /// Replace all per-environment state.
    ///
    /// Adjustments and camera carry over from the current session unless the
    /// local snapshot or preset supplies them.
    pub fn load_environment<S: AsRef<str>>(
        &mut self,
        env_id: &str,
        files: &[S],
        local: Option<&LocalSnapshot>,
        remote: Option<&PresetDocument>,
    ) {
        let mut defaults = Self::defaults_for(files);
        defaults.adjustments = self.adjustments;
        defaults.camera = self.orbit.pose();
        let resolved = resolve(defaults, local, remote);
        let p = resolved.preset;

        let mut board = LightBoard::from_files(files);
        board.apply_records(&p.values, &p.lights_state);
        board.set_daylight_targets(&p.daylight_targets);

        self.layers = reconcile_layers(&p.layers, board.files());
        self.board = board;
        self.hotspots.replace_all(p.hotspots.clone());
        self.view = ViewModeState::new(p.view_mode, p.view_mode_permission);
        self.adjustments = p.adjustments.clamped();
        self.orbit = OrbitCamera::from_pose(p.camera);
        if local.and_then(|l| l.debug_mode).is_some() {
            self.debug = resolved.debug_mode;
        }
        self.selected = None;
        self.drawing = false;
        _ = self.gesture.end();
        self.loaded = remote.map(|_| p);
        self.env_id = Some(env_id.to_string());
        log::info!(
            "[viewer] loaded {} ({} files, {} hotspots, mode {:?}, preset {})",
            env_id,
            self.board.files().len(),
            self.hotspots.len(),
            self.view.mode(),
            if self.loaded.is_some() { "yes" } else { "no" }
        );
    }

    pub fn env_id(&self) -> Option<&str> {
        self.env_id.as_deref()
    }

    pub fn board(&self) -> &LightBoard {
        &self.board
    }

    pub fn hotspots(&self) -> &HotspotSet {
        &self.hotspots
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn view(&self) -> &ViewModeState {
        &self.view
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn selected(&self) -> Option<&HotspotId> {
        self.selected.as_ref()
    }

    pub fn drawing(&self) -> bool {
        self.drawing
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn orbit(&self) -> &OrbitCamera {
        &self.orbit
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        self.orbit.camera(aspect)
    }

    pub fn rotate_camera(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        self.orbit.rotate_by_pixels(dx, dy, viewport_height);
    }

    // ---- lights ----

    pub fn set_intensity(&mut self, file: &str, value: f32) {
        self.board.set_intensity(file, value);
    }

    pub fn toggle_on(&mut self, file: &str) {
        self.board.toggle_on(file);
    }

    pub fn toggle_dimmable(&mut self, file: &str) {
        self.board.toggle_dimmable(file);
    }

    pub fn toggle_daylight_target(&mut self, file: &str) {
        self.board.toggle_daylight_target(file);
    }

    pub fn toggle_layer_visibility(&mut self, file: &str) {
        self.board.toggle_layer_visibility(file);
    }

    pub fn turn_off_except_daylight(&mut self) {
        self.board.turn_off_except_daylight();
    }

    pub fn preset_all(&mut self) {
        let loaded = self.loaded.as_ref().map(|p| (&p.values, &p.lights_state));
        self.board.preset_all(loaded);
    }

    // ---- view / session ----

    pub fn toggle_view_mode(&mut self) -> bool {
        self.view.toggle(self.debug)
    }

    pub fn set_view_permission(&mut self, permission: ViewModePermission) {
        self.view.set_permission(permission);
    }

    pub fn set_adjustments(&mut self, adjustments: Adjustments) {
        self.adjustments = adjustments.clamped();
    }

    /// Browser-stored UI subset, applied before any environment has loaded.
    pub fn apply_local(&mut self, local: &LocalSnapshot) {
        if let Some(a) = local.adjustments {
            self.set_adjustments(a);
        }
        if let Some(d) = local.debug_mode {
            if d != self.debug {
                self.toggle_debug();
            }
        }
        if let Some(m) = local.view_mode {
            self.view = ViewModeState::new(m, self.view.permission());
        }
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        if !self.debug {
            self.stop_editing();
        }
        log::info!("[viewer] debug {}", self.debug);
        self.debug
    }

    /// Stop drawing, drop the selection and any drag.
    pub fn stop_editing(&mut self) {
        self.drawing = false;
        self.selected = None;
        _ = self.gesture.end();
    }

    /// Move the layer at `from` to index `to`.
    pub fn reorder_layers(&mut self, from: usize, to: usize) -> bool {
        if from >= self.layers.len() || to >= self.layers.len() {
            return false;
        }
        if from != to {
            let item = self.layers.remove(from);
            self.layers.insert(to, item);
        }
        true
    }

    // ---- hotspot editing ----

    fn require_debug(&self) -> Result<()> {
        if self.debug {
            Ok(())
        } else {
            Err(PanoError::NotEditing)
        }
    }

    pub fn select(&mut self, id: Option<HotspotId>) -> Result<()> {
        self.require_debug()?;
        if let Some(id) = &id {
            if self.hotspots.get(id).is_none() {
                return Err(PanoError::UnknownHotspot(id.clone()));
            }
        }
        if self.selected != id {
            self.drawing = false;
        }
        self.selected = id;
        Ok(())
    }

    /// Double-click: new switch hotspot where the ray meets the sphere.
    pub fn create_hotspot(&mut self, kind: KindTag, ray: Ray) -> Result<HotspotId> {
        self.require_debug()?;
        let id = self
            .hotspots
            .create_at(kind, project_to_sphere(ray, SPHERE_RADIUS));
        self.selected = Some(id.clone());
        self.drawing = false;
        Ok(id)
    }

    pub fn edit_hotspot(&mut self, id: &HotspotId, edit: HotspotEdit) -> Result<()> {
        self.require_debug()?;
        self.hotspots.apply(id, edit)?;
        if self.selected.as_ref() == Some(id)
            && self.hotspots.get(id).and_then(|h| h.polygon_points()).is_none()
        {
            self.drawing = false;
        }
        Ok(())
    }

    pub fn commit_lights<I, S>(&mut self, id: &HotspotId, selection: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_debug()?;
        let board = &self.board;
        let lights: Vec<String> = selection
            .into_iter()
            .map(Into::into)
            .filter(|f| {
                let known = board.light(f).is_some();
                if !known {
                    log::debug!("[hotspot] ignoring link to {:?}", f);
                }
                known
            })
            .collect();
        self.hotspots.commit_lights(id, lights)
    }

    pub fn delete_hotspot(&mut self, id: &HotspotId) -> Result<()> {
        self.require_debug()?;
        self.hotspots.delete(id)?;
        self.gesture.cancel_for(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
            self.drawing = false;
        }
        Ok(())
    }

    pub fn duplicate_hotspot(&mut self, id: &HotspotId) -> Result<HotspotId> {
        self.require_debug()?;
        let new_id = self.hotspots.duplicate(id)?;
        self.selected = Some(new_id.clone());
        self.drawing = false;
        Ok(new_id)
    }

    pub fn clear_points(&mut self, id: &HotspotId) -> Result<()> {
        self.require_debug()?;
        self.hotspots.clear_points(id)
    }

    /// Flip polygon drawing for the selected hotspot. Stopping keeps the points.
    pub fn toggle_drawing(&mut self) -> Result<bool> {
        self.require_debug()?;
        let Some(id) = self.selected.clone() else {
            log::debug!("[viewer] drawing needs a selected polygon");
            return Ok(false);
        };
        let h = self
            .hotspots
            .get(&id)
            .ok_or_else(|| PanoError::UnknownHotspot(id.clone()))?;
        if h.polygon_points().is_none() {
            return Err(PanoError::WrongKind {
                id,
                expected: "polygon",
            });
        }
        self.drawing = !self.drawing;
        if !self.drawing {
            if let Some(points) = h.polygon_points() {
                let check = polygon::check_fan(points);
                if check != FanCheck::Valid && check != FanCheck::TooFewPoints {
                    log::warn!("[polygon] {} outline is {:?}", id, check);
                }
            }
        }
        Ok(self.drawing)
    }

    // ---- pointer ----

    /// Primary click on a hotspot marker.
    pub fn click_hotspot(&mut self, id: &HotspotId) -> Result<ClickOutcome> {
        let h = self
            .hotspots
            .get(id)
            .ok_or_else(|| PanoError::UnknownHotspot(id.clone()))?;
        if self.debug {
            if self.drawing {
                return Ok(ClickOutcome::Nothing);
            }
            self.selected = Some(id.clone());
            return Ok(ClickOutcome::Selected(id.clone()));
        }
        if !self.view.interactive(h.tag()) {
            return Ok(ClickOutcome::Nothing);
        }
        let outcome = match &h.kind {
            HotspotKind::Switch { lights, .. } => {
                let files: Vec<String> = lights.iter().cloned().collect();
                for f in &files {
                    self.board.toggle_on(f);
                }
                ClickOutcome::ToggledLights(files)
            }
            HotspotKind::Portal {
                target_environment, ..
            } => match target_environment {
                Some(env) => ClickOutcome::Navigate(env.clone()),
                None => ClickOutcome::Nothing,
            },
            HotspotKind::Swap { target_images } => {
                let targets = target_images.clone();
                match self.advance_swap(&targets) {
                    Some(next) => ClickOutcome::Swapped(next),
                    None => ClickOutcome::Nothing,
                }
            }
        };
        log::info!("[hotspot] click {} -> {:?}", id, outcome);
        Ok(outcome)
    }

    fn advance_swap(&mut self, targets: &[String]) -> Option<String> {
        if targets.is_empty() {
            return None;
        }
        let next = targets
            .iter()
            .position(|t| self.board.intensity(t) > 0.0)
            .map_or(0, |i| (i + 1) % targets.len());
        for t in targets {
            self.board.set_intensity(t, 0.0);
        }
        self.board.set_intensity(&targets[next], MAX_INTENSITY);
        Some(targets[next].clone())
    }

    /// Click on empty sphere: appends a vertex while drawing.
    pub fn click_background(&mut self, ray: Ray) -> Result<ClickOutcome> {
        if !(self.debug && self.drawing) {
            return Ok(ClickOutcome::Nothing);
        }
        let Some(id) = self.selected.clone() else {
            return Ok(ClickOutcome::Nothing);
        };
        let count = self
            .hotspots
            .append_vertex(&id, project_to_sphere(ray, SPHERE_RADIUS))?;
        Ok(ClickOutcome::VertexAdded { hotspot: id, count })
    }

    /// Visuals, then the nearest marker along `ray`.
    pub fn pick(&self, ray: Ray) -> Option<PickHit> {
        visuals::pick(ray, &self.hotspot_visuals())
    }

    /// Whether a press on a marker may turn into a drag. Drawing claims
    /// every click for new vertices, so nothing is draggable then.
    pub fn can_drag(&self) -> bool {
        self.debug && !self.drawing && !self.gesture.is_dragging()
    }

    /// Start dragging the marker or handle under a press; true when a drag started.
    pub fn pointer_down(&mut self, hit: &PickHit) -> bool {
        if !self.can_drag() {
            return false;
        }
        let target = match hit {
            PickHit::Hotspot(id) => DragTarget::Hotspot(id.clone()),
            PickHit::Vertex { hotspot, index } => DragTarget::Vertex {
                hotspot: hotspot.clone(),
                index: *index,
            },
        };
        self.gesture.begin(target, self.debug)
    }

    /// A completed click. While drawing every click lands on the picking
    /// sphere, even over the polygon's own fill or another marker.
    pub fn click(&mut self, hit: Option<&PickHit>, ray: Ray) -> Result<ClickOutcome> {
        if self.debug && self.drawing {
            return self.click_background(ray);
        }
        match hit {
            Some(PickHit::Hotspot(id)) => {
                let id = id.clone();
                self.click_hotspot(&id)
            }
            Some(PickHit::Vertex { .. }) => Ok(ClickOutcome::Nothing),
            None => self.click_background(ray),
        }
    }

    /// Window-level pointermove; true when something moved.
    pub fn pointer_move(&mut self, ray: Ray, buttons: u16) -> bool {
        let Some(m) = self.gesture.update(ray, buttons) else {
            return false;
        };
        let res = match &m.target {
            DragTarget::Hotspot(id) => self.hotspots.move_to(id, m.point),
            DragTarget::Vertex { hotspot, index } => {
                self.hotspots.move_vertex(hotspot, *index, m.point)
            }
        };
        match res {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[gesture] dropping drag: {}", e);
                _ = self.gesture.end();
                false
            }
        }
    }

    /// pointerup / pointercancel / pointerleave.
    pub fn pointer_up(&mut self) -> Option<DragEnd> {
        self.gesture.end()
    }

    // ---- output ----

    /// Target layer stack for this frame.
    pub fn composite(&self) -> Vec<LayerDraw> {
        compose(&self.layers, self.view.mode(), &self.board)
    }

    pub fn hotspot_visuals(&self) -> Vec<HotspotVisual> {
        visuals::hotspot_visuals(
            self.hotspots.iter(),
            &self.view,
            self.debug,
            self.selected.as_ref(),
            self.drawing,
        )
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view.mode()
    }

    /// Full preset for save and export.
    pub fn snapshot(&self) -> ViewerPreset {
        ViewerPreset {
            values: self.board.values().clone(),
            lights_state: self
                .board
                .records(|f| self.hotspots.linked_hotspots(f)),
            hotspots: self.hotspots.to_vec(),
            layers: self.layers.clone(),
            daylight_targets: self.board.daylight_targets().to_vec(),
            adjustments: self.adjustments,
            camera: self.orbit.pose(),
            view_mode_permission: self.view.permission(),
            view_mode: self.view.mode(),
        }
    }

    pub fn local_snapshot(&self) -> LocalSnapshot {
        LocalSnapshot {
            debug_mode: Some(self.debug),
            adjustments: Some(self.adjustments),
            view_mode: Some(self.view.mode()),
        }
    }
}

/// Stored order for known files, then any new files in canonical order.
fn reconcile_layers(stored: &[String], files: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(files.len());
    for f in stored {
        if files.contains(f) && !out.contains(f) {
            out.push(f.clone());
        } else if !files.contains(f) {
            log::debug!("[viewer] dropping layer {:?} missing from manifest", f);
        }
    }
    for f in files {
        if !out.contains(f) {
            out.push(f.clone());
        }
    }
    out
}

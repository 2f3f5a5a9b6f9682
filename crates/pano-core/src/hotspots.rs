//! The hotspot collection and its editor operations.
//!
//! `Hotspot::kind` owns the only copy of switch → light links. The reverse
//! index (light → hotspot ids) is derived and rebuilt after every change that
//! can touch links, so both directions always agree.

use crate::constants::{COLOR_HISTORY_LEN, DEFAULT_COLOR_HISTORY, DUPLICATE_OFFSET};
use crate::error::{PanoError, Result};
use crate::hotspot::{Hotspot, HotspotEdit, HotspotId, HotspotKind, KindTag, Shape};
use glam::Vec3;
use rand::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

pub type LinkIndex = BTreeMap<String, BTreeSet<HotspotId>>;

#[derive(Debug, Clone)]
pub struct HotspotSet {
    items: Vec<Hotspot>,
    links: LinkIndex,
    rng: StdRng,
    color_history: Vec<String>,
}

impl Default for HotspotSet {
    fn default() -> Self {
        Self::new()
    }
}

impl HotspotSet {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic id sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            items: Vec::new(),
            links: LinkIndex::new(),
            rng,
            color_history: DEFAULT_COLOR_HISTORY.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Replace the contents, deduplicating ids (later duplicates get fresh ones).
    pub fn replace_all(&mut self, hotspots: Vec<Hotspot>) {
        self.items.clear();
        for mut h in hotspots {
            if h.id.as_str().is_empty() || self.get(&h.id).is_some() {
                let fresh = self.fresh_id();
                log::warn!("[hotspot] reassigning duplicate id {:?} -> {}", h.id.as_str(), fresh);
                h.id = fresh;
            }
            self.items.push(h);
        }
        self.rebuild_links();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.links.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> + '_ {
        self.items.iter()
    }

    pub fn get(&self, id: &HotspotId) -> Option<&Hotspot> {
        self.items.iter().find(|h| &h.id == id)
    }

    fn get_mut(&mut self, id: &HotspotId) -> Result<&mut Hotspot> {
        self.items
            .iter_mut()
            .find(|h| &h.id == id)
            .ok_or_else(|| PanoError::UnknownHotspot(id.clone()))
    }

    pub fn to_vec(&self) -> Vec<Hotspot> {
        self.items.clone()
    }

    fn fresh_id(&mut self) -> HotspotId {
        loop {
            let id = HotspotId::new(format!("hs-{:016x}", self.rng.gen::<u64>()));
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn rebuild_links(&mut self) {
        let mut links = LinkIndex::new();
        for h in &self.items {
            for file in h.lights() {
                links
                    .entry(file.to_string())
                    .or_default()
                    .insert(h.id.clone());
            }
        }
        self.links = links;
    }

    /// Switch hotspots linked to `file`.
    pub fn linked_hotspots(&self, file: &str) -> Vec<HotspotId> {
        self.links
            .get(file)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn link_index(&self) -> &LinkIndex {
        &self.links
    }

    /// New hotspot of `kind` at a sphere-surface point.
    pub fn create_at(&mut self, kind: KindTag, position: Vec3) -> HotspotId {
        let id = self.fresh_id();
        let h = Hotspot::new(id.clone(), position, HotspotKind::with_defaults(kind));
        log::info!(
            "[hotspot] created {} {} at ({:.2},{:.2},{:.2})",
            kind.as_str(),
            id,
            position.x,
            position.y,
            position.z
        );
        self.items.push(h);
        id
    }

    /// Field edit from the editor panel.
    pub fn apply(&mut self, id: &HotspotId, edit: HotspotEdit) -> Result<()> {
        let color = match &edit {
            HotspotEdit::Color(c) => Some(c.clone()),
            _ => None,
        };
        let retyped = matches!(edit, HotspotEdit::Kind(_));
        self.get_mut(id)?.apply(edit)?;
        if let Some(c) = color {
            self.remember_color(&c);
        }
        if retyped {
            self.rebuild_links();
        }
        Ok(())
    }

    /// Set a switch's light selection. The only path that changes links.
    pub fn commit_lights<I, S>(&mut self, id: &HotspotId, selection: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let h = self.get_mut(id)?;
        let HotspotKind::Switch { lights, .. } = &mut h.kind else {
            return Err(PanoError::WrongKind {
                id: id.clone(),
                expected: "switch",
            });
        };
        *lights = selection.into_iter().map(Into::into).collect();
        let n = lights.len();
        self.rebuild_links();
        log::info!("[hotspot] {} linked to {} lights", id, n);
        Ok(())
    }

    pub fn delete(&mut self, id: &HotspotId) -> Result<Hotspot> {
        let i = self
            .items
            .iter()
            .position(|h| &h.id == id)
            .ok_or_else(|| PanoError::UnknownHotspot(id.clone()))?;
        let removed = self.items.remove(i);
        self.rebuild_links();
        log::info!("[hotspot] deleted {}", id);
        Ok(removed)
    }

    /// Clone with a fresh id, offset on x and y.
    pub fn duplicate(&mut self, id: &HotspotId) -> Result<HotspotId> {
        let mut copy = self
            .get(id)
            .cloned()
            .ok_or_else(|| PanoError::UnknownHotspot(id.clone()))?;
        let new_id = self.fresh_id();
        copy.id = new_id.clone();
        copy.position += Vec3::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET, 0.0);
        self.items.push(copy);
        self.rebuild_links();
        log::info!("[hotspot] duplicated {} -> {}", id, new_id);
        Ok(new_id)
    }

    pub fn move_to(&mut self, id: &HotspotId, position: Vec3) -> Result<()> {
        self.get_mut(id)?.position = position;
        Ok(())
    }

    pub fn append_vertex(&mut self, id: &HotspotId, point: Vec3) -> Result<usize> {
        let points = self.get_mut(id)?.polygon_points_mut()?;
        points.push(point);
        Ok(points.len())
    }

    pub fn move_vertex(&mut self, id: &HotspotId, index: usize, point: Vec3) -> Result<()> {
        let points = self.get_mut(id)?.polygon_points_mut()?;
        let len = points.len();
        let slot = points.get_mut(index).ok_or_else(|| PanoError::VertexOutOfRange {
            id: id.clone(),
            index,
            len,
        })?;
        *slot = point;
        Ok(())
    }

    pub fn clear_points(&mut self, id: &HotspotId) -> Result<()> {
        self.get_mut(id)?.polygon_points_mut()?.clear();
        Ok(())
    }

    /// Most recent first, no duplicates.
    pub fn color_history(&self) -> &[String] {
        &self.color_history
    }

    fn remember_color(&mut self, color: &str) {
        if self.color_history.iter().any(|c| c == color) {
            return;
        }
        self.color_history.insert(0, color.to_string());
        self.color_history.truncate(COLOR_HISTORY_LEN);
    }

    /// Swap hotspots referencing files outside `known`.
    pub fn dangling_swap_targets<'a>(&'a self, known: &'a [String]) -> Vec<(&'a HotspotId, &'a str)> {
        self.items
            .iter()
            .filter_map(|h| match &h.kind {
                HotspotKind::Swap { target_images } => Some((h, target_images)),
                _ => None,
            })
            .flat_map(|(h, imgs)| {
                imgs.iter()
                    .filter(|i| !known.contains(i))
                    .map(move |i| (&h.id, i.as_str()))
            })
            .collect()
    }

    /// Polygon switches, for validation passes.
    pub fn polygons(&self) -> impl Iterator<Item = (&HotspotId, &[Vec3])> + '_ {
        self.items.iter().filter_map(|h| match &h.kind {
            HotspotKind::Switch {
                shape: Shape::Polygon { points },
                ..
            } => Some((&h.id, points.as_slice())),
            _ => None,
        })
    }
}

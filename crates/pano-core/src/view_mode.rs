use crate::hotspot::KindTag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Additive light stack.
    #[default]
    Lights,
    /// Precomposed FINAL render.
    Final,
}

impl ViewMode {
    pub fn other(self) -> Self {
        match self {
            ViewMode::Lights => ViewMode::Final,
            ViewMode::Final => ViewMode::Lights,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewModePermission {
    FinalOnly,
    LightsOnly,
    #[default]
    Both,
}

impl ViewModePermission {
    /// The mode a restrictive permission pins the viewer to.
    pub fn forced_mode(self) -> Option<ViewMode> {
        match self {
            ViewModePermission::FinalOnly => Some(ViewMode::Final),
            ViewModePermission::LightsOnly => Some(ViewMode::Lights),
            ViewModePermission::Both => None,
        }
    }

    /// `mode` if allowed, else the forced one.
    pub fn gate(self, mode: ViewMode) -> ViewMode {
        self.forced_mode().unwrap_or(mode)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewModeState {
    mode: ViewMode,
    permission: ViewModePermission,
}

impl ViewModeState {
    pub fn new(mode: ViewMode, permission: ViewModePermission) -> Self {
        Self {
            mode: permission.gate(mode),
            permission,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn permission(&self) -> ViewModePermission {
        self.permission
    }

    /// Flip the mode. Outside debug mode only `Both` allows it.
    pub fn toggle(&mut self, debug: bool) -> bool {
        if self.permission != ViewModePermission::Both && !debug {
            log::debug!("[view] toggle blocked by {:?}", self.permission);
            return false;
        }
        self.mode = self.mode.other();
        log::info!("[view] mode -> {:?}", self.mode);
        true
    }

    /// Explicit mode request, with the same gating as `toggle`.
    pub fn request(&mut self, mode: ViewMode, debug: bool) -> bool {
        if mode == self.mode {
            return true;
        }
        self.toggle(debug)
    }

    pub fn set_permission(&mut self, permission: ViewModePermission) {
        self.permission = permission;
        if let Some(forced) = permission.forced_mode() {
            self.mode = forced;
        }
        log::info!("[view] permission {:?}, mode {:?}", permission, self.mode);
    }

    pub fn switches_active(&self) -> bool {
        self.mode != ViewMode::Final
    }

    pub fn swaps_active(&self) -> bool {
        self.mode != ViewMode::Lights
    }

    /// Whether a click on a hotspot of `kind` does anything right now.
    pub fn interactive(&self, kind: KindTag) -> bool {
        match kind {
            KindTag::Switch => self.switches_active(),
            KindTag::Portal => true,
            KindTag::Swap => self.swaps_active(),
        }
    }
}

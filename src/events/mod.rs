mod keyboard;
mod pointer;

pub use keyboard::{run_command, wire_global_keydown};
pub use pointer::{wire_input_handlers, InputWiring};

use crate::session::{self, AppHandles};
use crate::{dom, editor, overlay, panel};
use pano_core::ClickOutcome;

/// Reflect a click's effect outside the viewer.
pub(crate) fn apply_outcome(app: &AppHandles, outcome: ClickOutcome) {
    match outcome {
        ClickOutcome::Navigate(env_id) => session::open_environment(app, env_id),
        ClickOutcome::ToggledLights(_) | ClickOutcome::Swapped(_) => {
            if let Some(document) = dom::window_document() {
                panel::sync_values(&document, &app.viewer.borrow());
            }
        }
        ClickOutcome::Selected(id) => {
            log::debug!("[hotspot] selected {}", id);
            refresh_editor(app);
        }
        ClickOutcome::VertexAdded { hotspot, count } => {
            log::debug!("[polygon] {} now has {} points", hotspot, count);
            refresh_editor(app);
        }
        ClickOutcome::Nothing => {}
    }
}

pub(crate) fn refresh_editor(app: &AppHandles) {
    if let Some(document) = dom::window_document() {
        editor::rebuild(&document, app);
    }
}

pub(crate) fn report(app: &AppHandles, err: pano_core::PanoError) {
    log::warn!("[viewer] {}", err);
    if let Some(document) = dom::window_document() {
        overlay::toast(&document, &err.to_string(), true);
    }
    app.refresh_chrome();
}

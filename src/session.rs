//! Environment loading, saving and exporting. Every network result is
//! applied to the viewer as one step when it arrives; a stale result for an
//! environment that is no longer current is dropped.

use crate::{dom, editor, export, layer_manager, net, overlay, panel, settings, storage};
use pano_core::constants::{
    ENVIRONMENTS_PATH, ENV_QUERY_PARAM, EXPORT_FILE_NAME, SAVE_CONFIG_ENDPOINT,
};
use pano_core::environment::{self, parse_manifest, parse_registry};
use pano_core::preset::parse_save_response;
use pano_core::{Environment, PresetDocument, Viewer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Decoded layer images waiting for the next frame to upload them.
#[derive(Default)]
pub struct LayerQueue {
    pub env_id: Option<String>,
    /// Set when the GPU should drop all textures before uploading.
    pub reset: bool,
    pub ready: Vec<(String, web::ImageBitmap)>,
}

#[derive(Clone)]
pub struct AppHandles {
    pub canvas: web::HtmlCanvasElement,
    pub viewer: Rc<RefCell<Viewer>>,
    pub registry: Rc<RefCell<Vec<Environment>>>,
    pub layer_queue: Rc<RefCell<LayerQueue>>,
}

impl AppHandles {
    pub fn new(canvas: web::HtmlCanvasElement) -> Self {
        Self {
            canvas,
            viewer: Rc::new(RefCell::new(Viewer::new())),
            registry: Rc::new(RefCell::new(Vec::new())),
            layer_queue: Rc::new(RefCell::new(LayerQueue::default())),
        }
    }

    /// Write the UI-only subset to browser storage.
    pub fn persist_local(&self) {
        storage::save_local(&self.viewer.borrow().local_snapshot());
    }

    /// Reflect debug and view mode in the page chrome.
    pub fn refresh_chrome(&self) {
        let Some(document) = dom::window_document() else {
            return;
        };
        let viewer = self.viewer.borrow();
        overlay::set_body_flag(&document, "debug", viewer.debug());
        overlay::set_body_flag(&document, "drawing", viewer.drawing());
        overlay::set_text(
            &document,
            "view-mode",
            match viewer.view_mode() {
                pano_core::ViewMode::Lights => "Luzes",
                pano_core::ViewMode::Final => "Final",
            },
        );
        dom::set_canvas_filter(&self.canvas, &viewer.adjustments().css_filter());
    }
}

/// Rebuild every side panel from the viewer's current state.
pub fn refresh_panels(app: &AppHandles) {
    let Some(document) = dom::window_document() else {
        return;
    };
    panel::rebuild(&document, app);
    editor::rebuild(&document, app);
    layer_manager::rebuild(&document, app);
    settings::rebuild(&document, app);
}

pub async fn load_registry() -> Vec<Environment> {
    match net::fetch_optional(ENVIRONMENTS_PATH).await {
        Some(text) => parse_registry(&text),
        None => Vec::new(),
    }
}

/// Apply the stored UI subset right away so a reload doesn't flash.
pub fn apply_local_early(app: &AppHandles) {
    let Some(local) = storage::load_local() else {
        return;
    };
    app.viewer.borrow_mut().apply_local(&local);
    app.refresh_chrome();
}

/// Fetch the manifest and preset for `env_id`, then swap the viewer over.
pub fn open_environment(app: &AppHandles, env_id: String) {
    let app = app.clone();
    spawn_local(async move {
        let env = environment::lookup(&app.registry.borrow(), &env_id);
        let Some(env) = env else {
            log::warn!("[env] unknown environment {:?}", env_id);
            if let Some(document) = dom::window_document() {
                overlay::toast(&document, &format!("Ambiente {} não encontrado", env_id), true);
            }
            return;
        };
        log::info!("[env] opening {} ({})", env.id, env.display_name());
        {
            let mut q = app.layer_queue.borrow_mut();
            q.env_id = Some(env.id.clone());
            q.reset = true;
            q.ready.clear();
        }

        let files = match net::fetch_optional(&env.manifest_url()).await {
            Some(text) => parse_manifest(&text),
            None => Vec::new(),
        };
        let remote = if env.preset_path.is_empty() {
            None
        } else {
            match net::fetch_optional(&env.preset_path).await {
                Some(text) => match PresetDocument::from_json(&text) {
                    Ok(doc) => Some(doc),
                    Err(e) => {
                        log::warn!("[preset] {}", e);
                        None
                    }
                },
                None => None,
            }
        };
        if app.layer_queue.borrow().env_id.as_deref() != Some(env.id.as_str()) {
            log::debug!("[env] dropping stale load of {}", env.id);
            return;
        }
        let local = storage::load_local();
        app.viewer
            .borrow_mut()
            .load_environment(&env.id, &files, local.as_ref(), remote.as_ref());
        dom::set_query_param(ENV_QUERY_PARAM, &env.id);
        if let Some(document) = dom::window_document() {
            overlay::set_text(&document, "env-name", env.display_name());
        }
        refresh_panels(&app);
        app.refresh_chrome();

        for file in files {
            let app = app.clone();
            let env = env.clone();
            spawn_local(async move {
                match net::fetch_bitmap(&env.image_url(&file)).await {
                    Ok(bitmap) => {
                        let mut q = app.layer_queue.borrow_mut();
                        if q.env_id.as_deref() == Some(env.id.as_str()) {
                            q.ready.push((file, bitmap));
                        }
                    }
                    Err(e) => log::warn!("[net] layer {}: {}", file, e),
                }
            });
        }
    });
}

/// POST the full preset to the save endpoint and report the outcome.
pub fn save(app: &AppHandles) {
    let body = match app.viewer.borrow().snapshot().to_json_pretty() {
        Ok(b) => b,
        Err(e) => {
            log::error!("[save] {}", e);
            return;
        }
    };
    spawn_local(async move {
        let outcome = match net::post_json(SAVE_CONFIG_ENDPOINT, body).await {
            Ok((status, text)) => parse_save_response(status, &text).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        let Some(document) = dom::window_document() else {
            return;
        };
        match outcome {
            Ok(path) => {
                log::info!("[save] written to {}", path);
                overlay::toast(&document, &format!("Salvo em {}", path), false);
            }
            Err(msg) => {
                log::error!("[save] {}", msg);
                overlay::toast(&document, &format!("Erro ao salvar: {}", msg), true);
            }
        }
    });
}

pub fn export(app: &AppHandles) {
    let result = app
        .viewer
        .borrow()
        .snapshot()
        .to_json_pretty()
        .map_err(anyhow::Error::from)
        .and_then(|text| export::download_json(EXPORT_FILE_NAME, &text));
    if let Err(e) = result {
        log::error!("[export] {}", e);
        if let Some(document) = dom::window_document() {
            overlay::toast(&document, &format!("Erro ao exportar: {}", e), true);
        }
    }
}

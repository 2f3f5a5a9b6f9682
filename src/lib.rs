#![cfg(target_arch = "wasm32")]
use pano_core::constants::ENV_QUERY_PARAM;
use pano_core::environment;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod camera;
mod dom;
mod editor;
mod events;
mod export;
mod frame;
mod input;
mod keymap;
mod layer_manager;
mod net;
mod overlay;
mod panel;
mod render;
mod session;
mod settings;
mod storage;

use keymap::Command;
use session::AppHandles;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn wire_toolbar(app: &AppHandles) {
    let Some(document) = dom::window_document() else {
        return;
    };
    let buttons = [
        ("btn-debug", Command::ToggleDebug),
        ("btn-view", Command::ToggleViewMode),
        ("btn-draw", Command::ToggleDrawing),
        ("btn-duplicate", Command::DuplicateSelected),
        ("btn-delete", Command::DeleteSelected),
        ("btn-save", Command::Save),
        ("btn-export", Command::Export),
        ("btn-lights-off", Command::AllOffExceptDaylight),
        ("btn-preset", Command::PresetAll),
    ];
    for (id, cmd) in buttons {
        let app = app.clone();
        dom::add_click_listener(&document, id, move || events::run_command(&app, cmd));
    }
}

/// Fill the environment picker and switch on change.
fn wire_environment_select(app: &AppHandles, current: &str) {
    let Some(document) = dom::window_document() else {
        return;
    };
    let Some(select) = document
        .get_element_by_id("env-select")
        .and_then(|el| el.dyn_into::<web::HtmlSelectElement>().ok())
    else {
        return;
    };
    select.set_inner_html("");
    for env in app.registry.borrow().iter() {
        if let Ok(opt) = web::HtmlOptionElement::new_with_text_and_value(env.display_name(), &env.id)
        {
            _ = select.append_child(&opt);
        }
    }
    select.set_value(current);
    let app = app.clone();
    let select_cb = select.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        session::open_environment(&app, select_cb.value());
    }) as Box<dyn FnMut(_)>);
    _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("pano-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Keep the backing store at CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let app = AppHandles::new(canvas.clone());
    session::apply_local_early(&app);

    events::wire_global_keydown(app.clone());
    events::wire_input_handlers(events::InputWiring::new(app.clone()));
    wire_toolbar(&app);

    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_none() {
        overlay::toast(&document, "WebGPU indisponível neste navegador", true);
    }
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(app.clone(), gpu)));
    frame::start_loop(frame_ctx);

    let registry = session::load_registry().await;
    log::info!("[env] {} environments registered", registry.len());
    let requested = dom::query_param(ENV_QUERY_PARAM);
    let initial = environment::initial_environment(&registry, requested.as_deref());
    *app.registry.borrow_mut() = registry;
    wire_environment_select(&app, &initial);
    session::open_environment(&app, initial);
    Ok(())
}

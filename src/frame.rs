use crate::camera;
use crate::dom;
use crate::overlay::PortalLabels;
use crate::render::{self, FrameInput};
use crate::session::AppHandles;
use instant::Instant;
use pano_core::OpacitySmoother;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub app: AppHandles,
    pub gpu: Option<render::GpuState<'a>>,
    pub smoother: OpacitySmoother,
    pub portal_labels: PortalLabels,
    pub last_instant: Instant,
    /// Environment the smoother was last snapped to.
    pub shown_env: Option<String>,
}

impl<'a> FrameContext<'a> {
    pub fn new(app: AppHandles, gpu: Option<render::GpuState<'a>>) -> Self {
        Self {
            app,
            gpu,
            smoother: OpacitySmoother::new(),
            portal_labels: PortalLabels::default(),
            last_instant: Instant::now(),
            shown_env: None,
        }
    }

    /// Move decoded images into GPU textures.
    fn drain_layer_queue(&mut self) {
        let (reset, ready) = {
            let mut q = self.app.layer_queue.borrow_mut();
            (std::mem::take(&mut q.reset), std::mem::take(&mut q.ready))
        };
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        if reset {
            gpu.clear_layers();
            self.portal_labels.clear();
        }
        for (file, bitmap) in ready {
            if !gpu.has_layer(&file) {
                gpu.upload_layer(&file, &bitmap);
            }
            bitmap.close();
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        self.drain_layer_queue();
        let canvas = self.app.canvas.clone();
        let viewer = self.app.viewer.borrow();
        let target = viewer.composite();
        if viewer.env_id() != self.shown_env.as_deref() {
            self.shown_env = viewer.env_id().map(str::to_string);
            // new environment: no fade from the previous stack
            self.smoother.snap(&target);
        }
        let stack = self.smoother.step(&target, dt_sec);
        let visuals = viewer.hotspot_visuals();
        let cam = viewer.camera(camera::canvas_aspect(&canvas));
        let view_proj = cam.view_proj();
        let adjustments = *viewer.adjustments();
        drop(viewer);

        if let Some(document) = dom::window_document() {
            self.portal_labels
                .update(&document, &canvas, view_proj, &visuals);
        }
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        gpu.resize_if_needed(canvas.width(), canvas.height());
        let input = FrameInput {
            view_proj,
            tint: adjustments.tint(),
            stack: &stack,
            visuals: &visuals,
            bloom_strength: adjustments.bloom_strength(),
            highlights: adjustments.highlight_boost(),
        };
        match gpu.render(&input) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("[render] surface lost, reconfiguring");
                gpu.reconfigure();
            }
            Err(e) => log::error!("[render] {:?}", e),
        }
    }
}

pub async fn init_gpu<'a>(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'a>> {
    match render::GpuState::new(canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("[render] WebGPU init failed: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}

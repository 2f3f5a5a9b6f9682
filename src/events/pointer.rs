use super::{apply_outcome, refresh_editor, report};
use crate::camera;
use crate::input;
use crate::session::AppHandles;
use pano_core::gesture::{Press, PRIMARY_BUTTON};
use pano_core::KindTag;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const END_EVENTS: [&str; 3] = ["pointerup", "pointercancel", "pointerleave"];

/// Window-level listeners that exist only while a press is in progress.
struct DragListeners {
    on_move: js_sys::Function,
    on_end: js_sys::Function,
}

#[derive(Clone)]
pub struct InputWiring {
    pub app: AppHandles,
    press: Rc<RefCell<Option<Press>>>,
    listeners: Rc<RefCell<Option<DragListeners>>>,
    attached: Rc<Cell<bool>>,
}

impl InputWiring {
    pub fn new(app: AppHandles) -> Self {
        Self {
            app,
            press: Rc::new(RefCell::new(None)),
            listeners: Rc::new(RefCell::new(None)),
            attached: Rc::new(Cell::new(false)),
        }
    }

    fn attach(&self) {
        if self.attached.get() {
            return;
        }
        let Some(wnd) = web::window() else {
            return;
        };
        let listeners = self.listeners.borrow();
        let Some(l) = listeners.as_ref() else {
            return;
        };
        _ = wnd.add_event_listener_with_callback("pointermove", &l.on_move);
        for ev in END_EVENTS {
            _ = wnd.add_event_listener_with_callback(ev, &l.on_end);
        }
        self.attached.set(true);
    }

    fn detach(&self) {
        if !self.attached.replace(false) {
            return;
        }
        let Some(wnd) = web::window() else {
            return;
        };
        if let Some(l) = self.listeners.borrow().as_ref() {
            _ = wnd.remove_event_listener_with_callback("pointermove", &l.on_move);
            for ev in END_EVENTS {
                _ = wnd.remove_event_listener_with_callback(ev, &l.on_end);
            }
        }
    }
}

pub fn wire_input_handlers(w: InputWiring) {
    install_drag_listeners(&w);
    wire_pointerdown(&w);
    wire_dblclick(&w);
}

fn install_drag_listeners(w: &InputWiring) {
    let wm = w.clone();
    let on_move = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        on_pointer_move(&wm, &ev);
    }) as Box<dyn FnMut(_)>);
    let we = w.clone();
    let on_end = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        on_pointer_end(&we, &ev);
    }) as Box<dyn FnMut(_)>);
    *w.listeners.borrow_mut() = Some(DragListeners {
        on_move: on_move.into_js_value().unchecked_into(),
        on_end: on_end.into_js_value().unchecked_into(),
    });
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.app.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        if ev.button() != 0 || w.press.borrow().is_some() {
            return;
        }
        let canvas = &w.app.canvas;
        let px = input::pointer_canvas_px(&ev, canvas);
        let (hit, orbit) = {
            let viewer = w.app.viewer.borrow();
            let ray = camera::pointer_ray(&ev, canvas, &viewer);
            let hit = viewer.pick(ray);
            let orbit = hit.is_none() || !viewer.can_drag();
            (hit, orbit)
        };
        *w.press.borrow_mut() = Some(Press::new(px, hit, orbit));
        w.attach();
        _ = canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn on_pointer_move(w: &InputWiring, ev: &web::PointerEvent) {
    let canvas = &w.app.canvas;
    let px = input::pointer_canvas_px(ev, canvas);
    let mut press = w.press.borrow_mut();
    let Some(p) = press.as_mut() else {
        return;
    };
    let delta = p.advance(px);
    let mut viewer = w.app.viewer.borrow_mut();
    if p.orbit {
        if ev.buttons() & PRIMARY_BUTTON != 0 {
            viewer.rotate_camera(delta.x, delta.y, canvas.height() as f32);
        }
        return;
    }
    if p.wants_drag() {
        if let Some(hit) = &p.hit {
            p.dragging = viewer.pointer_down(hit);
            if p.dragging {
                log::debug!("[gesture] drag {:?}", hit);
            } else {
                p.orbit = true;
                return;
            }
        }
    }
    if p.dragging {
        let ray = camera::pointer_ray(ev, canvas, &viewer);
        viewer.pointer_move(ray, ev.buttons());
    }
}

fn on_pointer_end(w: &InputWiring, ev: &web::PointerEvent) {
    w.detach();
    let Some(press) = w.press.borrow_mut().take() else {
        return;
    };
    _ = w.app.canvas.release_pointer_capture(ev.pointer_id());
    let canceled = ev.type_() != "pointerup";

    let outcome = {
        let mut viewer = w.app.viewer.borrow_mut();
        let drag = if press.dragging { viewer.pointer_up() } else { None };
        if let Some(end) = &drag {
            log::debug!("[gesture] end {:?} moved={}", end.target, end.moved);
        }
        let moved = drag.as_ref().is_some_and(|d| d.moved);
        if canceled || moved || !press.is_click() {
            return;
        }
        let ray = camera::pointer_ray(ev, &w.app.canvas, &viewer);
        viewer.click(press.hit.as_ref(), ray)
    };
    match outcome {
        Ok(o) => apply_outcome(&w.app, o),
        Err(e) => report(&w.app, e),
    }
}

fn wire_dblclick(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.app.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let created = {
            let mut viewer = w.app.viewer.borrow_mut();
            if !viewer.debug() || viewer.drawing() {
                return;
            }
            let ray = camera::pointer_ray(&ev, &w.app.canvas, &viewer);
            if viewer.pick(ray).is_some() {
                return;
            }
            viewer.create_hotspot(KindTag::Switch, ray)
        };
        match created {
            Ok(id) => {
                log::info!("[hotspot] created {}", id);
                refresh_editor(&w.app);
            }
            Err(e) => report(&w.app, e),
        }
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("dblclick", closure.as_ref().unchecked_ref());
    closure.forget();
}

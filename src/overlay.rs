use glam::{Mat4, Vec4};
use pano_core::{HotspotId, HotspotVisual};
use std::collections::HashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const TOAST_ID: &str = "toast";
const TOAST_MS: i32 = 3500;

/// Short status message; errors stay the same duration but are styled.
pub fn toast(document: &web::Document, message: &str, is_error: bool) {
    let Some(el) = document.get_element_by_id(TOAST_ID) else {
        log::info!("[toast] {}", message);
        return;
    };
    el.set_text_content(Some(message));
    let cl = el.class_list();
    _ = cl.remove_1("hidden");
    _ = cl.toggle_with_force("error", is_error);
    let hide_el = el.clone();
    let hide = Closure::once_into_js(move || {
        _ = hide_el.class_list().add_1("hidden");
    });
    if let Some(w) = web::window() {
        _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
            hide.unchecked_ref(),
            TOAST_MS,
        );
    }
}

pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

/// Toggle a body class, e.g. `debug` while editing.
pub fn set_body_flag(document: &web::Document, class: &str, on: bool) {
    if let Some(body) = document.body() {
        _ = body.class_list().toggle_with_force(class, on);
    }
}

/// Floating portal icons and labels positioned over the canvas.
#[derive(Default)]
pub struct PortalLabels {
    els: HashMap<HotspotId, web::HtmlElement>,
}

impl PortalLabels {
    pub fn update(
        &mut self,
        document: &web::Document,
        canvas: &web::HtmlCanvasElement,
        view_proj: Mat4,
        visuals: &[HotspotVisual],
    ) {
        let Some(layer) = document.get_element_by_id("portal-labels") else {
            return;
        };
        let rect = canvas.get_bounding_client_rect();
        let (cw, ch) = (rect.width() as f32, rect.height() as f32);

        self.els.retain(|id, el| {
            let keep = visuals.iter().any(|v| &v.id == id && v.icon.is_some());
            if !keep {
                el.remove();
            }
            keep
        });

        for v in visuals {
            let Some(icon) = &v.icon else {
                continue;
            };
            let el = match self.els.get(&v.id) {
                Some(el) => el.clone(),
                None => match create_label(document, &layer) {
                    Some(el) => {
                        self.els.insert(v.id.clone(), el.clone());
                        el
                    }
                    None => continue,
                },
            };
            let clip = view_proj * Vec4::new(v.position.x, v.position.y, v.position.z, 1.0);
            let style = el.style();
            if clip.w <= 0.0 {
                _ = style.set_property("display", "none");
                continue;
            }
            let ndc = clip.truncate() / clip.w;
            let x = (ndc.x * 0.5 + 0.5) * cw;
            let y = (0.5 - ndc.y * 0.5) * ch;
            _ = style.set_property("display", "flex");
            _ = style.set_property("left", &format!("{:.1}px", x));
            _ = style.set_property("top", &format!("{:.1}px", y));
            _ = style.set_property(
                "color",
                &format!(
                    "rgba({},{},{},{:.3})",
                    (icon.rgba.x * 255.0) as u8,
                    (icon.rgba.y * 255.0) as u8,
                    (icon.rgba.z * 255.0) as u8,
                    icon.rgba.w
                ),
            );
            _ = style.set_property("font-size", &format!("{:.0}px", icon.size_px));
            _ = el.class_list().toggle_with_force("inactive", !v.interactive);
            if let Some(i) = el.first_element_child() {
                i.set_class_name(&format!("bi bi-{}", icon.name));
            }
            if let Some(span) = el.last_element_child() {
                span.set_text_content(Some(&icon.text));
            }
        }
    }

    pub fn clear(&mut self) {
        for (_, el) in self.els.drain() {
            el.remove();
        }
    }
}

fn create_label(document: &web::Document, layer: &web::Element) -> Option<web::HtmlElement> {
    let el = document
        .create_element("div")
        .ok()?
        .dyn_into::<web::HtmlElement>()
        .ok()?;
    el.set_class_name("portal-label");
    let icon = document.create_element("i").ok()?;
    let text = document.create_element("span").ok()?;
    _ = el.append_child(&icon);
    _ = el.append_child(&text);
    _ = layer.append_child(&el);
    Some(el)
}

//! Editor settings: which view modes end users may reach, and the image
//! adjustments applied on top of the composited panorama.

use crate::dom;
use crate::session::AppHandles;
use pano_core::constants::TEMPERATURE_MAX;
use pano_core::{Adjustments, ViewModePermission};
use web_sys as web;

const SETTINGS_ID: &str = "viewer-settings";

const PERMISSIONS: [(&str, &str); 3] = [
    ("both", "Luzes e Final"),
    ("final", "Somente Final"),
    ("lights", "Somente Luzes"),
];

/// `(key, label, range)` per adjustment slider.
const SLIDERS: [(&str, &str, (f32, f32)); 7] = [
    ("temperature", "Temperatura", (-TEMPERATURE_MAX, TEMPERATURE_MAX)),
    ("saturation", "Saturação", (0.0, 200.0)),
    ("contrast", "Contraste", (0.0, 200.0)),
    ("brightness", "Brilho", (0.0, 200.0)),
    ("highlights", "Realces", (0.0, 100.0)),
    ("denoise", "Redução de ruído", (0.0, 100.0)),
    ("bloom", "Bloom", (0.0, 100.0)),
];

fn permission_value(p: ViewModePermission) -> &'static str {
    match p {
        ViewModePermission::Both => "both",
        ViewModePermission::FinalOnly => "final",
        ViewModePermission::LightsOnly => "lights",
    }
}

fn permission_from(value: &str) -> Option<ViewModePermission> {
    match value {
        "both" => Some(ViewModePermission::Both),
        "final" => Some(ViewModePermission::FinalOnly),
        "lights" => Some(ViewModePermission::LightsOnly),
        _ => None,
    }
}

fn field_mut<'a>(a: &'a mut Adjustments, key: &str) -> Option<&'a mut f32> {
    Some(match key {
        "temperature" => &mut a.temperature,
        "saturation" => &mut a.saturation,
        "contrast" => &mut a.contrast,
        "brightness" => &mut a.brightness,
        "highlights" => &mut a.highlights,
        "denoise" => &mut a.denoise,
        "bloom" => &mut a.bloom,
        _ => return None,
    })
}

pub fn rebuild(document: &web::Document, app: &AppHandles) {
    let Some(root) = document.get_element_by_id(SETTINGS_ID) else {
        return;
    };
    root.set_inner_html("");
    let (permission, mut adjustments) = {
        let viewer = app.viewer.borrow();
        if !viewer.debug() {
            _ = root.class_list().add_1("hidden");
            return;
        }
        (viewer.view().permission(), *viewer.adjustments())
    };
    _ = root.class_list().remove_1("hidden");
    _ = build(document, &root, app, permission, &mut adjustments);
}

fn build(
    document: &web::Document,
    root: &web::Element,
    app: &AppHandles,
    permission: ViewModePermission,
    adjustments: &mut Adjustments,
) -> Option<()> {
    dom::append(document, root, "label", "", Some("Modos disponíveis"))?;
    let select = dom::select_input(document, PERMISSIONS, permission_value(permission))?;
    _ = root.append_child(&select);
    {
        let (app, input) = (app.clone(), select.clone());
        dom::listen(&select, "change", move |_| {
            if let Some(p) = permission_from(&input.value()) {
                app.viewer.borrow_mut().set_view_permission(p);
                app.refresh_chrome();
            }
        });
    }

    dom::append(document, root, "h5", "", Some("Ajustes de Imagem"))?;
    for (key, text, range) in SLIDERS {
        let value = field_mut(adjustments, key).map(|v| *v).unwrap_or_default();
        let row = dom::append(document, root, "div", "adjust-row", None)?;
        dom::append(document, &row, "span", "label", Some(text))?;
        let slider = dom::range_input(document, range, 1.0, value)?;
        _ = row.append_child(&slider);
        let app_input = app.clone();
        let input = slider.clone();
        dom::listen(&slider, "input", move |_| {
            let mut next = *app_input.viewer.borrow().adjustments();
            if let Some(field) = field_mut(&mut next, key) {
                *field = input.value_as_number() as f32;
            }
            app_input.viewer.borrow_mut().set_adjustments(next);
            app_input.refresh_chrome();
        });
        let app_change = app.clone();
        dom::listen(&slider, "change", move |_| app_change.persist_local());
    }
    Some(())
}

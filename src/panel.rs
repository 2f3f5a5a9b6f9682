//! Light sliders. End users see the dimmable lights; the editor sees every
//! non-FINAL light grouped by number, with dimmable and daylight toggles.

use crate::session::AppHandles;
use pano_core::constants::DAYLIGHT_KEY;
use pano_core::Viewer;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const PANEL_ID: &str = "lights-panel";
const DAYLIGHT_LABEL: &str = "LUZ DO DIA";

struct Row {
    file: String,
    label: String,
    value: f32,
    dimmable: bool,
    daylight: bool,
}

fn rows(viewer: &Viewer) -> (Vec<(String, Vec<Row>)>, bool) {
    let board = viewer.board();
    let row = |file: &str| {
        let state = board.light(file);
        Row {
            file: file.to_string(),
            label: state.map(|s| s.display_name.clone()).unwrap_or_default(),
            value: board.intensity(file),
            dimmable: state.is_some_and(|s| s.dimmable),
            daylight: board.is_daylight_target(file),
        }
    };
    if viewer.debug() {
        let groups = board
            .light_groups()
            .into_iter()
            .map(|g| (g.key.clone(), g.files.iter().map(|f| row(f.as_str())).collect()))
            .collect();
        (groups, true)
    } else {
        let dimmable = board.dimmable_lights().into_iter().map(row).collect();
        (vec![(String::new(), dimmable)], false)
    }
}

pub fn rebuild(document: &web::Document, app: &AppHandles) {
    let Some(root) = document.get_element_by_id(PANEL_ID) else {
        return;
    };
    root.set_inner_html("");
    let (groups, editing, daylight) = {
        let viewer = app.viewer.borrow();
        let board = viewer.board();
        let daylight = (!board.daylight_targets().is_empty()).then(|| board.daylight());
        let (groups, editing) = rows(&viewer);
        (groups, editing, daylight)
    };
    if let Some(value) = daylight {
        let r = Row {
            file: DAYLIGHT_KEY.to_string(),
            label: DAYLIGHT_LABEL.to_string(),
            value,
            dimmable: true,
            daylight: false,
        };
        append_row(document, &root, app, &r, false);
    }
    for (key, rows) in groups {
        if editing && !key.is_empty() {
            if let Ok(h) = document.create_element("h4") {
                h.set_text_content(Some(&key));
                _ = root.append_child(&h);
            }
        }
        for r in &rows {
            append_row(document, &root, app, r, editing);
        }
    }
}

fn append_row(
    document: &web::Document,
    root: &web::Element,
    app: &AppHandles,
    r: &Row,
    editing: bool,
) -> Option<()> {
    let row = document.create_element("div").ok()?;
    row.set_class_name("light-row");
    _ = row.set_attribute("data-file", &r.file);

    let label = document.create_element("span").ok()?;
    label.set_class_name("label");
    label.set_text_content(Some(&r.label));
    _ = row.append_child(&label);

    let slider = document
        .create_element("input")
        .ok()?
        .dyn_into::<web::HtmlInputElement>()
        .ok()?;
    slider.set_type("range");
    slider.set_min("0");
    slider.set_max("100");
    slider.set_step("1");
    slider.set_value(&format!("{}", r.value.round()));
    _ = slider.set_attribute("data-file", &r.file);
    {
        let app = app.clone();
        let file = r.file.clone();
        let input = slider.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
            let value = input.value_as_number() as f32;
            app.viewer.borrow_mut().set_intensity(&file, value);
            if let Some(document) = crate::dom::window_document() {
                sync_values(&document, &app.viewer.borrow());
            }
        }) as Box<dyn FnMut(_)>);
        _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }
    _ = row.append_child(&slider);

    if editing {
        append_toggle(document, &row, app, "dim", "Dimerizável", r.dimmable, &r.file, |v, f| {
            v.toggle_dimmable(f)
        });
        append_toggle(document, &row, app, "day", "Luz do dia", r.daylight, &r.file, |v, f| {
            v.toggle_daylight_target(f)
        });
        append_toggle(document, &row, app, "eye", "Visível", r.value > 0.0, &r.file, |v, f| {
            v.toggle_layer_visibility(f)
        });
    }
    _ = root.append_child(&row);
    Some(())
}

#[allow(clippy::too_many_arguments)]
fn append_toggle(
    document: &web::Document,
    row: &web::Element,
    app: &AppHandles,
    class: &str,
    title: &str,
    active: bool,
    file: &str,
    action: fn(&mut Viewer, &str),
) {
    let Ok(button) = document.create_element("button") else {
        return;
    };
    button.set_class_name(class);
    _ = button.class_list().toggle_with_force("active", active);
    _ = button.set_attribute("title", title);
    let app = app.clone();
    let file = file.to_string();
    let closure = Closure::wrap(Box::new(move || {
        action(&mut app.viewer.borrow_mut(), &file);
        if let Some(document) = crate::dom::window_document() {
            rebuild(&document, &app);
        }
    }) as Box<dyn FnMut()>);
    _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
    _ = row.append_child(&button);
}

/// Push current intensities back into the sliders (daylight fans out).
pub fn sync_values(document: &web::Document, viewer: &Viewer) {
    let Ok(nodes) = document.query_selector_all(&format!("#{} input[type=range]", PANEL_ID))
    else {
        return;
    };
    let board = viewer.board();
    for i in 0..nodes.length() {
        let Some(input) = nodes
            .item(i)
            .and_then(|n| n.dyn_into::<web::HtmlInputElement>().ok())
        else {
            continue;
        };
        if let Some(file) = input.get_attribute("data-file") {
            let value = if file == DAYLIGHT_KEY {
                board.daylight()
            } else {
                board.intensity(&file)
            };
            input.set_value(&format!("{}", value.round()));
        }
    }
}

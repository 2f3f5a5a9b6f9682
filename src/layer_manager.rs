//! Editor-only list of every layer in draw order. Rows are dragged onto one
//! another to reorder; the eye flips a layer between hidden and full.

use crate::session::AppHandles;
use crate::{dom, panel};
use pano_core::labels::{is_final, sanitize_label};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

const MANAGER_ID: &str = "layer-manager";

fn refresh(app: &AppHandles) {
    if let Some(document) = dom::window_document() {
        rebuild(&document, app);
        panel::sync_values(&document, &app.viewer.borrow());
    }
}

pub fn rebuild(document: &web::Document, app: &AppHandles) {
    let Some(root) = document.get_element_by_id(MANAGER_ID) else {
        return;
    };
    root.set_inner_html("");
    let rows: Vec<(String, bool)> = {
        let viewer = app.viewer.borrow();
        if !viewer.debug() {
            _ = root.class_list().add_1("hidden");
            return;
        }
        let board = viewer.board();
        viewer
            .layers()
            .iter()
            .map(|f| (f.clone(), board.intensity(f) > 0.0))
            .collect()
    };
    _ = root.class_list().remove_1("hidden");
    _ = dom::append(document, &root, "h5", "", Some("Gerenciador de Camadas"));
    _ = dom::append(document, &root, "span", "hint", Some("Arraste para reordenar; a última é desenhada por cima"));
    let dragged = Rc::new(Cell::new(None::<usize>));
    for (index, (file, visible)) in rows.iter().enumerate() {
        _ = append_row(document, &root, app, &dragged, index, file, *visible);
    }
}

fn append_row(
    document: &web::Document,
    root: &web::Element,
    app: &AppHandles,
    dragged: &Rc<Cell<Option<usize>>>,
    index: usize,
    file: &str,
    visible: bool,
) -> Option<()> {
    let row = dom::append(document, root, "div", "layer-row", None)?;
    _ = row.set_attribute("draggable", "true");
    _ = row.set_attribute("data-file", file);
    _ = row.class_list().toggle_with_force("final", is_final(file));
    dom::append(document, &row, "span", "label", Some(&sanitize_label(file)))?;
    dom::append(document, &row, "small", "file", Some(file))?;

    let eye = dom::append(document, &row, "button", "eye", None)?;
    _ = eye.class_list().toggle_with_force("active", visible);
    _ = eye.set_attribute("title", "Visível");
    {
        let app = app.clone();
        let file = file.to_string();
        dom::listen(&eye, "click", move |_| {
            app.viewer.borrow_mut().toggle_layer_visibility(&file);
            refresh(&app);
        });
    }

    {
        let dragged = dragged.clone();
        let file = file.to_string();
        dom::listen(&row, "dragstart", move |ev| {
            dragged.set(Some(index));
            if let Some(transfer) = ev.dyn_ref::<web::DragEvent>().and_then(|d| d.data_transfer()) {
                transfer.set_effect_allowed("move");
                _ = transfer.set_data("text/plain", &file);
            }
        });
    }
    dom::listen(&row, "dragover", |ev| ev.prevent_default());
    {
        let dragged = dragged.clone();
        let app = app.clone();
        dom::listen(&row, "drop", move |ev| {
            ev.prevent_default();
            let Some(from) = dragged.take() else {
                return;
            };
            let moved = app.viewer.borrow_mut().reorder_layers(from, index);
            if moved {
                log::debug!("[layers] moved {} -> {}", from, index);
                refresh(&app);
            }
        });
    }
    let dragged = dragged.clone();
    dom::listen(&row, "dragend", move |_| dragged.set(None));
    Some(())
}

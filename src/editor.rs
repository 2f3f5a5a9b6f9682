//! Field editor for the selected hotspot. Each control writes one
//! `HotspotEdit`; controls that change which fields exist rebuild the form.

use crate::dom;
use crate::events::{report, run_command};
use crate::keymap::Command;
use crate::session::AppHandles;
use pano_core::constants::{
    PORTAL_ICONS, PORTAL_NO_TARGET_TEXT, ROTATION_RANGE_DEG, SCALE_RANGE, SPHERE_SIZE_RANGE,
};
use pano_core::labels::{is_final, sanitize_label};
use pano_core::{Hotspot, HotspotEdit, HotspotId, HotspotKind, KindTag, Shape, ShapeTag};
use web_sys as web;

const EDITOR_ID: &str = "hotspot-editor";

const KINDS: [(KindTag, &str); 3] = [
    (KindTag::Switch, "Luz"),
    (KindTag::Portal, "Portal"),
    (KindTag::Swap, "Troca"),
];

const SHAPES: [(&str, &str); 3] = [("sphere", "Esfera"), ("box", "Caixa"), ("polygon", "Polígono")];

/// Everything the form shows, copied out so no borrow outlives the build.
struct Form {
    hotspot: Hotspot,
    lights: Vec<(String, String)>,
    finals: Vec<String>,
    colors: Vec<String>,
    drawing: bool,
}

fn form(app: &AppHandles) -> Option<Form> {
    let viewer = app.viewer.borrow();
    if !viewer.debug() {
        return None;
    }
    let hotspot = viewer.hotspots().get(viewer.selected()?)?.clone();
    Some(Form {
        hotspot,
        lights: viewer
            .board()
            .lights()
            .map(|(file, state)| (file.to_string(), state.display_name.clone()))
            .collect(),
        finals: viewer.layers().iter().filter(|f| is_final(f)).cloned().collect(),
        colors: viewer.hotspots().color_history().to_vec(),
        drawing: viewer.drawing(),
    })
}

fn shape_tag(value: &str) -> Option<ShapeTag> {
    match value {
        "sphere" => Some(ShapeTag::Sphere),
        "box" => Some(ShapeTag::Box),
        "polygon" => Some(ShapeTag::Polygon),
        _ => None,
    }
}

fn shape_value(tag: ShapeTag) -> &'static str {
    match tag {
        ShapeTag::Sphere => "sphere",
        ShapeTag::Box => "box",
        ShapeTag::Polygon => "polygon",
    }
}

fn refresh(app: &AppHandles) {
    if let Some(document) = dom::window_document() {
        rebuild(&document, app);
    }
}

fn apply(app: &AppHandles, id: &HotspotId, edit: HotspotEdit, rebuild_after: bool) {
    let result = app.viewer.borrow_mut().edit_hotspot(id, edit);
    match result {
        Ok(()) if rebuild_after => {
            refresh(app);
            app.refresh_chrome();
        }
        Ok(()) => {}
        Err(e) => report(app, e),
    }
}

pub fn rebuild(document: &web::Document, app: &AppHandles) {
    let Some(root) = document.get_element_by_id(EDITOR_ID) else {
        return;
    };
    root.set_inner_html("");
    let Some(form) = form(app) else {
        _ = root.class_list().add_1("hidden");
        return;
    };
    _ = root.class_list().remove_1("hidden");
    _ = build(document, &root, app, &form);
}

fn build(document: &web::Document, root: &web::Element, app: &AppHandles, form: &Form) -> Option<()> {
    let id = form.hotspot.id.clone();
    dom::append(document, root, "h5", "", Some("Editar Ponto"))?;

    let kinds = dom::append(document, root, "div", "kind-buttons", None)?;
    for (tag, text) in KINDS {
        let button = dom::append(document, &kinds, "button", "", Some(text))?;
        _ = button.class_list().toggle_with_force("active", form.hotspot.tag() == tag);
        let (app, id) = (app.clone(), id.clone());
        dom::listen(&button, "click", move |_| apply(&app, &id, HotspotEdit::Kind(tag), true));
    }

    match &form.hotspot.kind {
        HotspotKind::Switch { shape, lights } => {
            shape_section(document, root, app, &id, shape, form.drawing)?;
            let section = dom::append(document, root, "div", "section", None)?;
            dom::append(document, &section, "label", "", Some("Luzes Associadas"))?;
            let list = dom::append(document, &section, "div", "check-list", None)?;
            for (file, name) in &form.lights {
                let input = dom::checkbox_row(document, &list, file, name, lights.contains(file))?;
                let (app, id, list) = (app.clone(), id.clone(), list.clone());
                dom::listen(&input, "change", move |_| {
                    let selection = dom::checked_values(&list);
                    let result = app.viewer.borrow_mut().commit_lights(&id, selection);
                    if let Err(e) = result {
                        report(&app, e);
                    }
                });
            }
        }
        HotspotKind::Portal {
            target_environment,
            icon,
            label,
        } => portal_section(document, root, app, &id, target_environment.as_deref(), icon, label)?,
        HotspotKind::Swap { target_images } => {
            let section = dom::append(document, root, "div", "section", None)?;
            dom::append(document, &section, "label", "", Some("Imagens de Destino (Ciclo)"))?;
            let list = dom::append(document, &section, "div", "check-list", None)?;
            for file in &form.finals {
                let checked = target_images.contains(file);
                let input = dom::checkbox_row(document, &list, file, &sanitize_label(file), checked)?;
                let (app, id, list) = (app.clone(), id.clone(), list.clone());
                dom::listen(&input, "change", move |_| {
                    let images = dom::checked_values(&list);
                    apply(&app, &id, HotspotEdit::TargetImages(images), false);
                });
            }
        }
    }

    style_section(document, root, app, form)?;

    let footer = dom::append(document, root, "div", "editor-actions", None)?;
    let duplicate = dom::append(document, &footer, "button", "", Some("Duplicar"))?;
    let app_dup = app.clone();
    dom::listen(&duplicate, "click", move |_| run_command(&app_dup, Command::DuplicateSelected));
    let delete = dom::append(document, &footer, "button", "danger", Some("Deletar"))?;
    let app_del = app.clone();
    dom::listen(&delete, "click", move |_| run_command(&app_del, Command::DeleteSelected));
    Some(())
}

fn shape_section(
    document: &web::Document,
    root: &web::Element,
    app: &AppHandles,
    id: &HotspotId,
    shape: &Shape,
    drawing: bool,
) -> Option<()> {
    let section = dom::append(document, root, "div", "section", None)?;
    dom::append(document, &section, "label", "", Some("Forma & Dimensões"))?;
    let select = dom::select_input(document, SHAPES, shape_value(shape.tag()))?;
    _ = section.append_child(&select);
    {
        let (app, id, input) = (app.clone(), id.clone(), select.clone());
        dom::listen(&select, "change", move |_| {
            if let Some(tag) = shape_tag(&input.value()) {
                apply(&app, &id, HotspotEdit::Shape(tag), true);
            }
        });
    }

    match shape {
        Shape::Sphere { size } => {
            let slider = dom::range_input(document, SPHERE_SIZE_RANGE, 0.1, *size)?;
            _ = section.append_child(&slider);
            let (app, id, input) = (app.clone(), id.clone(), slider.clone());
            dom::listen(&slider, "input", move |_| {
                apply(&app, &id, HotspotEdit::Size(input.value_as_number() as f32), false);
            });
        }
        Shape::Box {
            width,
            height,
            depth,
            rotation_deg,
        } => {
            let fields: [(&str, f32, fn(f32) -> HotspotEdit); 3] = [
                ("L", *width, HotspotEdit::Width),
                ("A", *height, HotspotEdit::Height),
                ("P", *depth, HotspotEdit::Depth),
            ];
            let row = dom::append(document, &section, "div", "box-dims", None)?;
            for (text, value, edit) in fields {
                dom::append(document, &row, "span", "", Some(text))?;
                let input: web::HtmlInputElement = dom::create(document, "input")?;
                input.set_type("number");
                input.set_step("0.1");
                input.set_min("0.1");
                input.set_value(&value.to_string());
                _ = row.append_child(&input);
                let (app, id, field) = (app.clone(), id.clone(), input.clone());
                dom::listen(&input, "change", move |_| {
                    apply(&app, &id, edit(field.value_as_number() as f32), false);
                });
            }
            dom::append(document, &section, "span", "", Some("Rotação"))?;
            let slider = dom::range_input(document, ROTATION_RANGE_DEG, 1.0, *rotation_deg)?;
            _ = section.append_child(&slider);
            let (app, id, input) = (app.clone(), id.clone(), slider.clone());
            dom::listen(&slider, "input", move |_| {
                apply(&app, &id, HotspotEdit::RotationDeg(input.value_as_number() as f32), false);
            });
        }
        Shape::Polygon { points } => {
            let status = format!("{} pontos", points.len());
            dom::append(document, &section, "span", "hint", Some(&status))?;
            let text = if drawing { "Parar desenho" } else { "Desenhar" };
            let draw = dom::append(document, &section, "button", "", Some(text))?;
            _ = draw.class_list().toggle_with_force("active", drawing);
            let app_draw = app.clone();
            dom::listen(&draw, "click", move |_| run_command(&app_draw, Command::ToggleDrawing));
            let clear = dom::append(document, &section, "button", "", Some("Limpar pontos"))?;
            let (app, id) = (app.clone(), id.clone());
            dom::listen(&clear, "click", move |_| {
                let result = app.viewer.borrow_mut().clear_points(&id);
                match result {
                    Ok(()) => refresh(&app),
                    Err(e) => report(&app, e),
                }
            });
        }
    }
    Some(())
}

fn portal_section(
    document: &web::Document,
    root: &web::Element,
    app: &AppHandles,
    id: &HotspotId,
    target: Option<&str>,
    icon: &str,
    label: &str,
) -> Option<()> {
    let section = dom::append(document, root, "div", "section", None)?;
    dom::append(document, &section, "label", "", Some("Destino"))?;
    let environments: Vec<(String, String)> = app
        .registry
        .borrow()
        .iter()
        .map(|e| (e.id.clone(), e.display_name().to_string()))
        .collect();
    let options = std::iter::once(("", PORTAL_NO_TARGET_TEXT))
        .chain(environments.iter().map(|(id, name)| (id.as_str(), name.as_str())));
    let select = dom::select_input(document, options, target.unwrap_or_default())?;
    _ = section.append_child(&select);
    {
        let (app, id, input) = (app.clone(), id.clone(), select.clone());
        dom::listen(&select, "change", move |_| {
            let value = input.value();
            let target = (!value.is_empty()).then_some(value);
            apply(&app, &id, HotspotEdit::TargetEnvironment(target), false);
        });
    }

    dom::append(document, &section, "label", "", Some("Ícone"))?;
    let icons = dom::select_input(document, PORTAL_ICONS.iter().map(|i| (*i, *i)), icon)?;
    _ = section.append_child(&icons);
    {
        let (app, id, select) = (app.clone(), id.clone(), icons.clone());
        dom::listen(&icons, "change", move |_| {
            apply(&app, &id, HotspotEdit::Icon(select.value()), false);
        });
    }

    dom::append(document, &section, "label", "", Some("Rótulo"))?;
    let text: web::HtmlInputElement = dom::create(document, "input")?;
    text.set_type("text");
    text.set_value(label);
    _ = section.append_child(&text);
    let (app, id, input) = (app.clone(), id.clone(), text.clone());
    dom::listen(&text, "change", move |_| {
        apply(&app, &id, HotspotEdit::Label(input.value()), false);
    });
    Some(())
}

fn style_section(document: &web::Document, root: &web::Element, app: &AppHandles, form: &Form) -> Option<()> {
    let id = &form.hotspot.id;
    let section = dom::append(document, root, "div", "section", None)?;
    dom::append(document, &section, "label", "", Some("Cor & Opacidade"))?;
    let color: web::HtmlInputElement = dom::create(document, "input")?;
    color.set_type("color");
    color.set_value(&form.hotspot.color);
    _ = section.append_child(&color);
    {
        let (app, id, input) = (app.clone(), id.clone(), color.clone());
        dom::listen(&color, "change", move |_| {
            apply(&app, &id, HotspotEdit::Color(input.value()), true);
        });
    }
    let swatches = dom::append(document, &section, "div", "swatches", None)?;
    for c in &form.colors {
        let swatch = dom::append(document, &swatches, "button", "swatch", None)?;
        _ = swatch.set_attribute("style", &format!("background:{}", c));
        _ = swatch.set_attribute("title", c);
        let (app, id, c) = (app.clone(), id.clone(), c.clone());
        dom::listen(&swatch, "click", move |_| apply(&app, &id, HotspotEdit::Color(c.clone()), true));
    }
    let opacity = dom::range_input(document, (0.0, 1.0), 0.1, form.hotspot.opacity)?;
    _ = section.append_child(&opacity);
    {
        let (app, id, input) = (app.clone(), id.clone(), opacity.clone());
        dom::listen(&opacity, "input", move |_| {
            apply(&app, &id, HotspotEdit::Opacity(input.value_as_number() as f32), false);
        });
    }

    dom::append(document, &section, "label", "", Some("Tamanho"))?;
    let scale = dom::range_input(document, SCALE_RANGE, 0.1, form.hotspot.scale)?;
    _ = section.append_child(&scale);
    let (app, id, input) = (app.clone(), id.clone(), scale.clone());
    dom::listen(&scale, "input", move |_| {
        apply(&app, &id, HotspotEdit::Scale(input.value_as_number() as f32), false);
    });
    Some(())
}

use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// CSS `filter` on the canvas; carries saturation, contrast, brightness and blur.
pub fn set_canvas_filter(canvas: &web::HtmlCanvasElement, filter: &str) {
    _ = canvas.style().set_property("filter", filter);
}

pub fn query_param(name: &str) -> Option<String> {
    let search = web::window()?.location().search().ok()?;
    let params = web::UrlSearchParams::new_with_str(&search).ok()?;
    params.get(name).filter(|v| !v.is_empty())
}

/// Rewrite one query parameter in place without reloading.
pub fn set_query_param(name: &str, value: &str) {
    let Some(window) = web::window() else {
        return;
    };
    let Ok(href) = window.location().href() else {
        return;
    };
    let Ok(url) = web::Url::new(&href) else {
        return;
    };
    url.search_params().set(name, value);
    if let Ok(history) = window.history() {
        _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url.href()));
    }
}

/// Key events aimed at text inputs are left alone.
pub fn is_text_entry(target: Option<web::EventTarget>) -> bool {
    let Some(el) = target.and_then(|t| t.dyn_into::<web::Element>().ok()) else {
        return false;
    };
    matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
        || el
            .get_attribute("contenteditable")
            .is_some_and(|v| v != "false")
}

/// `document.createElement(tag)` cast to the concrete element type.
pub fn create<T: JsCast>(document: &web::Document, tag: &str) -> Option<T> {
    document.create_element(tag).ok()?.dyn_into::<T>().ok()
}

/// Element with a class and optional text, appended to `parent`.
pub fn append(
    document: &web::Document,
    parent: &web::Element,
    tag: &str,
    class: &str,
    text: Option<&str>,
) -> Option<web::Element> {
    let el = document.create_element(tag).ok()?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if text.is_some() {
        el.set_text_content(text);
    }
    _ = parent.append_child(&el);
    Some(el)
}

/// Listener that lives as long as the page; elements are rebuilt rather
/// than unsubscribed.
pub fn listen(target: &web::EventTarget, event: &str, mut handler: impl FnMut(web::Event) + 'static) {
    let closure =
        wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::Event| handler(ev)) as Box<dyn FnMut(_)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn range_input(
    document: &web::Document,
    (min, max): (f32, f32),
    step: f32,
    value: f32,
) -> Option<web::HtmlInputElement> {
    let input: web::HtmlInputElement = create(document, "input")?;
    input.set_type("range");
    input.set_min(&min.to_string());
    input.set_max(&max.to_string());
    input.set_step(&step.to_string());
    input.set_value(&value.to_string());
    Some(input)
}

/// `<select>` filled with `(value, text)` pairs; `current` is preselected.
pub fn select_input<'a>(
    document: &web::Document,
    options: impl IntoIterator<Item = (&'a str, &'a str)>,
    current: &str,
) -> Option<web::HtmlSelectElement> {
    let select: web::HtmlSelectElement = create(document, "select")?;
    for (value, text) in options {
        let opt = web::HtmlOptionElement::new_with_text_and_value(text, value).ok()?;
        opt.set_selected(value == current);
        _ = select.append_child(&opt);
    }
    Some(select)
}

/// Checkbox with a trailing label, tagged with `data-value`.
pub fn checkbox_row(
    document: &web::Document,
    parent: &web::Element,
    value: &str,
    text: &str,
    checked: bool,
) -> Option<web::HtmlInputElement> {
    let row = append(document, parent, "label", "check-row", None)?;
    let input: web::HtmlInputElement = create(document, "input")?;
    input.set_type("checkbox");
    input.set_checked(checked);
    _ = input.set_attribute("data-value", value);
    _ = row.append_child(&input);
    append(document, &row, "span", "", Some(text))?;
    Some(input)
}

/// `data-value` of every checked box under `container`, in document order.
pub fn checked_values(container: &web::Element) -> Vec<String> {
    let Ok(nodes) = container.query_selector_all("input[type=checkbox]") else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<web::HtmlInputElement>().ok())
        .filter(|input| input.checked())
        .filter_map(|input| input.get_attribute("data-value"))
        .collect()
}

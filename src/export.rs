use anyhow::{anyhow, Context};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Offer `text` as a JSON file download.
pub fn download_json(file_name: &str, text: &str) -> anyhow::Result<()> {
    let document = crate::dom::window_document().context("no document")?;
    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(text));
    let opts = web::BlobPropertyBag::new();
    opts.set_type("application/json");
    let blob = web::Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|e| anyhow!("blob: {:?}", e))?;
    let url = web::Url::create_object_url_with_blob(&blob).map_err(|e| anyhow!("{:?}", e))?;
    let anchor = document
        .create_element("a")
        .map_err(|e| anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlAnchorElement>()
        .map_err(|e| anyhow!("{:?}", e))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    _ = web::Url::revoke_object_url(&url);
    log::info!("[export] {} ({} bytes)", file_name, text.len());
    Ok(())
}

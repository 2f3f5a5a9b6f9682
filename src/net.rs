use anyhow::{anyhow, Context};
use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// GET a text document; non-2xx is an error.
pub async fn fetch_text(url: &str) -> anyhow::Result<String> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| anyhow!("GET {}: {}", url, e))?;
    if !resp.ok() {
        return Err(anyhow!("GET {}: HTTP {}", url, resp.status()));
    }
    resp.text()
        .await
        .map_err(|e| anyhow!("GET {}: {}", url, e))
}

/// Optional document: any failure is logged and reads as absent.
pub async fn fetch_optional(url: &str) -> Option<String> {
    match fetch_text(url).await {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("[net] {}", e);
            None
        }
    }
}

/// Fetch an image and decode it off the main thread.
pub async fn fetch_bitmap(url: &str) -> anyhow::Result<web::ImageBitmap> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| anyhow!("GET {}: {}", url, e))?;
    if !resp.ok() {
        return Err(anyhow!("GET {}: HTTP {}", url, resp.status()));
    }
    let bytes = resp
        .binary()
        .await
        .map_err(|e| anyhow!("GET {}: {}", url, e))?;
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes.as_slice()));
    let blob = web::Blob::new_with_u8_array_sequence(&parts)
        .map_err(|e| anyhow!("blob {}: {:?}", url, e))?;
    let window = web::window().context("no window")?;
    let promise = window
        .create_image_bitmap_with_blob(&blob)
        .map_err(|e| anyhow!("createImageBitmap {}: {:?}", url, e))?;
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow!("decode {}: {:?}", url, e))?;
    value
        .dyn_into::<web::ImageBitmap>()
        .map_err(|e| anyhow!("decode {}: {:?}", url, e))
}

/// POST a JSON body; returns the status and raw reply text.
pub async fn post_json(url: &str, body: String) -> anyhow::Result<(u16, String)> {
    let resp = Request::post(url)
        .header("Content-Type", "application/json")
        .body(body)
        .map_err(|e| anyhow!("POST {}: {}", url, e))?
        .send()
        .await
        .map_err(|e| anyhow!("POST {}: {}", url, e))?;
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Ok((status, text))
}

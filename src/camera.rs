use crate::input;
use pano_core::{Ray, Viewer};
use web_sys as web;

#[inline]
pub fn canvas_aspect(canvas: &web::HtmlCanvasElement) -> f32 {
    canvas.width() as f32 / (canvas.height().max(1) as f32)
}

/// World-space picking ray under the pointer for the viewer's current camera.
#[inline]
pub fn pointer_ray(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement, viewer: &Viewer) -> Ray {
    let ndc = input::pointer_ndc(ev, canvas);
    viewer.camera(canvas_aspect(canvas)).ray_from_ndc(ndc)
}

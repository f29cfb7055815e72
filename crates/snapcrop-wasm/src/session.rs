//! WASM bindings for the interactive cropping widget.
//!
//! `CropSession` wraps one `CropWidget` for a JavaScript host. The host
//! feeds pointer events, drives the animation clock from its
//! `requestAnimationFrame` loop via `pump`, and repaints whenever the
//! render callback fires with the accepted transform.

use crate::types::JsSourceImage;
use js_sys::Function;
use snapcrop_core::{CropWidget, MaskShape, PointerEvent};
use wasm_bindgen::prelude::*;

fn to_js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One interactive cropping session.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const session = new CropSession(600, 600, true);
/// session.set_render_callback((m) => repaint(m));
/// session.load_image(image);
/// canvas.addEventListener("pointermove", (e) =>
///   session.on_pointer_event({ kind: "Move", pointers: activePointers(e) }));
/// const tick = (now) => { session.pump(now); requestAnimationFrame(tick); };
/// requestAnimationFrame(tick);
/// ```
#[wasm_bindgen]
pub struct CropSession {
    widget: CropWidget,
}

#[wasm_bindgen]
impl CropSession {
    /// Create a session for a widget of the given pixel size.
    ///
    /// `circular` selects the circular mask cut-out; pass `false` for a
    /// rectangular mask.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, circular: bool) -> CropSession {
        let shape = if circular {
            MaskShape::Circle
        } else {
            MaskShape::Rect
        };
        CropSession {
            widget: CropWidget::with_shape(width, height, shape),
        }
    }

    /// Install a new source image; the view resets to cover-fit + centered.
    pub fn load_image(&mut self, image: &JsSourceImage) -> Result<(), JsValue> {
        self.widget.load_image(image.to_source()).map_err(to_js_err)
    }

    /// Feed one pointer sample: `{ kind: "Down" | "Move" | "Up",
    /// pointers: [{ id, x, y }] }`.
    pub fn on_pointer_event(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: PointerEvent = serde_wasm_bindgen::from_value(event).map_err(to_js_err)?;
        self.widget.on_pointer_event(&event);
        Ok(())
    }

    /// Rotate the image by ±90 degrees about the mask center.
    pub fn rotate(&mut self, degrees: f32) {
        self.widget.rotate(degrees);
    }

    /// Register the repaint hook. Called with the accepted transform
    /// (`{ a, b, tx, c, d, ty }`) once per live update or animation frame.
    pub fn set_render_callback(&mut self, callback: &Function) {
        let callback = callback.clone();
        self.widget.set_render_callback(move |m| {
            if let Ok(value) = serde_wasm_bindgen::to_value(m) {
                // A throwing host callback must not unwind into the widget.
                if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                    web_sys::console::warn_2(&JsValue::from_str("render callback failed:"), &e);
                }
            }
        });
    }

    /// Advance the animation clock (milliseconds, e.g. a
    /// `requestAnimationFrame` timestamp) and deliver due snap-back frames.
    pub fn pump(&mut self, now_ms: f64) {
        self.widget.pump(now_ms.max(0.0) as u64);
    }

    /// True while snap-back frames are pending.
    pub fn is_animating(&self) -> bool {
        self.widget.is_animating()
    }

    /// The crop rectangle in source pixel coordinates
    /// (`{ left, top, right, bottom }`), or `null`.
    pub fn crop_rect(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.widget.crop_rect()).map_err(to_js_err)
    }

    /// The cropped output image, or `None` when no image is loaded or
    /// nothing of it sits under the mask.
    pub fn cropped_image(&self) -> Option<JsSourceImage> {
        self.widget.cropped_image().map(JsSourceImage::from_source)
    }

    /// The fixed mask rectangle in widget coordinates.
    pub fn mask_rect(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.widget.mask_rect()).map_err(to_js_err)
    }

    /// Resize the widget: recomputes the mask and overlay, re-centers the
    /// image.
    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        self.widget.on_size_changed(width, height);
    }

    /// RGBA pixels of the cached shadow overlay, or `None` after dispose.
    pub fn overlay_rgba(&self) -> Option<Vec<u8>> {
        self.widget.overlay().map(|o| o.pixels.clone())
    }

    /// Release the source image and cached overlay.
    pub fn dispose(&mut self) {
        self.widget.dispose();
    }
}


/// WASM-specific tests that require JsValue.
///
/// These exercise the serde-wasm-bindgen paths (pointer events in, crop
/// rect out) and can only run on wasm32 targets. Use `wasm-pack test` to
/// run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct TestPointer {
        id: u32,
        x: f32,
        y: f32,
    }

    #[derive(Serialize)]
    struct TestEvent {
        kind: &'static str,
        pointers: Vec<TestPointer>,
    }

    fn event(kind: &'static str, pointers: Vec<TestPointer>) -> JsValue {
        serde_wasm_bindgen::to_value(&TestEvent { kind, pointers }).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_pointer_event_round_trip() {
        let mut s = CropSession::new(600, 600, true);
        let img = crate::types::JsSourceImage::new(800, 800, vec![128u8; 800 * 800 * 3]);
        s.load_image(&img).unwrap();

        s.on_pointer_event(event(
            "Down",
            vec![TestPointer { id: 0, x: 300.0, y: 300.0 }],
        ))
        .unwrap();
        s.on_pointer_event(event(
            "Move",
            vec![TestPointer { id: 0, x: 310.0, y: 300.0 }],
        ))
        .unwrap();
        s.on_pointer_event(event("Up", vec![])).unwrap();

        // The crop rect serializes as an object, not null.
        let rect = s.crop_rect().unwrap();
        assert!(!rect.is_null());
    }

    #[wasm_bindgen_test]
    fn test_malformed_event_is_rejected() {
        let mut s = CropSession::new(600, 600, true);
        let img = crate::types::JsSourceImage::new(800, 800, vec![128u8; 800 * 800 * 3]);
        s.load_image(&img).unwrap();

        let result = s.on_pointer_event(JsValue::from_str("not an event"));
        assert!(result.is_err());
    }
}

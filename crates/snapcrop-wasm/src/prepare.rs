//! WASM bindings for source conditioning.
//!
//! Hosts run these on a freshly decoded bitmap before handing it to a
//! `CropSession`: the widget never needs more resolution than the display
//! can show, and the conditioning pass applies the standard saturation
//! lift.

use crate::types::JsSourceImage;
use snapcrop_core::prepare;
use wasm_bindgen::prelude::*;

/// Condition a source image: bound the longest edge (aspect preserved,
/// never upscaled) and apply the saturation lift.
///
/// Pass `0` for `max_edge` to use the default bound.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const working = condition_source(decoded, 0);
/// session.load_image(working);
/// ```
#[wasm_bindgen]
pub fn condition_source(image: &JsSourceImage, max_edge: u32) -> Result<JsSourceImage, JsValue> {
    let bound = if max_edge == 0 {
        prepare::DEFAULT_SOURCE_BOUND
    } else {
        max_edge
    };
    prepare::condition_source(&image.to_source(), bound)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Bound the longest edge only, without the saturation lift.
#[wasm_bindgen]
pub fn resize_to_bound(image: &JsSourceImage, max_edge: u32) -> Result<JsSourceImage, JsValue> {
    prepare::resize_to_bound(&image.to_source(), max_edge)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

//! Snapcrop WASM - WebAssembly bindings for the Snapcrop widget
//!
//! This crate exposes the snapcrop-core cropping engine to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The interactive `CropSession` class (pointer events,
//!   snap-back animation pump, crop output)
//! - `types` - WASM-compatible wrapper types for image data
//! - `prepare` - Source conditioning (resolution bound, saturation lift)
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropSession, JsSourceImage, condition_source } from '@snapcrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const image = new JsSourceImage(width, height, rgbPixels);
//! const session = new CropSession(600, 600, true);
//! session.load_image(condition_source(image, 0));
//! ```

use wasm_bindgen::prelude::*;

mod prepare;
mod session;
mod types;

// Re-export public types
pub use prepare::{condition_source, resize_to_bound};
pub use session::CropSession;
pub use types::JsSourceImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

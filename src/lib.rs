#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod config;
pub mod geometry;

// Only compile the DOM-facing code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    mod render;

    use crate::config::Config;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // The background is purely cosmetic: a page without the canvas (or
        // with some other element claiming its id) just runs without it.
        let Some(element) = document.get_element_by_id("bg") else {
            return Ok(());
        };
        let Ok(canvas) = element.dyn_into::<web_sys::HtmlCanvasElement>() else {
            return Ok(());
        };

        render::start(canvas, Config::default())
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}

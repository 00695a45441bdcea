//! A WebGL mirror ball.
//!
//! The crate compiles to a wasm module whose exported `install`, `start`,
//! `uninstall` and `options` functions let a host page run the effect on a
//! canvas of its choosing. Loading the module also boots a default
//! instance on a 256x256 canvas if the page carries the expected
//! container element.
//!
//! The interesting parts are native and unit-tested: dual-quaternion
//! camera math (`math`), procedural ball geometry and environment
//! textures (`gfx`).

#[cfg(target_family = "wasm")]
mod app;
mod gfx;
mod keys;
mod math;
mod opts;
mod stats;
#[cfg(target_family = "wasm")]
mod web;

#[cfg(target_family = "wasm")]
pub use exports::*;

#[cfg(target_family = "wasm")]
mod exports {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{console, HtmlCanvasElement};

    use crate::app::{self, App};
    use crate::gfx::renderer::DiscoballRenderer;
    use crate::keys::KeyState;
    use crate::opts::InstallOptions;
    use crate::web::panic_handler;

    /// Id of the element the boot canvas is appended to.
    const CONTAINER_ID: &str = "nameFieldContainer";

    /// Edge length of the boot canvas, in CSS pixels.
    const CANVAS_SIZE: u32 = 256;

    /// Module entry point: installs the panic hook and, if the host page
    /// has the container element, boots a default instance into it.
    #[wasm_bindgen(start)]
    pub fn boot() -> Result<(), JsValue> {
        panic_handler::init();

        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let Some(container) = document.get_element_by_id(CONTAINER_ID) else {
            // the page drives install() itself
            console::warn_1(&JsValue::from_str(&format!(
                "discoball: no #{CONTAINER_ID} element, skipping auto-install"
            )));
            return Ok(());
        };

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(CANVAS_SIZE);
        canvas.set_height(CANVAS_SIZE);
        container.append_child(&canvas)?;

        install(canvas, JsValue::NULL)?;
        start();
        Ok(())
    }

    /// Installs the effect on a canvas. A previously installed instance
    /// is uninstalled first. `options` may be a plain object,
    /// `null` or `undefined`; see [`options`] for the defaults.
    #[wasm_bindgen]
    pub fn install(canvas: HtmlCanvasElement, options: JsValue) -> Result<(), JsValue> {
        // the old instance goes first, so its key listeners and GL state
        // are gone before the new instance touches the document
        app::deactivate();
        let options = InstallOptions::from_js(&options)?;
        let key_state = Rc::new(RefCell::new(KeyState::default()));
        let renderer = Box::new(DiscoballRenderer::new(Rc::clone(&key_state), &options));
        let app = App::install(canvas, renderer, key_state, &options)?;
        app::activate(app);
        Ok(())
    }

    /// Starts the frame loop. Warns (and does nothing) if no instance is
    /// installed; starting twice is harmless.
    #[wasm_bindgen]
    pub fn start() {
        app::start_loop();
    }

    /// Stops the frame loop and releases the canvas, GL resources and
    /// key listeners of the installed instance, if any.
    #[wasm_bindgen]
    pub fn uninstall() {
        app::deactivate();
    }

    /// The default install options, as a plain JS object the caller can
    /// tweak and pass back to [`install`].
    #[wasm_bindgen]
    pub fn options() -> Result<JsValue, JsValue> {
        InstallOptions::default().to_js()
    }
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::WebGlRenderingContext as Gl;
use web_sys::{console, Document, HtmlCanvasElement, HtmlElement, Performance};

use crate::keys::{KeyState, Keys};
use crate::opts::InstallOptions;
use crate::stats::FrameStats;

/// The lifecycle a renderer plugs into the frame loop.
///
/// `on_create` runs once after the GL context is acquired, `on_change`
/// whenever the canvas is resized (including once before the first draw),
/// `on_draw` every animation frame and `on_destroy` on uninstall.
pub(crate) trait Renderer {
    fn on_create(&mut self, gl: &Gl) -> Result<(), JsValue>;
    fn on_change(&mut self, gl: &Gl, width: u32, height: u32);
    fn on_draw(&mut self, gl: &Gl);
    fn on_destroy(&mut self, gl: &Gl);
}

/// Optional frame-time readout written into a host element.
struct StatsReadout {
    element: HtmlElement,
    performance: Performance,
    stats: FrameStats,
    last_ms: f64,
}

impl StatsReadout {
    fn new(document: &Document, id: &str) -> Option<Self> {
        let element = document.get_element_by_id(id)?.dyn_into().ok()?;
        let performance = document.default_view()?.performance()?;
        let last_ms = performance.now();
        Some(Self {
            element,
            performance,
            stats: FrameStats::new(),
            last_ms,
        })
    }

    fn tick(&mut self) {
        let now = self.performance.now();
        self.stats.record(now - self.last_ms);
        self.last_ms = now;
        self.element.set_inner_text(&self.stats.text());
    }
}

/// One installed instance: canvas, GL context, renderer and input wiring.
pub(crate) struct App {
    generation: u64,
    canvas: HtmlCanvasElement,
    gl: Gl,
    renderer: Box<dyn Renderer>,
    keys: Keys,
    stats: Option<StatsReadout>,
    size: Option<(u32, u32)>,
    running: bool,
}

impl App {
    pub(crate) fn install(
        canvas: HtmlCanvasElement,
        mut renderer: Box<dyn Renderer>,
        key_state: Rc<RefCell<KeyState>>,
        options: &InstallOptions,
    ) -> Result<Self, JsValue> {
        let document = canvas
            .owner_document()
            .ok_or_else(|| JsValue::from_str("canvas is not attached to a document"))?;

        let mut keys = Keys::new(document.clone(), key_state);
        keys.install()?;

        let gl: Gl = canvas
            .get_context("webgl")?
            .ok_or_else(|| JsValue::from_str("WebGL is not supported"))?
            .dyn_into()?;

        renderer.on_create(&gl)?;

        let stats = options
            .stats
            .as_deref()
            .and_then(|id| StatsReadout::new(&document, id));

        Ok(Self {
            generation: 0,
            canvas,
            gl,
            renderer,
            keys,
            stats,
            size: None,
            running: false,
        })
    }

    /// Tracks CSS-driven resizes; the drawing buffer follows the element.
    fn check_dimensions(&mut self) {
        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        if width == 0 || height == 0 {
            return;
        }
        if self.size != Some((width, height)) {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.renderer.on_change(&self.gl, width, height);
            self.size = Some((width, height));
        }
    }

    fn frame(&mut self) {
        self.check_dimensions();
        if let Some(stats) = &mut self.stats {
            stats.tick();
        }
        self.renderer.on_draw(&self.gl);
        self.keys.update();
    }

    fn teardown(&mut self) {
        self.running = false;
        self.renderer.on_destroy(&self.gl);
        self.keys.uninstall();
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    /// Bumped on every install/uninstall so stale animation-frame
    /// callbacks from a previous instance fall through harmlessly.
    static GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Replaces the current instance, tearing the old one down first.
pub(crate) fn activate(mut app: App) {
    deactivate();
    let generation = GENERATION.with(|cell| {
        let next = cell.get() + 1;
        cell.set(next);
        next
    });
    app.generation = generation;
    APP.with(|cell| *cell.borrow_mut() = Some(app));
}

/// Tears down and drops the current instance, if any.
pub(crate) fn deactivate() {
    GENERATION.with(|cell| cell.set(cell.get() + 1));
    if let Some(mut app) = APP.with(|cell| cell.borrow_mut().take()) {
        app.teardown();
    }
}

/// Starts the frame loop for the installed instance.
pub(crate) fn start_loop() {
    let generation = APP.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            None => {
                console::warn_1(&JsValue::from_str("discoball: start called before install"));
                None
            }
            Some(app) if app.running => None,
            Some(app) => {
                app.running = true;
                Some(app.generation)
            }
        }
    });
    if let Some(generation) = generation {
        if let Err(e) = schedule_frame(generation) {
            console::error_1(&e);
        }
    }
}

fn schedule_frame(generation: u64) -> Result<(), JsValue> {
    let window =
        web_sys::window().ok_or_else(|| JsValue::from_str("no window to schedule frames on"))?;
    let closure = Closure::once(move || on_frame(generation));
    window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_frame(generation: u64) {
    let keep_going = GENERATION.with(|cell| cell.get()) == generation
        && APP.with(|cell| {
            let mut slot = cell.borrow_mut();
            match slot.as_mut() {
                Some(app) if app.running && app.generation == generation => {
                    app.frame();
                    true
                }
                _ => false,
            }
        });
    if keep_going {
        if let Err(e) = schedule_frame(generation) {
            console::error_1(&e);
        }
    }
}

use std::panic::PanicHookInfo;

use wasm_bindgen::JsValue;
use web_sys::console;

/// Routes panic messages to the browser console, where they would
/// otherwise vanish into an opaque `unreachable` trap.
pub(crate) fn init() {
    std::panic::set_hook(Box::new(hook));
}

fn hook(info: &PanicHookInfo<'_>) {
    let payload = info.payload();
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    };
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "unknown location".to_owned());
    console::error_1(&JsValue::from_str(&format!(
        "discoball panicked at {location}: {message}"
    )));
}

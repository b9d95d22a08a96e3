//! Console logging bridge
//!
//! Warnings go to the browser console on wasm32 and to stderr elsewhere,
//! so skipped dictionary entries stay visible in native test runs too.

#[cfg(target_arch = "wasm32")]
pub(crate) fn warn(msg: &str) {
    web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(msg));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn warn(msg: &str) {
    eprintln!("{}", msg);
}

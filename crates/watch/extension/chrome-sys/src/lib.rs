//! Bindings for the slice of the `chrome.*` extension API that ChatterinoWatch uses.

pub mod port;
pub mod runtime;
pub mod tabs;
pub mod windows;

use wasm_bindgen::JsValue;

/// Renders a rejected promise or thrown value for logging.
pub fn describe_js_error(error: &JsValue) -> String {
    if let Some(message) = js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
    {
        return message;
    }
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

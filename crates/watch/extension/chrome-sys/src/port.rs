use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;

// Ports returned by `connectNative` expose their events as plain objects, so these go through
// `Reflect` rather than typed bindings.

pub fn add_on_disconnect_listener(port: &JsValue, callback: &Function) -> Result<(), JsValue> {
    // Retrieve the `onDisconnect` object from `port`
    let on_disconnect = Reflect::get(port, &JsValue::from_str("onDisconnect"))?;

    let add_listener_func =
        Reflect::get(&on_disconnect, &JsValue::from_str("addListener"))?.dyn_into::<Function>()?;

    add_listener_func.call1(&on_disconnect, callback)?;

    Ok(())
}

pub fn post_message(port: &JsValue, message: &JsValue) -> Result<(), JsValue> {
    let post_message_func =
        Reflect::get(port, &JsValue::from_str("postMessage"))?.dyn_into::<Function>()?;

    post_message_func.call1(port, message)?;

    Ok(())
}

pub fn disconnect(port: &JsValue) -> Result<(), JsValue> {
    let disconnect_func =
        Reflect::get(port, &JsValue::from_str("disconnect"))?.dyn_into::<Function>()?;

    disconnect_func.call0(port)?;

    Ok(())
}

/// Firefox reports the reason for a disconnect on `port.error`.
pub fn error(port: &JsValue) -> Option<String> {
    Reflect::get(port, &JsValue::from_str("error"))
        .ok()
        .filter(|error| !error.is_undefined() && !error.is_null())
        .map(|error| crate::describe_js_error(&error))
}

use js_sys::{Function, Promise, Reflect};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstalledDetails {
    /// "install" | "update" | "chrome_update" | "shared_module_update"
    pub reason: String,
    pub previous_version: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessageSender {
    pub id: Option<String>,
    pub url: Option<String>,
    pub tab: Option<crate::tabs::Info>,
}

#[wasm_bindgen]
extern "C" {
    // Binding for chrome.runtime.connectNative
    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = connectNative, catch)]
    fn runtime_connect_native(application: &str) -> Result<JsValue, JsValue>;

    // Binding for chrome.runtime.sendMessage (promise form)
    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage, catch)]
    fn runtime_send_message(message: &JsValue) -> Result<Promise, JsValue>;

    // Binding for chrome.runtime.onMessage.addListener
    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    fn runtime_add_on_message_listener(callback: &Function);

    // Binding for chrome.runtime.onInstalled.addListener
    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onInstalled"], js_name = addListener)]
    fn runtime_add_on_installed_listener(callback: &Function);
}

// Rust wrappers

pub fn connect_native(application: &str) -> Result<JsValue, JsValue> {
    runtime_connect_native(application)
}

pub async fn send_message(message: &JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(runtime_send_message(message)?).await
}

pub fn on_message_add_listener(callback: &Function) {
    runtime_add_on_message_listener(callback);
}

pub fn on_installed_add_listener(callback: &Function) {
    runtime_add_on_installed_listener(callback);
}

/// `chrome.runtime.lastError.message`, if an error is pending.
pub fn last_error() -> Option<String> {
    let chrome = Reflect::get(&js_sys::global(), &JsValue::from_str("chrome")).ok()?;
    let runtime = Reflect::get(&chrome, &JsValue::from_str("runtime")).ok()?;
    let error = Reflect::get(&runtime, &JsValue::from_str("lastError")).ok()?;
    if error.is_undefined() || error.is_null() {
        return None;
    }
    Some(crate::describe_js_error(&error))
}

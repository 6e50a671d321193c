use js_sys::{Function, Promise};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub id: Option<i32>,
    pub window_id: i32,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInfo {
    pub tab_id: i32,
    pub window_id: i32,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    pub url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[wasm_bindgen]
extern "C" {
    // Binding for chrome.tabs.get
    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = get, catch)]
    fn tabs_get(tab_id: i32) -> Result<Promise, JsValue>;

    // Binding for chrome.tabs.create
    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = create, catch)]
    fn tabs_create(create_properties: &JsValue) -> Result<Promise, JsValue>;

    // Binding for chrome.tabs.onActivated.addListener
    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onActivated"], js_name = addListener)]
    fn tabs_add_on_activated_listener(callback: &Function);

    // Binding for chrome.tabs.onUpdated.addListener
    #[wasm_bindgen(js_namespace = ["chrome", "tabs", "onUpdated"], js_name = addListener)]
    fn tabs_add_on_updated_listener(callback: &Function);
}

// Rust wrappers

pub async fn get(tab_id: i32) -> Result<Info, JsValue> {
    let response = JsFuture::from(tabs_get(tab_id)?).await?;
    from_value(response).map_err(|e| JsValue::from_str(&format!("Failed to parse tab: {e}")))
}

pub async fn create(properties: &CreateProperties) -> Result<Info, JsValue> {
    let properties_js = to_value(properties).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let response = JsFuture::from(tabs_create(&properties_js)?).await?;
    from_value(response).map_err(|e| JsValue::from_str(&format!("Failed to parse tab: {e}")))
}

pub fn on_activated_add_listener(callback: &Function) {
    tabs_add_on_activated_listener(callback);
}

pub fn on_updated_add_listener(callback: &Function) {
    tabs_add_on_updated_listener(callback);
}

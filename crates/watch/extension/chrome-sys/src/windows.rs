use js_sys::Promise;
use serde::Deserialize;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub id: Option<i32>,
    pub focused: bool,
}

#[wasm_bindgen]
extern "C" {
    // Binding for chrome.windows.get
    #[wasm_bindgen(js_namespace = ["chrome", "windows"], js_name = get, catch)]
    fn windows_get(window_id: i32) -> Result<Promise, JsValue>;
}

pub async fn get(window_id: i32) -> Result<Info, JsValue> {
    let response = JsFuture::from(windows_get(window_id)?).await?;
    from_value(response).map_err(|e| JsValue::from_str(&format!("Failed to parse window: {e}")))
}

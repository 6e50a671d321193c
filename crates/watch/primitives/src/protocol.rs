use derive_more::Display;
use gloo_utils::format::JsValueSerdeExt;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::ChannelName;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Select,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitch,
}

/// The message Chatterino understands over native messaging:
///
/// ```json
/// { "action": "select", "type": "twitch", "version": 0, "winId": "12", "name": "pokimane" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Display)]
#[display("SelectChannel {{ name: {}, win_id: {} }}", name, win_id)]
#[serde(rename_all = "camelCase")]
pub struct SelectChannel {
    pub action: Action,
    #[serde(rename = "type")]
    pub platform: Platform,
    pub version: u32,
    /// Browser window id, rendered as a decimal string.
    pub win_id: String,
    pub name: ChannelName,
}

impl SelectChannel {
    pub const VERSION: u32 = 0;

    pub fn new(channel: ChannelName, window_id: i32) -> Self {
        Self {
            action: Action::Select,
            platform: Platform::Twitch,
            version: Self::VERSION,
            win_id: window_id.to_string(),
            name: channel,
        }
    }

    pub fn to_js_value(&self) -> Result<JsValue, JsValue> {
        JsValue::from_serde(self)
            .map_err(|_| JsValue::from_str("Failed to serialize SelectChannel to JsValue"))
    }
}

/// Sent from the content script to the background worker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RelayMessage {
    LocationUpdated { channel: String },
}

impl RelayMessage {
    pub fn location_updated(channel: &ChannelName) -> Self {
        Self::LocationUpdated {
            channel: channel.to_string(),
        }
    }

    pub fn to_js_value(&self) -> Result<JsValue, JsValue> {
        JsValue::from_serde(self)
            .map_err(|_| JsValue::from_str("Failed to serialize RelayMessage to JsValue"))
    }

    pub fn from_js_value(js_value: &JsValue) -> Result<Self, JsValue> {
        js_value
            .into_serde()
            .map_err(|_| JsValue::from_str("Failed to deserialize JsValue into RelayMessage"))
    }
}

/// Informational reply to a [`RelayMessage`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayResponse {
    pub success: bool,
}

impl RelayResponse {
    pub fn to_js_value(self) -> Result<JsValue, JsValue> {
        JsValue::from_serde(&self)
            .map_err(|_| JsValue::from_str("Failed to serialize RelayResponse to JsValue"))
    }
}

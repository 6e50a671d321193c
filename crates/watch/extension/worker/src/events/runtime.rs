use std::rc::Rc;

use chrome_sys::runtime::{InstalledDetails, MessageSender};
use js_sys::Function;
use serde_wasm_bindgen::from_value;
use tracing::{trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use watch_primitives::RelayMessage;

use crate::entry::WorkerExtension;

// To be used with the `chrome.runtime.onInstalled` event
pub(crate) async fn runtime_on_installed(extension: Rc<WorkerExtension>, details: JsValue) {
    match from_value::<InstalledDetails>(details) {
        Ok(details) => extension.on_installed(&details.reason).await,
        Err(e) => warn!(error = %e, "Malformed onInstalled details"),
    }
}

// Handles `location-updated` relays received through `chrome.runtime.onMessage`
pub(crate) fn runtime_on_message(
    extension: Rc<WorkerExtension>,
    message: JsValue,
    sender: JsValue,
    send_response: JsValue,
) {
    let message = match RelayMessage::from_js_value(&message) {
        Ok(message) => message,
        Err(_) => {
            trace!("Payload is not a RelayMessage.");
            return;
        }
    };

    let sender: MessageSender = from_value(sender).unwrap_or_default();
    let window_id = sender.tab.map(|tab| tab.window_id);

    let (response, accepted) = extension.acknowledge_relay(&message, window_id);
    respond(&send_response, response.to_js_value());

    if let Some((channel, window_id)) = accepted {
        spawn_local(async move {
            let disposition = extension.on_relay(channel, window_id).await;
            trace!(window_id, ?disposition, "Relay handled");
        });
    }
}

fn respond(send_response: &JsValue, response: Result<JsValue, JsValue>) {
    let Some(send_response) = send_response.dyn_ref::<Function>() else {
        return;
    };

    let result = response.and_then(|response| send_response.call1(&JsValue::NULL, &response));
    if let Err(e) = result {
        warn!(error = ?e, "Failed to answer relay");
    }
}

use std::rc::Rc;

use chrome_sys::tabs::{ActiveInfo, ChangeInfo, Info};
use serde_wasm_bindgen::from_value;
use tracing::{trace, warn};
use wasm_bindgen::prelude::*;

use crate::entry::WorkerExtension;

// Handler for `chrome.tabs.onActivated` event
pub(crate) async fn tabs_on_activated(extension: Rc<WorkerExtension>, active_info: JsValue) {
    let active_info: ActiveInfo = match from_value(active_info) {
        Ok(info) => info,
        Err(e) => {
            warn!(error = %e, "Malformed onActivated payload");
            return;
        }
    };

    let disposition = extension.on_tab_activated(active_info.tab_id).await;
    trace!(tab_id = active_info.tab_id, ?disposition, "Tab activation handled");
}

// Handler for `chrome.tabs.onUpdated` event
pub(crate) async fn tabs_on_updated(
    extension: Rc<WorkerExtension>,
    tab_id: JsValue,
    change_info: JsValue,
    tab: JsValue,
) {
    let Some(tab_id) = tab_id.as_f64().map(|id| id as i32) else {
        warn!("onUpdated without a numeric tab id");
        return;
    };

    let change_info: ChangeInfo = from_value(change_info).unwrap_or_default();
    let Some(url) = change_info.url else {
        trace!(tab_id, "No URL change detected for tab");
        return;
    };

    let tab: Info = match from_value(tab) {
        Ok(tab) => tab,
        Err(e) => {
            warn!(tab_id, error = %e, "Malformed onUpdated tab");
            return;
        }
    };

    let disposition = extension
        .on_tab_updated(tab_id, Some(&url), tab.window_id)
        .await;
    trace!(tab_id, ?disposition, "Tab update handled");
}

mod runtime;
use runtime::*;
mod tabs;
use tabs::*;

use std::rc::Rc;

use tracing::trace;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::entry::WorkerExtension;

pub(crate) fn setup_listeners(extension: Rc<WorkerExtension>) {
    // Runtime `on_installed` event
    let closure = {
        let extension = extension.clone();
        Closure::wrap(Box::new(move |details: JsValue| {
            let extension = extension.clone();
            trace!("runtime::on_installed_add_listener: {:?}", details);
            spawn_local(async move {
                runtime_on_installed(extension, details).await;
            });
        }) as Box<dyn FnMut(JsValue)>)
    };
    chrome_sys::runtime::on_installed_add_listener(closure.as_ref().unchecked_ref());
    closure.forget();

    // Runtime `on_message` event, answered synchronously
    let closure = {
        let extension = extension.clone();
        Closure::wrap(Box::new(
            move |message: JsValue, sender: JsValue, send_response: JsValue| -> JsValue {
                trace!("runtime::on_message_add_listener: {:?}", message);
                runtime_on_message(extension.clone(), message, sender, send_response);
                JsValue::FALSE
            },
        ) as Box<dyn FnMut(JsValue, JsValue, JsValue) -> JsValue>)
    };
    chrome_sys::runtime::on_message_add_listener(closure.as_ref().unchecked_ref());
    closure.forget();

    // Tabs `on_activated` event
    let closure = {
        let extension = extension.clone();
        Closure::wrap(Box::new(move |active_info: JsValue| {
            let extension = extension.clone();
            trace!("tabs::on_activated_add_listener: {:?}", active_info);
            spawn_local(async move {
                tabs_on_activated(extension, active_info).await;
            });
        }) as Box<dyn FnMut(JsValue)>)
    };
    chrome_sys::tabs::on_activated_add_listener(closure.as_ref().unchecked_ref());
    closure.forget();

    // Tabs `on_updated` event
    let closure = {
        let extension = extension.clone();
        Closure::wrap(
            Box::new(move |tab_id: JsValue, change_info: JsValue, tab: JsValue| {
                let extension = extension.clone();
                trace!(
                    "Tab updated: tab_id={:?}, change_info={:?}, tab={:?}",
                    tab_id, change_info, tab
                );
                spawn_local(async move {
                    tabs_on_updated(extension, tab_id, change_info, tab).await;
                });
            }) as Box<dyn FnMut(JsValue, JsValue, JsValue)>,
        )
    };
    chrome_sys::tabs::on_updated_add_listener(closure.as_ref().unchecked_ref());
    closure.forget();
}

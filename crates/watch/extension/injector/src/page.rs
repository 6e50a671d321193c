use tracing::{debug, error, info, trace, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use watch_primitives::{RelayMessage, TimeoutScheduler, WatchConfig, match_channel};
use web_sys::{MutationObserver, MutationObserverInit, Node};

use crate::PageWatcher;

fn current_location() -> Option<(String, String)> {
    let location = web_sys::window()?.location();
    let href = location.href().ok()?;
    let pathname = location.pathname().ok()?;
    Some((href, pathname))
}

// Asks the background worker to forward the channel of the current page, if it is one
async fn send_current_channel() {
    let Some((href, _)) = current_location() else {
        error!("No window location available.");
        return;
    };

    let Some(channel) = match_channel(&href) else {
        trace!(url = %href, "Not a channel page");
        return;
    };

    let message = match RelayMessage::location_updated(&channel).to_js_value() {
        Ok(message) => message,
        Err(e) => {
            error!(error = ?e, "Failed to encode relay message");
            return;
        }
    };

    match chrome_sys::runtime::send_message(&message).await {
        Ok(response) => debug!(%channel, ?response, "Channel relayed"),
        Err(e) => warn!(%channel, error = %chrome_sys::describe_js_error(&e), "Relay failed"),
    }
}

// Watches the player (or the whole document) for changes that follow a navigation
fn observe_navigation(config: &WatchConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))?;

    let target: Node = match document.query_selector(&config.player_selector)? {
        Some(player) => player.into(),
        None => {
            warn!(
                selector = %config.player_selector,
                "Player not found, observing the whole document"
            );
            document.into()
        }
    };

    let initial_path = current_location()
        .map(|(_, pathname)| pathname)
        .unwrap_or_default();
    let mut watcher = PageWatcher::new(
        initial_path,
        TimeoutScheduler,
        config.debounce(),
        || spawn_local(send_current_channel()),
    );

    let callback = Closure::wrap(Box::new(move |_records: JsValue, _observer: JsValue| {
        if let Some((_, pathname)) = current_location() {
            watcher.on_mutation(&pathname);
        }
    }) as Box<dyn FnMut(JsValue, JsValue)>);

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&target, &options)?;

    callback.forget();
    Ok(())
}

// Initialize everything
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    // print pretty errors in wasm https://github.com/rustwasm/console_error_panic_hook
    console_error_panic_hook::set_once();
    wasm_tracing::set_as_global_default();

    let config = WatchConfig::default();

    spawn_local(send_current_channel());
    observe_navigation(&config)?;

    info!("Page watcher started");
    Ok(())
}

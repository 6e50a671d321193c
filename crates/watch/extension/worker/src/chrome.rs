use std::{future::Future, time::Duration};

use chrome_sys::{describe_js_error, port, runtime, tabs, windows};
use tracing::{debug, info};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use watch_primitives::SelectChannel;

use crate::{
    Error,
    host::{Browser, NativeHost, NativePort, TabInfo},
};

/// The real browser, reached through `chrome.*`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChromeHost;

#[derive(Debug, Clone)]
pub(crate) struct ChromePort(JsValue);

impl Browser for ChromeHost {
    fn get_tab(&self, tab_id: i32) -> impl Future<Output = Result<TabInfo, Error>> {
        async move {
            let tab = tabs::get(tab_id).await.map_err(|e| Error::TabLookup {
                tab_id,
                reason: describe_js_error(&e),
            })?;
            Ok(TabInfo {
                window_id: tab.window_id,
                url: tab.url,
            })
        }
    }

    fn is_window_focused(&self, window_id: i32) -> impl Future<Output = Result<bool, Error>> {
        async move {
            windows::get(window_id)
                .await
                .map(|window| window.focused)
                .map_err(|e| Error::WindowLookup {
                    window_id,
                    reason: describe_js_error(&e),
                })
        }
    }

    fn open_tab(&self, url: &str) -> impl Future<Output = Result<(), Error>> {
        let properties = tabs::CreateProperties {
            url: Some(url.to_owned()),
            active: Some(true),
        };
        async move {
            tabs::create(&properties)
                .await
                .map(|_| ())
                .map_err(|e| Error::OpenTab {
                    url: properties.url.clone().unwrap_or_default(),
                    reason: describe_js_error(&e),
                })
        }
    }
}

impl NativeHost for ChromeHost {
    type Port = ChromePort;

    fn connect(
        &self,
        application: &str,
        on_disconnect: Box<dyn FnOnce()>,
    ) -> Result<Self::Port, Error> {
        let connect_error = |e: JsValue| Error::Connect {
            application: application.to_owned(),
            reason: describe_js_error(&e),
        };

        let js_port = runtime::connect_native(application).map_err(connect_error)?;

        let disconnected_port = js_port.clone();
        let listener = Closure::once_into_js(move |_: JsValue| {
            let reason = runtime::last_error().or_else(|| port::error(&disconnected_port));
            info!(?reason, "Native port closed");
            on_disconnect();
        });

        if let Err(e) = port::add_on_disconnect_listener(&js_port, listener.unchecked_ref()) {
            // A port we cannot watch would never be cleared, so do not keep it.
            if let Err(e) = port::disconnect(&js_port) {
                debug!(error = %describe_js_error(&e), "Failed to close unwatched port");
            }
            return Err(connect_error(e));
        }

        debug!(application, "Native port opened");
        Ok(ChromePort(js_port))
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        gloo_timers::future::sleep(duration)
    }
}

impl NativePort for ChromePort {
    fn post_message(&self, message: &SelectChannel) -> Result<(), Error> {
        let message = message
            .to_js_value()
            .map_err(|e| Error::Delivery(describe_js_error(&e)))?;
        port::post_message(&self.0, &message).map_err(|e| Error::Delivery(describe_js_error(&e)))
    }
}

//! Background service worker: follows the focused tab and tells Chatterino which Twitch
//! channel to show.

mod builder;
mod error;
mod host;
mod link;
mod notifier;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod singleton;
mod watcher;

#[cfg(target_arch = "wasm32")]
mod chrome;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(test)]
mod test_utils;

pub use builder::{Extension, ExtensionBuilder};
pub use error::Error;
pub use host::{Browser, Host, NativeHost, NativePort, TabInfo};
pub use link::ExternalLink;
pub use notifier::{ChannelNotifier, NotifyOutcome};
pub use watcher::{ChannelSelection, Disposition, TabWatcher, accept_relay};

#[cfg(target_arch = "wasm32")]
pub use entry::initialize_extension;

#[cfg(target_arch = "wasm32")]
mod entry {
    use tracing::{info, trace, warn};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use watch_primitives::{TimeoutScheduler, WatchConfig};

    use crate::{Extension, ExtensionBuilder, chrome::ChromeHost, events, singleton::Singleton};

    pub(crate) type WorkerExtension = Extension<ChromeHost, TimeoutScheduler>;

    thread_local! {
        static INSTANCE: Singleton<WorkerExtension> = const { Singleton::new() };
    }

    /// Starts the background worker. `config` may be `undefined` or an object overriding any
    /// of the `WatchConfig` fields.
    #[wasm_bindgen]
    pub fn initialize_extension(config: JsValue) -> Result<JsValue, JsValue> {
        let extension = INSTANCE
            .with(|instance| {
                instance.initialize(|| {
                    // print pretty errors in wasm https://github.com/rustwasm/console_error_panic_hook
                    console_error_panic_hook::set_once();
                    wasm_tracing::set_as_global_default();

                    trace!("Starting extension initialization");

                    ExtensionBuilder::new()
                        .with_config(parse_config(config))
                        .with_host(ChromeHost)
                        .build()
                })
            })
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        trace!("Setting up event listeners");
        events::setup_listeners(extension.clone());

        spawn_local(async move {
            extension.run_notifications().await;
        });

        info!("Extension initialized successfully");
        Ok(true.into())
    }

    fn parse_config(config: JsValue) -> WatchConfig {
        if config.is_undefined() || config.is_null() {
            return WatchConfig::default();
        }

        serde_wasm_bindgen::from_value(config).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid configuration, using defaults");
            WatchConfig::default()
        })
    }
}

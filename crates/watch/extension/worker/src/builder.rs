use std::{cell::RefCell, rc::Rc};

use futures::{
    StreamExt,
    channel::mpsc::{UnboundedReceiver, unbounded},
};
use tracing::{debug, info, trace, warn};
use watch_primitives::{ChannelName, Debouncer, RelayMessage, RelayResponse, Scheduler, WatchConfig};

use crate::{
    Error,
    host::Host,
    notifier::ChannelNotifier,
    watcher::{ChannelSelection, Disposition, TabWatcher, accept_relay},
};

/// The background half of the extension: tab watcher, debounced notifier and the link to
/// Chatterino, owned together.
pub struct Extension<H: Host, S: Scheduler> {
    config: WatchConfig,
    host: H,
    watcher: TabWatcher<H>,
    debouncer: Debouncer<ChannelSelection, S>,
    notifier: ChannelNotifier<H>,
    selections: RefCell<Option<UnboundedReceiver<ChannelSelection>>>,
}

impl<H: Host, S: Scheduler> Extension<H, S> {
    pub const fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub const fn notifier(&self) -> &ChannelNotifier<H> {
        &self.notifier
    }

    pub async fn on_tab_activated(&self, tab_id: i32) -> Disposition {
        let disposition = self.watcher.on_activated(tab_id).await;
        self.queue(&disposition);
        disposition
    }

    pub async fn on_tab_updated(
        &self,
        tab_id: i32,
        url: Option<&str>,
        window_id: i32,
    ) -> Disposition {
        let disposition = self.watcher.on_updated(tab_id, url, window_id).await;
        self.queue(&disposition);
        disposition
    }

    /// Validates a relay and builds the immediate response. An accepted relay still goes
    /// through the focus check in [`Extension::on_relay`].
    pub fn acknowledge_relay(
        &self,
        message: &RelayMessage,
        window_id: Option<i32>,
    ) -> (RelayResponse, Option<(ChannelName, i32)>) {
        let accepted = accept_relay(message, window_id);
        let response = RelayResponse {
            success: accepted.is_some(),
        };
        (response, accepted)
    }

    pub async fn on_relay(&self, channel: ChannelName, window_id: i32) -> Disposition {
        let disposition = self.watcher.on_relay(channel, window_id).await;
        self.queue(&disposition);
        disposition
    }

    // To be used with the `chrome.runtime.onInstalled` event
    pub async fn on_installed(&self, reason: &str) {
        if reason != "install" {
            trace!(reason, "Ignoring install event");
            return;
        }

        info!(url = %self.config.install_page, "Opening install page");
        if let Err(e) = self.host.open_tab(&self.config.install_page).await {
            warn!(error = %e, "Failed to open install page");
        }
    }

    /// Feeds debounced selections to the notifier, one at a time, until the extension is
    /// dropped. Only the first call does anything.
    pub async fn run_notifications(&self) {
        let Some(mut selections) = self.selections.borrow_mut().take() else {
            warn!("Notification loop already running");
            return;
        };

        while let Some(selection) = selections.next().await {
            let outcome = self
                .notifier
                .notify(&selection.channel, selection.window_id)
                .await;
            debug!(channel = %selection.channel, ?outcome, "Notification processed");
        }
    }

    fn queue(&self, disposition: &Disposition) {
        if let Disposition::Forwarded(selection) = disposition {
            self.debouncer.call(selection.clone());
        }
    }
}

impl<H: Host, S: Scheduler> std::fmt::Debug for Extension<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("config", &self.config)
            .field("debouncer", &self.debouncer)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct ExtensionBuilder<H, S> {
    config: WatchConfig,
    host: Option<H>,
    scheduler: Option<S>,
}

impl<H: Host, S: Scheduler + Default> Default for ExtensionBuilder<H, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host, S: Scheduler + Default> ExtensionBuilder<H, S> {
    pub fn new() -> Self {
        Self {
            config: WatchConfig::default(),
            host: None,
            scheduler: None,
        }
    }

    pub fn with_config(mut self, config: WatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds the browser and native messaging host
    pub fn with_host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    /// Replaces the default timer used for debouncing
    pub fn with_scheduler(mut self, scheduler: S) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Builds the `Extension`. Debounced selections are queued until
    /// [`Extension::run_notifications`] is polled.
    pub fn build(self) -> Result<Rc<Extension<H, S>>, Error> {
        let host = self.host.ok_or(Error::MissingComponent("host"))?;
        let scheduler = self.scheduler.unwrap_or_default();

        let (sender, receiver) = unbounded();
        let debouncer = Debouncer::new(
            scheduler,
            self.config.debounce(),
            move |selection: ChannelSelection| {
                if let Err(e) = sender.unbounded_send(selection) {
                    warn!(error = %e, "Notification loop is gone");
                }
            },
        );

        debug!(config = ?self.config, "Building extension");

        Ok(Rc::new(Extension {
            notifier: ChannelNotifier::new(host.clone(), &self.config),
            watcher: TabWatcher::new(host.clone()),
            debouncer,
            host,
            config: self.config,
            selections: RefCell::new(Some(receiver)),
        }))
    }
}

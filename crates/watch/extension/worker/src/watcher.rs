use tracing::{debug, trace, warn};
use watch_primitives::{ChannelName, RelayMessage, match_channel};

use crate::host::Browser;

/// A channel seen in a focused window, ready for the debounced notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSelection {
    pub channel: ChannelName,
    pub window_id: i32,
}

/// What became of a tab or relay event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Forwarded(ChannelSelection),
    NoUrl,
    NotAChannel,
    Unfocused,
    LookupFailed,
}

/// Turns tab activations, tab URL updates and content script relays into channel selections.
///
/// Only windows that currently have input focus produce a selection; lookups that fail are
/// logged and the event is dropped.
#[derive(Debug, Clone)]
pub struct TabWatcher<B> {
    browser: B,
}

impl<B: Browser> TabWatcher<B> {
    pub const fn new(browser: B) -> Self {
        Self { browser }
    }

    // Handler for `chrome.tabs.onActivated`
    pub async fn on_activated(&self, tab_id: i32) -> Disposition {
        let tab = match self.browser.get_tab(tab_id).await {
            Ok(tab) => tab,
            Err(e) => {
                warn!(tab_id, error = %e, "Failed to get activated tab");
                return Disposition::LookupFailed;
            }
        };

        match tab.url {
            Some(url) => self.forward_url(&url, tab.window_id).await,
            None => {
                trace!(tab_id, "Activated tab has no URL");
                Disposition::NoUrl
            }
        }
    }

    // Handler for `chrome.tabs.onUpdated`
    pub async fn on_updated(&self, tab_id: i32, url: Option<&str>, window_id: i32) -> Disposition {
        match url {
            Some(url) => self.forward_url(url, window_id).await,
            None => {
                trace!(tab_id, "No URL change detected for tab");
                Disposition::NoUrl
            }
        }
    }

    // Handler for a `location-updated` relay from the content script
    pub async fn on_relay(&self, channel: ChannelName, window_id: i32) -> Disposition {
        self.forward_if_focused(channel, window_id).await
    }

    async fn forward_url(&self, url: &str, window_id: i32) -> Disposition {
        match match_channel(url) {
            Some(channel) => self.forward_if_focused(channel, window_id).await,
            None => {
                trace!(url, "Not a Twitch channel");
                Disposition::NotAChannel
            }
        }
    }

    async fn forward_if_focused(&self, channel: ChannelName, window_id: i32) -> Disposition {
        match self.browser.is_window_focused(window_id).await {
            Ok(true) => {
                debug!(%channel, window_id, "Channel in focused window");
                Disposition::Forwarded(ChannelSelection { channel, window_id })
            }
            Ok(false) => {
                trace!(%channel, window_id, "Window not focused, ignoring");
                Disposition::Unfocused
            }
            Err(e) => {
                warn!(window_id, error = %e, "Failed to get window");
                Disposition::LookupFailed
            }
        }
    }
}

/// Checks a relay before it is acknowledged: the channel must be a valid token and the sender
/// must be a tab in some window.
pub fn accept_relay(message: &RelayMessage, window_id: Option<i32>) -> Option<(ChannelName, i32)> {
    let RelayMessage::LocationUpdated { channel } = message;

    let Some(window_id) = window_id else {
        warn!(%channel, "Relay from a sender without a tab");
        return None;
    };

    match ChannelName::try_from(channel.as_str()) {
        Ok(channel) => Some((channel, window_id)),
        Err(e) => {
            warn!(error = %e, "Rejecting relay");
            None
        }
    }
}

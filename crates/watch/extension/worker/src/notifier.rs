use async_lock::Mutex;
use tracing::{info, trace, warn};
use watch_primitives::{ChannelName, SelectChannel, WatchConfig};

use crate::{host::NativeHost, link::ExternalLink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Handed to the native port.
    Sent,
    /// Same channel as the last one sent.
    Suppressed,
    /// The link could not be established or the post failed.
    Dropped,
}

/// Send gate in front of the [`ExternalLink`]: only a channel different from the last one
/// delivered goes out.
pub struct ChannelNotifier<H: NativeHost> {
    link: ExternalLink<H>,
    // Held across the whole send so the compare and the update cannot interleave with
    // another notification.
    last_sent: Mutex<Option<ChannelName>>,
}

impl<H: NativeHost> ChannelNotifier<H> {
    pub fn new(host: H, config: &WatchConfig) -> Self {
        Self {
            link: ExternalLink::new(host, config),
            last_sent: Mutex::new(None),
        }
    }

    pub async fn notify(&self, channel: &ChannelName, window_id: i32) -> NotifyOutcome {
        let mut last_sent = self.last_sent.lock().await;
        if last_sent.as_ref() == Some(channel) {
            trace!(%channel, "Channel unchanged, skipping");
            return NotifyOutcome::Suppressed;
        }

        let message = SelectChannel::new(channel.clone(), window_id);
        match self.link.send(&message).await {
            Ok(()) => {
                *last_sent = Some(channel.clone());
                info!(%message, "Sent to Chatterino");
                NotifyOutcome::Sent
            }
            Err(e) => {
                warn!(%channel, window_id, error = %e, "Dropping channel notification");
                NotifyOutcome::Dropped
            }
        }
    }

    pub async fn last_sent(&self) -> Option<ChannelName> {
        self.last_sent.lock().await.clone()
    }

    pub fn link(&self) -> &ExternalLink<H> {
        &self.link
    }
}

impl<H: NativeHost> std::fmt::Debug for ChannelNotifier<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelNotifier")
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}

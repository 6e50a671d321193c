use std::time::Duration;

use serde::{Deserialize, Serialize};

const NATIVE_APP: &str = "com.chatterino.chatterino";
const INSTALL_PAGE: &str =
    "https://github.com/miguVT/ChatterinoWatch?tab=readme-ov-file#installation";
const PLAYER_SELECTOR: &str = r#"[data-a-target="video-player"]"#;

/// Tunables shared by the worker and the content script.
///
/// Every field is optional when deserializing; missing keys keep their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchConfig {
    /// Native messaging host name of the desktop application.
    pub native_app: String,
    /// Quiet window for coalescing channel notifications.
    pub debounce_ms: u64,
    /// Retries after the first failed connection attempt.
    pub connect_retries: u32,
    /// Delay before each connection retry.
    pub retry_backoff_ms: u64,
    /// Opened in a new tab on first install.
    pub install_page: String,
    /// Container the content script observes for navigation.
    pub player_selector: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            native_app: NATIVE_APP.to_owned(),
            debounce_ms: 300,
            connect_retries: 3,
            retry_backoff_ms: 1000,
            install_page: INSTALL_PAGE.to_owned(),
            player_selector: PLAYER_SELECTOR.to_owned(),
        }
    }
}

impl WatchConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

//! Types shared between the background worker and the content script.

mod channel;
mod config;
mod debounce;
mod protocol;

pub use channel::{ChannelName, InvalidChannel, match_channel};
pub use config::WatchConfig;
pub use debounce::{Debouncer, Scheduler, TimeoutScheduler};
#[cfg(any(test, feature = "test-utils"))]
pub use debounce::{ManualHandle, ManualScheduler};
pub use protocol::{Action, Platform, RelayMessage, RelayResponse, SelectChannel};

//! Content script for twitch.tv pages. Twitch navigates without reloading, so the script
//! watches the player for DOM changes and asks the background worker to relay the channel
//! whenever the path changes.

mod tracker;

pub use tracker::{PageWatcher, PathTracker};

#[cfg(target_arch = "wasm32")]
mod page;

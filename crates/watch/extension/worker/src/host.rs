use std::{future::Future, time::Duration};

use watch_primitives::SelectChannel;

use crate::Error;

/// The tab fields the watcher cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub window_id: i32,
    pub url: Option<String>,
}

/// Tab and window queries against the browser.
pub trait Browser {
    fn get_tab(&self, tab_id: i32) -> impl Future<Output = Result<TabInfo, Error>>;

    fn is_window_focused(&self, window_id: i32) -> impl Future<Output = Result<bool, Error>>;

    fn open_tab(&self, url: &str) -> impl Future<Output = Result<(), Error>>;
}

/// Native messaging: opening a port to a desktop application.
pub trait NativeHost {
    type Port: NativePort + 'static;

    /// Opens a port to `application`. `on_disconnect` runs once when the other side closes it.
    fn connect(
        &self,
        application: &str,
        on_disconnect: Box<dyn FnOnce()>,
    ) -> Result<Self::Port, Error>;

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

pub trait NativePort: Clone {
    fn post_message(&self, message: &SelectChannel) -> Result<(), Error>;
}

/// Everything the background extension needs from its environment.
pub trait Host: Browser + NativeHost + Clone + 'static {}

impl<T: Browser + NativeHost + Clone + 'static> Host for T {}

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use tracing::{debug, error, info, warn};
use watch_primitives::{SelectChannel, WatchConfig};

use crate::{
    Error,
    host::{NativeHost, NativePort},
};

enum LinkState<P> {
    Disconnected,
    Connected { port: P, generation: u64 },
}

/// Lazily opened native messaging port to Chatterino.
///
/// The port is opened on the first send and reused until the application closes it; the next
/// send after that opens a fresh one. Every port gets a generation number so a late disconnect
/// from an old port never clears a newer one.
pub struct ExternalLink<H: NativeHost> {
    host: H,
    application: String,
    retries: u32,
    backoff: Duration,
    state: Rc<RefCell<LinkState<H::Port>>>,
    generation: Cell<u64>,
}

impl<H: NativeHost> ExternalLink<H> {
    pub fn new(host: H, config: &WatchConfig) -> Self {
        Self {
            host,
            application: config.native_app.clone(),
            retries: config.connect_retries,
            backoff: config.retry_backoff(),
            state: Rc::new(RefCell::new(LinkState::Disconnected)),
            generation: Cell::new(0),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.state.borrow(), LinkState::Connected { .. })
    }

    /// Posts `message`, connecting first if needed. Delivery is fire-and-forget: an `Ok` means
    /// the port accepted the message, not that Chatterino acted on it.
    pub async fn send(&self, message: &SelectChannel) -> Result<(), Error> {
        let (port, generation) = self.connect().await?;

        if let Err(e) = port.post_message(message) {
            warn!(generation, error = %e, "Failed to post message, dropping port");
            clear_if_current(&self.state, generation);
            return Err(e);
        }

        Ok(())
    }

    async fn connect(&self) -> Result<(H::Port, u64), Error> {
        let mut attempts = 0;
        loop {
            if let LinkState::Connected { port, generation } = &*self.state.borrow() {
                return Ok((port.clone(), *generation));
            }

            attempts += 1;
            match self.open() {
                Ok(connected) => return Ok(connected),
                Err(e) => {
                    error!(attempt = attempts, error = %e, "Failed to connect to Chatterino");
                    if attempts > self.retries {
                        return Err(Error::RetriesExhausted {
                            application: self.application.clone(),
                            attempts,
                        });
                    }
                }
            }

            info!(backoff_ms = self.backoff.as_millis() as u64, "Retrying connection");
            self.host.sleep(self.backoff).await;
        }
    }

    fn open(&self) -> Result<(H::Port, u64), Error> {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let state = Rc::downgrade(&self.state);
        let on_disconnect = Box::new(move || {
            if let Some(state) = state.upgrade() {
                if clear_if_current(&state, generation) {
                    info!(generation, "Disconnected from Chatterino");
                } else {
                    debug!(generation, "Ignoring disconnect from a replaced port");
                }
            }
        });

        let port = self.host.connect(&self.application, on_disconnect)?;
        *self.state.borrow_mut() = LinkState::Connected {
            port: port.clone(),
            generation,
        };
        info!(application = %self.application, generation, "Connected to Chatterino");

        Ok((port, generation))
    }
}

fn clear_if_current<P>(state: &RefCell<LinkState<P>>, generation: u64) -> bool {
    let mut state = state.borrow_mut();
    match &*state {
        LinkState::Connected {
            generation: current,
            ..
        } if *current == generation => {
            *state = LinkState::Disconnected;
            true
        }
        _ => false,
    }
}

impl<H: NativeHost> std::fmt::Debug for ExternalLink<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalLink")
            .field("application", &self.application)
            .field("connected", &self.is_connected())
            .field("generation", &self.generation.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use watch_primitives::ChannelName;

    use super::*;
    use crate::test_utils::FakeHost;

    fn message(name: &str) -> SelectChannel {
        SelectChannel::new(ChannelName::try_from(name).unwrap(), 1)
    }

    #[test]
    fn connects_lazily_and_reuses_the_port() {
        let host = FakeHost::new();
        let link = ExternalLink::new(host.clone(), &WatchConfig::default());
        assert!(!link.is_connected());
        assert_eq!(host.connects(), 0);

        block_on(link.send(&message("a"))).unwrap();
        block_on(link.send(&message("b"))).unwrap();

        assert!(link.is_connected());
        assert_eq!(host.connects(), 1);
        assert_eq!(host.sent_names(), vec!["a", "b"]);
    }

    #[test]
    fn reconnects_after_disconnect() {
        let host = FakeHost::new();
        let link = ExternalLink::new(host.clone(), &WatchConfig::default());

        block_on(link.send(&message("a"))).unwrap();
        host.disconnect_latest();
        assert!(!link.is_connected());

        block_on(link.send(&message("b"))).unwrap();
        assert_eq!(host.connects(), 2);
        assert_eq!(host.sent_by_port(), vec![(1, "a".to_owned()), (2, "b".to_owned())]);
    }

    #[test]
    fn stale_disconnect_keeps_newer_port() {
        let host = FakeHost::new();
        let link = ExternalLink::new(host.clone(), &WatchConfig::default());

        block_on(link.send(&message("a"))).unwrap();
        host.fail_next_post();
        assert!(block_on(link.send(&message("b"))).is_err());
        block_on(link.send(&message("c"))).unwrap();
        assert_eq!(host.connects(), 2);

        // The first port reports its disconnect only now.
        host.disconnect(1);
        assert!(link.is_connected());
    }

    #[test]
    fn retries_with_backoff_then_succeeds() {
        let host = FakeHost::new();
        host.fail_connects(2);
        let link = ExternalLink::new(host.clone(), &WatchConfig::default());

        block_on(link.send(&message("a"))).unwrap();

        assert_eq!(host.connect_attempts(), 3);
        assert_eq!(host.sleeps(), vec![Duration::from_secs(1); 2]);
        assert_eq!(host.sent_names(), vec!["a"]);
    }

    #[test]
    fn gives_up_after_bounded_retries() {
        let host = FakeHost::new();
        host.fail_connects(u32::MAX);
        let link = ExternalLink::new(host.clone(), &WatchConfig::default());

        let result = block_on(link.send(&message("a")));

        assert_eq!(
            result,
            Err(Error::RetriesExhausted {
                application: "com.chatterino.chatterino".to_owned(),
                attempts: 4,
            })
        );
        assert_eq!(host.connect_attempts(), 4);
        assert_eq!(host.sleeps().len(), 3);
        assert!(!link.is_connected());
        assert!(host.sent_names().is_empty());
    }

    #[test]
    fn zero_retries_fails_fast() {
        let host = FakeHost::new();
        host.fail_connects(1);
        let config = WatchConfig {
            connect_retries: 0,
            ..Default::default()
        };
        let link = ExternalLink::new(host.clone(), &config);

        assert!(block_on(link.send(&message("a"))).is_err());
        assert!(host.sleeps().is_empty());

        // The next send starts a fresh round of attempts.
        block_on(link.send(&message("a"))).unwrap();
        assert_eq!(host.sent_names(), vec!["a"]);
    }

    #[test]
    fn failed_post_clears_the_port() {
        let host = FakeHost::new();
        let link = ExternalLink::new(host.clone(), &WatchConfig::default());

        host.fail_next_post();
        assert!(matches!(
            block_on(link.send(&message("a"))),
            Err(Error::Delivery(_))
        ));
        assert!(!link.is_connected());
    }
}

use std::{
    cell::RefCell,
    collections::HashMap,
    future::{Future, ready},
    rc::Rc,
    time::Duration,
};

use watch_primitives::SelectChannel;

use crate::{
    Error,
    host::{Browser, NativeHost, NativePort, TabInfo},
};

#[derive(Default)]
struct State {
    tabs: HashMap<i32, TabInfo>,
    focused: HashMap<i32, bool>,
    window_lookups: usize,
    opened_tabs: Vec<String>,
    connect_failures: u32,
    connect_attempts: u32,
    ports: Vec<Option<Box<dyn FnOnce()>>>,
    post_failures: u32,
    sent: Vec<(u32, SelectChannel)>,
    sleeps: Vec<Duration>,
}

/// In-memory browser and native messaging host. Windows that were never given a focus state
/// fail their lookup, like a closed window would.
#[derive(Clone, Default)]
pub(crate) struct FakeHost {
    state: Rc<RefCell<State>>,
}

#[derive(Clone)]
pub(crate) struct FakePort {
    id: u32,
    state: Rc<RefCell<State>>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_tab(&self, tab_id: i32, window_id: i32, url: Option<&str>) {
        self.state.borrow_mut().tabs.insert(
            tab_id,
            TabInfo {
                window_id,
                url: url.map(str::to_owned),
            },
        );
    }

    pub(crate) fn set_focused(&self, window_id: i32, focused: bool) {
        self.state.borrow_mut().focused.insert(window_id, focused);
    }

    /// The next `count` connection attempts throw.
    pub(crate) fn fail_connects(&self, count: u32) {
        self.state.borrow_mut().connect_failures = count;
    }

    pub(crate) fn fail_next_post(&self) {
        self.state.borrow_mut().post_failures += 1;
    }

    /// Simulates Chatterino closing port `id` (1-based, in connection order).
    pub(crate) fn disconnect(&self, id: u32) {
        let hook = self
            .state
            .borrow_mut()
            .ports
            .get_mut(id as usize - 1)
            .and_then(Option::take);
        if let Some(hook) = hook {
            hook();
        }
    }

    pub(crate) fn disconnect_latest(&self) {
        let latest = self.state.borrow().ports.len() as u32;
        self.disconnect(latest);
    }

    pub(crate) fn connects(&self) -> usize {
        self.state.borrow().ports.len()
    }

    pub(crate) fn connect_attempts(&self) -> u32 {
        self.state.borrow().connect_attempts
    }

    pub(crate) fn window_lookups(&self) -> usize {
        self.state.borrow().window_lookups
    }

    pub(crate) fn sent(&self) -> Vec<SelectChannel> {
        self.state
            .borrow()
            .sent
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub(crate) fn sent_names(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .map(|message| message.name.to_string())
            .collect()
    }

    pub(crate) fn sent_by_port(&self) -> Vec<(u32, String)> {
        self.state
            .borrow()
            .sent
            .iter()
            .map(|(port, message)| (*port, message.name.to_string()))
            .collect()
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }

    pub(crate) fn opened_tabs(&self) -> Vec<String> {
        self.state.borrow().opened_tabs.clone()
    }
}

impl Browser for FakeHost {
    fn get_tab(&self, tab_id: i32) -> impl Future<Output = Result<TabInfo, Error>> {
        let tab = self
            .state
            .borrow()
            .tabs
            .get(&tab_id)
            .cloned()
            .ok_or_else(|| Error::TabLookup {
                tab_id,
                reason: "No tab with id".to_owned(),
            });
        ready(tab)
    }

    fn is_window_focused(&self, window_id: i32) -> impl Future<Output = Result<bool, Error>> {
        let mut state = self.state.borrow_mut();
        state.window_lookups += 1;
        let focused = state
            .focused
            .get(&window_id)
            .copied()
            .ok_or_else(|| Error::WindowLookup {
                window_id,
                reason: "No window with id".to_owned(),
            });
        ready(focused)
    }

    fn open_tab(&self, url: &str) -> impl Future<Output = Result<(), Error>> {
        self.state.borrow_mut().opened_tabs.push(url.to_owned());
        ready(Ok(()))
    }
}

impl NativeHost for FakeHost {
    type Port = FakePort;

    fn connect(
        &self,
        application: &str,
        on_disconnect: Box<dyn FnOnce()>,
    ) -> Result<Self::Port, Error> {
        let mut state = self.state.borrow_mut();
        state.connect_attempts += 1;
        if state.connect_failures > 0 {
            state.connect_failures -= 1;
            return Err(Error::Connect {
                application: application.to_owned(),
                reason: "Specified native messaging host not found.".to_owned(),
            });
        }

        state.ports.push(Some(on_disconnect));
        Ok(FakePort {
            id: state.ports.len() as u32,
            state: self.state.clone(),
        })
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.state.borrow_mut().sleeps.push(duration);
        ready(())
    }
}

impl NativePort for FakePort {
    fn post_message(&self, message: &SelectChannel) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if state.post_failures > 0 {
            state.post_failures -= 1;
            return Err(Error::Delivery("Attempting to use a disconnected port object".to_owned()));
        }
        state.sent.push((self.id, message.clone()));
        Ok(())
    }
}

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("failed to look up tab {tab_id}: {reason}")]
    TabLookup { tab_id: i32, reason: String },
    #[error("failed to look up window {window_id}: {reason}")]
    WindowLookup { window_id: i32, reason: String },
    #[error("failed to open tab {url}: {reason}")]
    OpenTab { url: String, reason: String },
    #[error("failed to connect to {application}: {reason}")]
    Connect { application: String, reason: String },
    #[error("gave up connecting to {application} after {attempts} attempts")]
    RetriesExhausted { application: String, attempts: u32 },
    #[error("failed to deliver message: {0}")]
    Delivery(String),
    #[error("extension builder is missing a {0}")]
    MissingComponent(&'static str),
    #[error("extension already initialized")]
    AlreadyInitialized,
}

use crate::error::Result;
use std::time::Duration;

pub(crate) mod chrome;
pub(crate) mod snapshot;

/// A loaded page that stat strategies can query.
pub trait BrowserSession {
    /// Texts of the elements matching `selector`, in document order. Waits up
    /// to `wait` for at least one match and fails if none appears.
    async fn query_texts(&self, selector: &str, wait: Duration) -> Result<Vec<String>>;

    /// Full markup of the page as currently rendered.
    async fn content(&self) -> Result<String>;

    /// Releases the page and whatever process backs it.
    async fn close(self);
}

/// Opens a session with the target page already loaded and settled.
pub trait SessionLauncher {
    type Session: BrowserSession;

    async fn launch(&self, url: &str) -> Result<Self::Session>;
}

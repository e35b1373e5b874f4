mod browser;
mod extractors;
mod storage;

pub use browser::{
    chrome::ChromeLauncher, snapshot::HtmlSnapshot, BrowserSession, SessionLauncher,
};
pub use extractors::StatExtractor;
pub use storage::csv_store::CsvStore;

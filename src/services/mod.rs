pub mod analysis;
#[cfg(feature = "charts")]
pub mod charts;
pub mod monitor;
pub mod probe;
pub mod report;
pub mod retry;
pub mod scraping;

use crate::config::cli::Args;
use crate::domain::storage::StorageKeys;
use crate::error::Result;
use crate::services::retry::RetryConfig;
use clap::Parser;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub(crate) mod cli;

pub const DEFAULT_URL: &str = "https://www.moltbook.com";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A browser build to try before falling back to whatever chromiumoxide
/// detects on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserChannel {
    pub name: &'static str,
    pub executable: &'static str,
}

#[cfg(target_os = "macos")]
const CHANNELS: [BrowserChannel; 2] = [
    BrowserChannel {
        name: "chrome",
        executable: "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    },
    BrowserChannel {
        name: "msedge",
        executable: "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    },
];

#[cfg(target_os = "windows")]
const CHANNELS: [BrowserChannel; 2] = [
    BrowserChannel {
        name: "chrome",
        executable: "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
    },
    BrowserChannel {
        name: "msedge",
        executable: "C:\\Program Files (x86)\\Microsoft\\Edge\\Application\\msedge.exe",
    },
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CHANNELS: [BrowserChannel; 2] = [
    BrowserChannel {
        name: "chrome",
        executable: "google-chrome",
    },
    BrowserChannel {
        name: "msedge",
        executable: "microsoft-edge",
    },
];

/// Everything one scrape needs to know about timing and the browser.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub url: String,
    pub headless: bool,
    pub channels: Vec<BrowserChannel>,
    /// Bound on navigation and on waiting for the load to finish.
    pub navigation_timeout: Duration,
    /// Extra wait after load so client-rendered counters can appear.
    pub settle_delay: Duration,
    /// Wait before the first strategy runs.
    pub warmup: Duration,
    /// How long each locator may take to match anything.
    pub selector_wait: Duration,
    pub retry: RetryConfig,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            headless: true,
            channels: CHANNELS.to_vec(),
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(15),
            warmup: Duration::from_secs(6),
            selector_wait: Duration::from_secs(15),
            retry: RetryConfig::scrape(),
        }
    }
}

pub struct Config {
    pub args: Args,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { args, http_client })
    }

    pub fn csv_path(&self) -> PathBuf {
        self.args.data_dir.join(&self.args.csv_file)
    }

    pub fn scrape_settings(&self) -> ScrapeSettings {
        ScrapeSettings {
            url: self.args.url.clone(),
            headless: !self.args.headful,
            ..ScrapeSettings::default()
        }
    }

    pub fn chart_paths(&self, output_dir: &Path) -> (PathBuf, PathBuf) {
        (
            output_dir.join(format!("{}.png", StorageKeys::CHART_STEM)),
            output_dir.join(format!("{}.svg", StorageKeys::CHART_STEM)),
        )
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if !self.args.data_dir.exists() {
            std::fs::create_dir_all(&self.args.data_dir)?;
        }

        info!("Data dir {} exists", self.args.data_dir.display());
        Ok(())
    }
}

use crate::config::ScrapeSettings;
use crate::domain::storage::Storage;
use crate::domain::{StatRecord, Stats};
use crate::error::{Result, StatsError};
use crate::infrastructure::{BrowserSession, SessionLauncher, StatExtractor};
use crate::services::retry::{retry, RetryConfig};
use tracing::{error, info};

/// Drives one scrape end to end: browser session, extraction, retries.
pub struct ScrapingService<L: SessionLauncher> {
    launcher: L,
    extractor: StatExtractor,
    retry: RetryConfig,
    url: String,
}

impl<L: SessionLauncher> ScrapingService<L> {
    pub fn new(launcher: L, settings: &ScrapeSettings) -> Self {
        info!("Created new Scraping service for {}", settings.url);
        Self {
            launcher,
            extractor: StatExtractor::new(settings.warmup, settings.selector_wait),
            retry: settings.retry.clone(),
            url: settings.url.clone(),
        }
    }

    /// Always produces stats; [`Stats::ZERO`] once every attempt has failed.
    pub async fn scrape(&self) -> Stats {
        match retry(&self.retry, "Scrape", |attempt| self.attempt(attempt)).await {
            Ok(stats) => {
                info!("Successfully scraped stats: {:?}", stats);
                stats
            }
            Err(_) => {
                error!(
                    "All {} attempts failed. Returning empty stats.",
                    self.retry.max_attempts.max(1)
                );
                Stats::ZERO
            }
        }
    }

    async fn attempt(&self, attempt: u32) -> Result<Stats> {
        let session = self.launcher.launch(&self.url).await?;
        let extracted = self.extractor.extract(&session).await;
        session.close().await;

        extracted.ok_or_else(|| {
            StatsError::Extraction(format!(
                "attempt {}: could not extract all stats",
                attempt + 1
            ))
        })
    }

    /// Scrapes and appends the result. Only a storage failure is an error.
    pub async fn run_once(&self, store: &dyn Storage) -> Result<StatRecord> {
        let stats = self.scrape().await;
        let record = StatRecord::now(stats);
        store.append_record(&record)?;
        Ok(record)
    }
}

use crate::domain::storage::Storage;
use crate::domain::{StatRecord, Stats};
use crate::error::Result;
use crate::infrastructure::SessionLauncher;
use crate::services::scraping::ScrapingService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{error, info};

const TICK: Duration = Duration::from_secs(1);

/// Set once a shutdown has been requested; never cleared.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Triggers `flag` on SIGINT or SIGTERM (Ctrl-C on non-Unix platforms).
pub fn listen_for_shutdown(flag: ShutdownFlag) {
    tokio::spawn(async move {
        wait_for_signal().await;
        flag.trigger();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            error!("Cannot listen for SIGTERM: {}", e);
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received SIGINT, shutting down...");
            }
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down..."),
        _ = terminate.recv() => info!("Received SIGTERM, shutting down..."),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl-C, shutting down...");
    }
}

pub struct Monitor<L: SessionLauncher> {
    scraping: ScrapingService<L>,
    store: Arc<dyn Storage>,
    interval: Duration,
    shutdown: ShutdownFlag,
}

impl<L: SessionLauncher> Monitor<L> {
    pub fn new(
        scraping: ScrapingService<L>,
        store: Arc<dyn Storage>,
        interval: Duration,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            scraping,
            store,
            interval,
            shutdown,
        }
    }

    /// Scrapes every `interval` until the shutdown flag is set. Returns an
    /// error only if even the fallback record cannot be written.
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting Moltbook stats monitoring (interval: {}s)",
            self.interval.as_secs()
        );

        while !self.shutdown.is_triggered() {
            let started = Instant::now();
            info!("Starting scrape");

            self.run_cycle().await?;

            let elapsed = started.elapsed();
            info!("Scrape completed in {:.2}s", elapsed.as_secs_f64());

            let ticks = self.interval.saturating_sub(elapsed).as_secs().max(1);
            for _ in 0..ticks {
                if self.shutdown.is_triggered() {
                    break;
                }
                sleep(TICK).await;
            }
        }

        info!("Monitoring stopped");
        Ok(())
    }

    /// One scrape-and-persist pass. A failed pass still leaves a zeroed row
    /// so the series has no gaps.
    pub async fn run_cycle(&self) -> Result<StatRecord> {
        match self.scraping.run_once(self.store.as_ref()).await {
            Ok(record) => Ok(record),
            Err(e) => {
                error!("Error during scrape: {}", e);
                let record = StatRecord::now(Stats::ZERO);
                self.store.append_record(&record)?;
                info!("Saved default stats due to error: {}", record.datetime);
                Ok(record)
            }
        }
    }
}

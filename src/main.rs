use crate::config::cli::Command;
use crate::config::Config;
use crate::domain::storage::Storage;
use crate::error::{Result, StatsError};
use crate::infrastructure::{ChromeLauncher, CsvStore};
use crate::services::monitor::{listen_for_shutdown, Monitor, ShutdownFlag};
use crate::services::probe::probe;
use crate::services::report::report;
use crate::services::scraping::ScrapingService;
use std::fs::OpenOptions;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod config;
mod domain;
mod error;
mod infrastructure;
mod services;

fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<()> {
    let level = Level::from_str(level)
        .map_err(|_| StatsError::Config(format!("unknown log level `{level}`")))?;
    let subscriber = tracing_subscriber::fmt().with_max_level(level);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            subscriber
                .with_ansi(false)
                .with_writer(std::io::stdout.and(Arc::new(file)))
                .init();
        }
        None => subscriber.init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;
    let command = config.args.command.clone().unwrap_or(Command::Scrape);

    let log_file = match &command {
        Command::Monitor { log_file, .. } => Some(log_file.as_path()),
        _ => None,
    };
    init_tracing(&config.args.log_level, log_file)?;

    let store = Arc::new(CsvStore::new(config.csv_path()));

    match command {
        Command::Scrape => {
            config.ensure_directories()?;
            store.initialize()?;

            let settings = config.scrape_settings();
            let scraping = ScrapingService::new(ChromeLauncher::new(settings.clone()), &settings);
            let record = scraping.run_once(store.as_ref()).await?;

            println!(
                "{} | {}",
                record.datetime,
                serde_json::to_string(&record.stats())?
            );
            if record.stats().is_zero() {
                println!("Scrape failed, saved default stats");
            }
        }
        Command::Monitor { interval, .. } => {
            config.ensure_directories()?;
            store.initialize()?;

            let shutdown = ShutdownFlag::default();
            listen_for_shutdown(shutdown.clone());

            let settings = config.scrape_settings();
            let scraping = ScrapingService::new(ChromeLauncher::new(settings.clone()), &settings);
            let monitor = Monitor::new(
                scraping,
                store.clone() as Arc<dyn Storage>,
                Duration::from_secs(interval * 60),
                shutdown,
            );
            monitor.run().await?;
        }
        Command::Visualize { output_dir } => {
            if !output_dir.exists() {
                std::fs::create_dir_all(&output_dir)?;
            }
            let (png, svg) = config.chart_paths(&output_dir);
            report(store.as_ref(), &png, &svg)?;
        }
        Command::Probe => {
            let result = probe(&config.http_client, &config.args.url).await;
            match result {
                Ok(findings) => println!("{}", findings.render()),
                Err(e) => println!("Error connecting to {}: {}", config.args.url, e),
            }
        }
    }

    info!("Done");
    Ok(())
}

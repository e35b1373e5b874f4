use crate::config::DEFAULT_URL;
use crate::domain::storage::StorageKeys;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const MAX_INTERVAL_MINUTES: u64 = 525_600;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Page whose counters are scraped
    #[arg(long, env = "MOLTBOOK_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Directory holding the stats CSV
    #[arg(long, default_value = StorageKeys::DATA_DIR)]
    pub data_dir: PathBuf,

    /// File name of the stats CSV inside the data directory
    #[arg(long, default_value = StorageKeys::STATS_FILE)]
    pub csv_file: String,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headful: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scrape once and append the result to the CSV (default)
    Scrape,
    /// Scrape repeatedly until interrupted
    Monitor {
        /// Minutes between scrapes (at most one year)
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..=MAX_INTERVAL_MINUTES))]
        interval: u64,

        /// File that receives a copy of the log output
        #[arg(long, default_value = "monitor.log")]
        log_file: PathBuf,
    },
    /// Print a summary of the collected data and render charts
    Visualize {
        /// Directory the chart images are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Fetch the page without a browser and report what can be read from it
    Probe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses_with_defaults() {
        let args = Args::try_parse_from(["moltbook-stats"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.data_dir, PathBuf::from("data"));
        assert_eq!(args.csv_file, "moltbook_stats.csv");
        assert!(!args.headful);
    }

    #[test]
    fn monitor_interval_defaults_to_an_hour() {
        let args = Args::try_parse_from(["moltbook-stats", "monitor"]).unwrap();
        match args.command {
            Some(Command::Monitor { interval, log_file }) => {
                assert_eq!(interval, 60);
                assert_eq!(log_file, PathBuf::from("monitor.log"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn monitor_interval_must_be_positive() {
        assert!(Args::try_parse_from(["moltbook-stats", "monitor", "--interval", "0"]).is_err());
        assert!(Args::try_parse_from(["moltbook-stats", "monitor", "--interval", "5"]).is_ok());
    }

    #[test]
    fn monitor_interval_is_bounded_above() {
        assert!(Args::try_parse_from(["moltbook-stats", "monitor", "--interval", "525600"]).is_ok());
        assert!(Args::try_parse_from(["moltbook-stats", "monitor", "--interval", "525601"]).is_err());
        assert!(Args::try_parse_from([
            "moltbook-stats",
            "monitor",
            "--interval",
            "307445734561825861"
        ])
        .is_err());
    }
}

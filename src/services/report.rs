use crate::domain::storage::Storage;
use crate::error::Result;
use crate::services::analysis::{load_samples, summarize};
use std::path::Path;
use tracing::info;

/// How far `report` got. Early exits are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    MissingData,
    NoUsableRows,
    SummaryOnly,
    Charted,
}

/// Prints the summary of the stored series and renders the charts.
pub fn report(store: &dyn Storage, png: &Path, svg: &Path) -> Result<ReportOutcome> {
    let Some(records) = store.load_records()? else {
        println!("CSV file not found: {}", store.location());
        return Ok(ReportOutcome::MissingData);
    };

    let samples = load_samples(records);
    if samples.is_empty() {
        println!("No data to plot");
        return Ok(ReportOutcome::NoUsableRows);
    }

    println!("{}", summarize(&samples));
    render(&samples, png, svg)
}

#[cfg(feature = "charts")]
fn render(
    samples: &[crate::services::analysis::Sample],
    png: &Path,
    svg: &Path,
) -> Result<ReportOutcome> {
    crate::services::charts::render_charts(samples, png, svg)?;
    info!("Charts written to {} and {}", png.display(), svg.display());
    println!(
        "Charts saved as {} and {}",
        png.display(),
        svg.display()
    );
    Ok(ReportOutcome::Charted)
}

#[cfg(not(feature = "charts"))]
fn render(
    _samples: &[crate::services::analysis::Sample],
    _png: &Path,
    _svg: &Path,
) -> Result<ReportOutcome> {
    info!("Built without the `charts` feature");
    println!("Charting support is not available. Rebuild with: cargo build --features charts");
    Ok(ReportOutcome::SummaryOnly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::CsvStore;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_csv_exits_early() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("absent.csv"));
        let outcome = report(&store, &dir.path().join("a.png"), &dir.path().join("a.svg")).unwrap();
        assert_eq!(outcome, ReportOutcome::MissingData);
    }

    #[test]
    fn header_only_or_unreadable_rows_exit_early() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        fs::write(
            &path,
            "timestamp,datetime,ai_agents,submolts,posts,comments\n\
             1,garbage,1,2,3,4\n",
        )
        .unwrap();

        let store = CsvStore::new(&path);
        let outcome = report(&store, &dir.path().join("a.png"), &dir.path().join("a.svg")).unwrap();
        assert_eq!(outcome, ReportOutcome::NoUsableRows);
    }

    #[test]
    fn readable_series_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        fs::write(
            &path,
            "timestamp,datetime,ai_agents,submolts,posts,comments\n\
             1769940000,2026-02-01T10:00:00.000000,100,2,30,4\n\
             1769943647,2026-02-01T11:00:47854,150,3,45,9\n",
        )
        .unwrap();

        let store = CsvStore::new(&path);
        let png = dir.path().join("a.png");
        let svg = dir.path().join("a.svg");
        let outcome = report(&store, &png, &svg).unwrap();

        if cfg!(feature = "charts") {
            assert_eq!(outcome, ReportOutcome::Charted);
            assert!(svg.exists());
        } else {
            assert_eq!(outcome, ReportOutcome::SummaryOnly);
        }
    }
}

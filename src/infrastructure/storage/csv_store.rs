use crate::domain::storage::{Storage, StorageKeys};
use crate::domain::StatRecord;
use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Append-only CSV file of scraped stats.
///
/// There is no file locking, so only one process should write at a time.
#[derive(Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the directory and a header-only file if nothing exists yet.
    pub fn initialize(&self) -> Result<()> {
        self.ensure_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if file.metadata()?.len() == 0 {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(StorageKeys::HEADER)?;
            writer.flush()?;
            info!("Created {}", self.path.display());
        }

        Ok(())
    }

    fn ensure_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                fs::create_dir_all(dir)?;
                debug!("Created directory {}", dir.display());
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl Storage for CsvStore {
    fn append_record(&self, record: &StatRecord) -> Result<()> {
        self.ensure_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let write_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if write_header {
            writer.write_record(StorageKeys::HEADER)?;
        }
        writer.serialize(record)?;
        writer.flush()?;

        info!("Saved to CSV: {:?}", record);
        Ok(())
    }

    fn load_records(&self) -> Result<Option<Vec<StatRecord>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<StatRecord>().enumerate() {
            match row {
                Ok(record) => records.push(record),
                // +2: one for the header, one because rows are 1-based
                Err(e) => warn!("Skipping unreadable row {}: {}", index + 2, e),
            }
        }

        Ok(Some(records))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

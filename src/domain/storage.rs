use super::StatRecord;
use crate::error::Result;

pub trait Storage: Send + Sync {
    /// Appends one row, writing the header first if the store is new or empty.
    fn append_record(&self, record: &StatRecord) -> Result<()>;
    /// All readable rows in file order, or `None` if nothing was ever written.
    fn load_records(&self) -> Result<Option<Vec<StatRecord>>>;
    /// Human-readable location, used in log and console messages.
    fn location(&self) -> String;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const DATA_DIR: &'static str = "data";
    pub const STATS_FILE: &'static str = "moltbook_stats.csv";

    pub const HEADER: [&'static str; 6] = [
        "timestamp",
        "datetime",
        "ai_agents",
        "submolts",
        "posts",
        "comments",
    ];

    pub const CHART_STEM: &'static str = "moltbook_stats";
}

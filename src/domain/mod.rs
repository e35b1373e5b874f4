mod stats;
pub(crate) mod storage;

pub use stats::{StatRecord, Stats};

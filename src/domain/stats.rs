use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// The four counters shown on the Moltbook homepage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub ai_agents: u64,
    pub submolts: u64,
    pub posts: u64,
    pub comments: u64,
}

impl Stats {
    /// Written whenever a scrape cannot determine the real values.
    pub const ZERO: Stats = Stats {
        ai_agents: 0,
        submolts: 0,
        posts: 0,
        comments: 0,
    };

    /// Assigns the first four values in page order. The page is assumed to
    /// list agents, submolts, posts and comments in that order.
    pub fn from_positional(values: &[u64]) -> Option<Self> {
        match values {
            [ai_agents, submolts, posts, comments, ..] => Some(Self {
                ai_agents: *ai_agents,
                submolts: *submolts,
                posts: *posts,
                comments: *comments,
            }),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// One CSV row. Field order matches the file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub timestamp: i64,
    pub datetime: String,
    pub ai_agents: u64,
    pub submolts: u64,
    pub posts: u64,
    pub comments: u64,
}

impl StatRecord {
    pub fn now(stats: Stats) -> Self {
        Self::captured_at(stats, Local::now())
    }

    pub fn captured_at(stats: Stats, at: DateTime<Local>) -> Self {
        Self {
            timestamp: at.timestamp(),
            datetime: at
                .naive_local()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            ai_agents: stats.ai_agents,
            submolts: stats.submolts,
            posts: stats.posts,
            comments: stats.comments,
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            ai_agents: self.ai_agents,
            submolts: self.submolts,
            posts: self.posts,
            comments: self.comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn positional_assignment_takes_first_four() {
        let stats = Stats::from_positional(&[1234, 56, 789, 10, 99]).unwrap();
        assert_eq!(
            stats,
            Stats {
                ai_agents: 1234,
                submolts: 56,
                posts: 789,
                comments: 10
            }
        );
    }

    #[test]
    fn positional_assignment_needs_four_values() {
        assert_eq!(Stats::from_positional(&[1, 2, 3]), None);
        assert_eq!(Stats::from_positional(&[]), None);
    }

    #[test]
    fn record_carries_epoch_and_iso_datetime() {
        let at = Local.with_ymd_and_hms(2026, 2, 1, 23, 20, 47).unwrap();
        let record = StatRecord::captured_at(Stats::ZERO, at);

        assert_eq!(record.timestamp, at.timestamp());
        assert_eq!(record.datetime, "2026-02-01T23:20:47.000000");
        assert!(record.stats().is_zero());
    }
}

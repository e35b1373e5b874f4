use crate::domain::{StatRecord, Stats};
use chrono::{DateTime, NaiveDateTime};
use std::fmt::Write;
use tracing::warn;

/// A stored row whose datetime could be read.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub at: NaiveDateTime,
    pub stats: Stats,
}

const FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Some older rows have the fraction glued onto the seconds, e.g.
/// `23:20:47854` for `23:20:47.854`. Puts the dot back; other input is
/// returned untouched.
fn repair_fraction(raw: &str) -> String {
    let Some((date, time)) = raw.split_once('T') else {
        return raw.to_string();
    };
    if time.contains('.') {
        return raw.to_string();
    }

    let parts: Vec<&str> = time.split(':').collect();
    if let [hours, minutes, seconds] = parts.as_slice() {
        if seconds.len() > 2 && seconds.is_char_boundary(2) {
            let (whole, fraction) = seconds.split_at(2);
            if fraction.len() <= 6 && fraction.bytes().all(|b| b.is_ascii_digit()) {
                return format!("{date}T{hours}:{minutes}:{whole}.{fraction}");
            }
        }
    }

    raw.to_string()
}

/// Parses a stored datetime, repairing the glued-fraction form first.
/// Returns `None` for anything that still is not an ISO-8601 timestamp.
pub fn parse_recorded_datetime(raw: &str) -> Option<NaiveDateTime> {
    let candidate = repair_fraction(raw.trim());

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(&candidate) {
        return Some(with_offset.naive_local());
    }

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&candidate, format).ok())
}

/// Converts stored rows into samples ordered by time, dropping rows whose
/// datetime cannot be read.
pub fn load_samples(records: Vec<StatRecord>) -> Vec<Sample> {
    let mut samples: Vec<Sample> = records
        .into_iter()
        .filter_map(|record| match parse_recorded_datetime(&record.datetime) {
            Some(at) => Some(Sample {
                at,
                stats: record.stats(),
            }),
            None => {
                warn!("Dropping row with unreadable datetime {:?}", record.datetime);
                None
            }
        })
        .collect();

    samples.sort_by_key(|sample| sample.at);
    samples
}

/// `1234567` as `1,234,567`.
pub fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn signed(delta: i128) -> String {
    if delta >= 0 {
        format!("+{}", group_thousands(delta))
    } else {
        group_thousands(delta)
    }
}

fn labelled(stats: &Stats) -> [(&'static str, u64); 4] {
    [
        ("AI Agents", stats.ai_agents),
        ("Submolts", stats.submolts),
        ("Posts", stats.posts),
        ("Comments", stats.comments),
    ]
}

/// The console summary: record count, date range and, with two or more
/// samples, the latest values and their change since the previous sample.
pub fn summarize(samples: &[Sample]) -> String {
    let (Some(first), Some(latest)) = (samples.first(), samples.last()) else {
        return "No data available".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "--- Data Summary ---");
    let _ = writeln!(out, "Total records: {}", samples.len());
    let _ = writeln!(out, "Date range: {} to {}", first.at, latest.at);

    if let [.., previous, latest] = samples {
        let _ = writeln!(out);
        let _ = writeln!(out, "Latest stats ({}):", latest.at);
        for (label, value) in labelled(&latest.stats) {
            let _ = writeln!(out, "  {}: {}", label, group_thousands(value as i128));
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Changes since previous:");
        for ((label, now), (_, before)) in labelled(&latest.stats)
            .into_iter()
            .zip(labelled(&previous.stats))
        {
            let _ = writeln!(out, "  {}: {}", label, signed(now as i128 - before as i128));
        }
    }

    out
}

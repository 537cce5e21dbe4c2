//! Recurring motif mining over the emotion sequence.
//!
//! Every contiguous window of length 2..=4 is a candidate motif. Occurrences
//! are counted (overlapping windows included) and the timestamp of each
//! window's final event is kept so the typical gap between repeats can be
//! reported alongside the count.

use hashbrown::HashMap;

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::emotion::{Emotion, EmotionEvent};

pub const MIN_PATTERN_LEN: usize = 2;
pub const MAX_PATTERN_LEN: usize = 4;
pub const DEFAULT_PATTERN_LENGTHS: [usize; 3] = [2, 3, 4];

/// Number of records returned by [`mine`].
pub const TOP_PATTERNS: usize = 3;

const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_DAY: f64 = 24.0 * MS_PER_HOUR;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "camelCase"))]
pub struct PatternRecord {
    pub sequence: Vec<Emotion>,
    pub count: u32,
    pub avg_interval_ms: f64,
    pub description: String,
}

struct Occurrences {
    sequence: Vec<Emotion>,
    ends: Vec<DateTime<Utc>>,
}

impl Occurrences {
    fn avg_interval_ms(&self) -> f64 {
        if self.ends.len() < 2 {
            return 0.0;
        }
        let total: i64 = self
            .ends
            .windows(2)
            .map(|w| (w[1] - w[0]).num_milliseconds())
            .sum();
        total as f64 / (self.ends.len() - 1) as f64
    }
}

/// Mine the top motifs for the requested window lengths.
///
/// Lengths outside `2..=4` are ignored. Results are ranked by count,
/// descending; ties keep first-seen order. Every motif qualifies, even one
/// seen only once.
pub fn mine(events: &[EmotionEvent], lengths: &[usize]) -> Vec<PatternRecord> {
    let mut index: HashMap<Vec<Emotion>, usize> = HashMap::new();
    let mut found: Vec<Occurrences> = Vec::new();

    for &len in lengths {
        if !(MIN_PATTERN_LEN..=MAX_PATTERN_LEN).contains(&len) {
            continue;
        }
        for window in events.windows(len) {
            let key: Vec<Emotion> = window.iter().map(|e| e.emotion).collect();
            let end = window[len - 1].timestamp;
            match index.get(&key) {
                Some(&i) => found[i].ends.push(end),
                None => {
                    index.insert(key.clone(), found.len());
                    found.push(Occurrences {
                        sequence: key,
                        ends: vec![end],
                    });
                }
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    found.sort_by(|a, b| b.ends.len().cmp(&a.ends.len()));

    found
        .into_iter()
        .take(TOP_PATTERNS)
        .map(|occ| {
            let count = occ.ends.len() as u32;
            let avg_interval_ms = occ.avg_interval_ms();
            PatternRecord {
                description: describe(&occ.sequence, count, avg_interval_ms),
                sequence: occ.sequence,
                count,
                avg_interval_ms,
            }
        })
        .collect()
}

/// Convenience wrapper using lengths 2, 3 and 4.
pub fn mine_default(events: &[EmotionEvent]) -> Vec<PatternRecord> {
    mine(events, &DEFAULT_PATTERN_LENGTHS)
}

fn frequency(count: u32) -> String {
    match count {
        1 => "once".to_string(),
        2 => "twice".to_string(),
        n => format!("{n} times"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Human-readable summary of a motif.
pub fn describe(sequence: &[Emotion], count: u32, avg_interval_ms: f64) -> String {
    let (Some(first), Some(last)) = (sequence.first(), sequence.last()) else {
        return String::new();
    };
    let middle = if sequence.len() > 2 {
        sequence[1..sequence.len() - 1]
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        String::new()
    };

    let mut out = if first == last && sequence.len() > 2 {
        format!(
            "returned to {first} after experiencing {middle} {}",
            frequency(count)
        )
    } else if sequence.len() > 2 {
        format!("move from {first} to {last} via {middle} {}", frequency(count))
    } else {
        format!("move from {first} to {last} {}", frequency(count))
    };

    if avg_interval_ms > 0.0 {
        if avg_interval_ms < MS_PER_DAY {
            let hours = (avg_interval_ms / MS_PER_HOUR).round() as i64;
            out.push_str(&format!(", typically {} apart", plural(hours, "hour")));
        } else {
            let days = (avg_interval_ms / MS_PER_DAY).round() as i64;
            out.push_str(&format!(", typically {} apart", plural(days, "day")));
        }
    }

    out
}

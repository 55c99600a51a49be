//! Spin history log
//!
//! Most-recent-first, persisted to LocalStorage, cleared only on request.

use serde::{Deserialize, Serialize};

use crate::wheel::Prize;

/// A single completed spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Entry id
    pub id: String,
    /// Id of the winning prize
    #[serde(default)]
    pub prize_id: String,
    /// Winning prize label at the time of the spin
    #[serde(rename = "prizeName")]
    pub label: String,
    /// Unix timestamp (ms) when the spin finished
    pub timestamp: i64,
}

/// Spin history, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finished spin at the front of the log
    pub fn record(&mut self, prize: &Prize, timestamp: i64) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: format!("{}-{}", timestamp, self.entries.len()),
            prize_id: prize.id.clone(),
            label: prize.label.clone(),
            timestamp,
        };
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_date(timestamp: i64, now: i64) -> String {
    let diff_ms = (now - timestamp) as f64;
    let diff_mins = diff_ms / 1000.0 / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            format!("{} weeks ago", days / 7)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    #[test]
    fn test_record_newest_first() {
        let mut history = History::new();
        let cake = Prize::new("p1", "Cake", 1, "#fff");
        let tea = Prize::new("p2", "Tea", 2, "#000");

        history.record(&cake, 1_000);
        history.record(&tea, 2_000);

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries[0].label, "Tea");
        assert_eq!(history.entries[1].prize_id, "p1");
        assert_ne!(history.entries[0].id, history.entries[1].id);

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_legacy_entries_without_prize_id() {
        let json = r#"[{"id":"1","prizeName":"A Hug","timestamp":5}]"#;
        let history: History = serde_json::from_str(json).unwrap();
        assert_eq!(history.entries[0].label, "A Hug");
        assert_eq!(history.entries[0].prize_id, "");
    }

    #[test]
    fn test_format_date() {
        let now = 100 * 24 * 60 * MIN;
        assert_eq!(format_date(now - 10_000, now), "Just now");
        assert_eq!(format_date(now - MIN, now), "1 min ago");
        assert_eq!(format_date(now - 5 * MIN, now), "5 mins ago");
        assert_eq!(format_date(now - 60 * MIN, now), "1 hour ago");
        assert_eq!(format_date(now - 180 * MIN, now), "3 hours ago");
        assert_eq!(format_date(now - 24 * 60 * MIN, now), "Yesterday");
        assert_eq!(format_date(now - 3 * 24 * 60 * MIN, now), "3 days ago");
        assert_eq!(format_date(now - 15 * 24 * 60 * MIN, now), "2 weeks ago");
    }
}

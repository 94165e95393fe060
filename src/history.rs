use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::models::BinRecord;

pub const DEFAULT_MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub bin: String,
    pub timestamp: DateTime<Utc>,
    pub record: BinRecord,
}

/// Successful lookups kept by the caller, oldest first.
///
/// The client itself never remembers results; pass a history around
/// explicitly when the previous answer matters.
#[derive(Debug, Clone)]
pub struct LookupHistory {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for LookupHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries.min(64)),
            max_entries,
        }
    }

    pub fn record(&mut self, bin: impl Into<String>, record: BinRecord) -> &HistoryEntry {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            bin: bin.into(),
            timestamp: Utc::now(),
            record,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Most recent entry for a BIN
    pub fn find(&self, bin: &str) -> Option<&HistoryEntry> {
        self.entries.iter().rev().find(|e| e.bin == bin)
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_scheme(scheme: &str) -> BinRecord {
        BinRecord {
            scheme: Some(scheme.to_string()),
            ..BinRecord::default()
        }
    }

    #[test]
    fn test_empty_history() {
        let history = LookupHistory::new();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }

    #[test]
    fn test_last_and_find() {
        let mut history = LookupHistory::new();
        history.record("4571", record_with_scheme("visa"));
        history.record("5100", record_with_scheme("mastercard"));
        history.record("4571", record_with_scheme("visa-updated"));

        assert_eq!(history.len(), 3);
        assert_eq!(history.last().unwrap().bin, "4571");
        assert_eq!(
            history.find("4571").unwrap().record.scheme.as_deref(),
            Some("visa-updated")
        );
        assert_eq!(
            history.find("5100").unwrap().record.scheme.as_deref(),
            Some("mastercard")
        );
        assert!(history.find("3700").is_none());
    }

    #[test]
    fn test_oldest_entries_are_dropped() {
        let mut history = LookupHistory::with_capacity(2);
        history.record("1", BinRecord::default());
        history.record("2", BinRecord::default());
        history.record("3", BinRecord::default());

        let bins: Vec<&str> = history.entries().map(|e| e.bin.as_str()).collect();
        assert_eq!(bins, vec!["2", "3"]);
    }

    #[test]
    fn test_clear() {
        let mut history = LookupHistory::new();
        history.record("4571", BinRecord::default());
        history.clear();
        assert!(history.is_empty());
    }
}

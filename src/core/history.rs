//! Conversion history
//!
//! In-memory, newest first, bounded to the last five successful conversions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

use crate::core::features::unit_converter::{format_magnitude, format_value, ConversionResult};
use crate::shared::types::ConversionRequest;

/// Maximum number of conversions to keep
pub const MAX_HISTORY_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub value: f64,
    pub from_unit: String,
    pub magnitude: f64,
    pub to_unit: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(request: &ConversionRequest, result: &ConversionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            value: request.value,
            from_unit: request.from_unit.clone(),
            magnitude: result.magnitude,
            to_unit: result.unit.clone(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → {} {}",
            format_value(self.value),
            self.from_unit,
            format_magnitude(self.magnitude, 2),
            self.to_unit
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConversionHistory {
    entries: VecDeque<HistoryEntry>,
}

impl ConversionHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Push to the front, dropping the oldest entry once full.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_HISTORY_SIZE);
    }

    pub fn record_conversion(&mut self, request: &ConversionRequest, result: &ConversionResult) {
        self.record(HistoryEntry::new(request, result));
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
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

    fn record(history: &mut ConversionHistory, value: f64) {
        let request = ConversionRequest::new(value, "meter", "foot").unwrap();
        let result = ConversionResult {
            magnitude: value * 3.28084,
            unit: "foot".to_string(),
        };
        history.record_conversion(&request, &result);
    }

    #[test]
    fn test_newest_first() {
        let mut history = ConversionHistory::new();
        record(&mut history, 1.0);
        record(&mut history, 2.0);

        let values: Vec<f64> = history.entries().map(|e| e.value).collect();
        assert_eq!(values, vec![2.0, 1.0]);
        assert_eq!(history.latest().unwrap().value, 2.0);
    }

    #[test]
    fn test_bounded_to_five() {
        let mut history = ConversionHistory::new();
        for i in 1..=7 {
            record(&mut history, i as f64);
            assert_eq!(history.len(), i.min(MAX_HISTORY_SIZE));
        }

        let values: Vec<f64> = history.entries().map(|e| e.value).collect();
        assert_eq!(values, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_clear() {
        let mut history = ConversionHistory::new();
        record(&mut history, 1.0);
        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn test_display() {
        let request = ConversionRequest::new(100.0, "celsius", "fahrenheit").unwrap();
        let result = ConversionResult {
            magnitude: 212.0,
            unit: "fahrenheit".to_string(),
        };
        let entry = HistoryEntry::new(&request, &result);
        assert_eq!(entry.to_string(), "100 celsius → 212.00 fahrenheit");
    }
}

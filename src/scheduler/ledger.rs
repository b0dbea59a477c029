use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

/// Accumulated answer history for one glyph.
///
/// Field names stay camelCase on the wire so ledgers exported before the
/// rewrite still import cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub incorrect: u32,
    #[serde(default)]
    pub consecutive_correct: u32,
}

/// Per-glyph answer statistics. Records are created lazily on the first
/// answer and are never deleted, even after the glyph is mastered.
///
/// Persistence serializes the bare glyph → record map, not the ledger
/// itself, so the stored shape matches the backup `stats` field.
#[derive(Debug, Clone, Default)]
pub struct PerformanceLedger {
    records: HashMap<String, PerformanceRecord>,
}

impl PerformanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: HashMap<String, PerformanceRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &HashMap<String, PerformanceRecord> {
        &self.records
    }

    /// Zeroed record for glyphs that have never been answered.
    pub fn get(&self, glyph: &str) -> PerformanceRecord {
        self.records.get(glyph).copied().unwrap_or_default()
    }

    /// Returns the post-update consecutive-correct count, which the
    /// evaluator compares against the mastery threshold.
    pub fn record_correct(&mut self, glyph: &str) -> u32 {
        let record = self.records.entry(glyph.to_string()).or_default();
        record.correct += 1;
        record.consecutive_correct += 1;
        record.consecutive_correct
    }

    pub fn record_incorrect(&mut self, glyph: &str) {
        let record = self.records.entry(glyph.to_string()).or_default();
        record.incorrect += 1;
        record.consecutive_correct = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_glyph_defaults_to_zeroed_record() {
        let ledger = PerformanceLedger::new();
        assert_eq!(ledger.get("火"), PerformanceRecord::default());
    }

    #[test]
    fn consecutive_count_grows_by_one_per_correct() {
        let mut ledger = PerformanceLedger::new();
        for expected in 1..=5 {
            assert_eq!(ledger.record_correct("水"), expected);
        }
        assert_eq!(ledger.get("水").correct, 5);
    }

    #[test]
    fn incorrect_resets_consecutive_but_not_correct() {
        let mut ledger = PerformanceLedger::new();
        ledger.record_correct("山");
        ledger.record_correct("山");
        ledger.record_incorrect("山");

        let record = ledger.get("山");
        assert_eq!(record.consecutive_correct, 0);
        assert_eq!(record.correct, 2);
        assert_eq!(record.incorrect, 1);

        // The run restarts from one after a miss.
        assert_eq!(ledger.record_correct("山"), 1);
    }

    #[test]
    fn glyphs_are_tracked_independently() {
        let mut ledger = PerformanceLedger::new();
        ledger.record_correct("日");
        ledger.record_incorrect("月");

        assert_eq!(ledger.get("日").consecutive_correct, 1);
        assert_eq!(ledger.get("月").incorrect, 1);
    }
}

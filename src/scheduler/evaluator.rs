use super::ledger::PerformanceLedger;
use crate::core::models::Item;

/// Consecutive correct answers that retire a glyph from the active pool.
pub const MASTERY_THRESHOLD: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `mastered` tells the caller to move the glyph to the mastered
    /// pool before the next round is selected.
    Correct { mastered: bool },
    Incorrect,
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct { .. })
    }
}

/// Score one answer against the round's target and update the ledger.
///
/// Options within a round carry distinct ids, so matching on `id` also
/// works when a degenerate pool put look-alike words in play. Progress
/// advancement and pool removal stay with the caller; this function only
/// owns the statistics transition and the mastery check.
pub fn evaluate_answer(
    selected: &Item,
    target: &Item,
    ledger: &mut PerformanceLedger,
) -> Outcome {
    if selected.id == target.id {
        let consecutive = ledger.record_correct(&target.glyph);
        Outcome::Correct { mastered: consecutive >= MASTERY_THRESHOLD }
    } else {
        ledger.record_incorrect(&target.glyph);
        Outcome::Incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, glyph: &str) -> Item {
        Item::new(id, glyph, "word")
    }

    #[test]
    fn matching_id_is_correct() {
        let mut ledger = PerformanceLedger::new();
        let target = item(1, "口");

        let outcome = evaluate_answer(&target.clone(), &target, &mut ledger);
        assert_eq!(outcome, Outcome::Correct { mastered: false });
        assert_eq!(ledger.get("口").correct, 1);
    }

    #[test]
    fn wrong_id_records_incorrect_against_target() {
        let mut ledger = PerformanceLedger::new();
        let target = item(1, "口");
        let picked = item(2, "手");

        let outcome = evaluate_answer(&picked, &target, &mut ledger);
        assert_eq!(outcome, Outcome::Incorrect);
        // The miss lands on the target's glyph, not the picked one.
        assert_eq!(ledger.get("口").incorrect, 1);
        assert_eq!(ledger.get("手"), Default::default());
    }

    #[test]
    fn mastery_fires_exactly_at_threshold() {
        let mut ledger = PerformanceLedger::new();
        let target = item(1, "木");

        for n in 1..MASTERY_THRESHOLD {
            let outcome = evaluate_answer(&target.clone(), &target, &mut ledger);
            assert_eq!(outcome, Outcome::Correct { mastered: false }, "at answer {}", n);
        }
        let outcome = evaluate_answer(&target.clone(), &target, &mut ledger);
        assert_eq!(outcome, Outcome::Correct { mastered: true });
    }

    #[test]
    fn a_miss_restarts_the_mastery_run() {
        let mut ledger = PerformanceLedger::new();
        let target = item(1, "田");
        let wrong = item(2, "由");

        for _ in 0..MASTERY_THRESHOLD - 1 {
            evaluate_answer(&target.clone(), &target, &mut ledger);
        }
        evaluate_answer(&wrong, &target, &mut ledger);

        let outcome = evaluate_answer(&target.clone(), &target, &mut ledger);
        assert_eq!(outcome, Outcome::Correct { mastered: false });
    }
}

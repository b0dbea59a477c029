pub mod evaluator;
pub mod ledger;
pub mod selector;

pub use evaluator::{
    evaluate_answer,
    Outcome,
    MASTERY_THRESHOLD,
};
pub use ledger::{
    PerformanceLedger,
    PerformanceRecord,
};
pub use selector::{
    select_round,
    ROUND_OPTIONS,
};

use rand::{
    seq::SliceRandom,
    Rng,
};

use super::ledger::PerformanceLedger;
use crate::core::{
    models::{
        Item,
        Round,
    },
    ShiziError,
};

/// Options shown per round, target included.
pub const ROUND_OPTIONS: usize = 3;

/// Cap on uniform resampling when a thin pool leaves the distractor walk
/// short; without it a pool of near-duplicates could loop forever.
const DISTRACTOR_ATTEMPTS: usize = 16;

/// Repetition bias: weight grows with misses and shrinks with hits, so
/// weak glyphs come around more often. The constants are fixed policy.
fn selection_weight(ledger: &PerformanceLedger, glyph: &str) -> f64 {
    let record = ledger.get(glyph);
    10.0 * (1.0 + f64::from(record.incorrect) * 3.0) / (1.0 + f64::from(record.correct) * 0.5)
}

/// Build the next round from the active pool.
///
/// The target falls out of a roulette-wheel draw over the per-glyph
/// weights; distractors are drawn from the rest of the pool without
/// repeating a glyph; the final option order is shuffled. The RNG is
/// injected so selection can be replayed in tests.
pub fn select_round<R: Rng>(
    pool: &[Item],
    ledger: &PerformanceLedger,
    rng: &mut R,
) -> Result<Round, ShiziError> {
    if pool.is_empty() {
        return Err(ShiziError::ContentTooSmall { found: 0, needed: ROUND_OPTIONS });
    }

    let target = pick_target(pool, ledger, rng).clone();

    let mut others: Vec<&Item> = pool.iter().filter(|item| item.glyph != target.glyph).collect();
    others.shuffle(rng);

    let mut options: Vec<Item> = Vec::with_capacity(ROUND_OPTIONS);
    options.push(target.clone());

    for candidate in &others {
        if options.len() == ROUND_OPTIONS {
            break;
        }
        if options.iter().all(|option| option.glyph != candidate.glyph) {
            options.push((*candidate).clone());
        }
    }

    // A degenerate pool can leave the walk short; retry uniformly a
    // bounded number of times, then accept a smaller round.
    let mut attempts = 0;
    while options.len() < ROUND_OPTIONS && !others.is_empty() && attempts < DISTRACTOR_ATTEMPTS {
        let candidate = others[rng.random_range(0..others.len())];
        if options.iter().all(|option| option.glyph != candidate.glyph) {
            options.push(candidate.clone());
        }
        attempts += 1;
    }

    options.shuffle(rng);

    Ok(Round { target, options })
}

fn pick_target<'a, R: Rng>(
    pool: &'a [Item],
    ledger: &PerformanceLedger,
    rng: &mut R,
) -> &'a Item {
    let weights: Vec<f64> =
        pool.iter().map(|item| selection_weight(ledger, &item.glyph)).collect();
    let total: f64 = weights.iter().sum();

    let draw = rng.random_range(0.0..total);

    let mut cumulative = 0.0;
    for (item, weight) in pool.iter().zip(&weights) {
        cumulative += weight;
        if draw < cumulative {
            return item;
        }
    }

    // Rounding can leave the walk one ulp short of the draw; the round
    // still needs a target, so fall back to a uniform pick.
    &pool[rng.random_range(0..pool.len())]
}

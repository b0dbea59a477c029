use chrono::NaiveDate;
use rand::Rng;

use crate::{
    backup,
    content::{
        ContentStore,
        DEFAULT_POOL,
    },
    core::{
        models::Round,
        ShiziError,
    },
    persistence::{
        keys,
        StudyStore,
    },
    progress::{
        ProgressTracker,
        DEFAULT_DAILY_GOAL,
    },
    scheduler::{
        evaluate_answer,
        select_round,
        Outcome,
        PerformanceLedger,
        ROUND_OPTIONS,
    },
};

#[derive(Debug, Clone)]
pub struct AnswerFeedback {
    pub outcome: Outcome,
    /// True exactly when this answer crossed the daily goal.
    pub goal_reached: bool,
    pub total_score: u32,
}

struct ActiveRound {
    round: Round,
    answered_correct: bool,
}

/// One user's practice loop: owns the in-memory state, runs every core
/// transition on the calling thread, and flushes to the store after each
/// mutation. I/O happens only here at the boundary; the scheduler,
/// ledger, and tracker stay pure.
pub struct PracticeSession<R: Rng> {
    store: StudyStore,
    content: ContentStore,
    ledger: PerformanceLedger,
    progress: ProgressTracker,
    total_score: u32,
    rng: R,
    current: Option<ActiveRound>,
    pending_mastery: Option<String>,
}

impl<R: Rng> PracticeSession<R> {
    /// Load persisted state, seed the starter lesson on a first run, and
    /// roll the progress tracker over to `today`.
    pub fn open(store: StudyStore, today: NaiveDate, rng: R) -> Result<Self, ShiziError> {
        let mut session = Self {
            store,
            content: ContentStore::default(),
            ledger: PerformanceLedger::new(),
            progress: ProgressTracker::new(DEFAULT_DAILY_GOAL, today),
            total_score: 0,
            rng,
            current: None,
            pending_mastery: None,
        };
        session.reload_from_store(today)?;
        Ok(session)
    }

    /// Rebuild content, ledger, and progress from the store, used at open
    /// and after a backup import. Rolls over and persists the result so
    /// the store and memory agree.
    pub fn reload_from_store(&mut self, today: NaiveDate) -> Result<(), ShiziError> {
        self.current = None;
        self.pending_mastery = None;

        let first_run =
            self.store.get(keys::ACTIVE_POOL).is_none() && self.store.get(keys::MASTERED_POOL).is_none();
        let active_text = if first_run {
            DEFAULT_POOL.to_string()
        } else {
            self.store.get(keys::ACTIVE_POOL).unwrap_or_default().to_string()
        };
        let mastered_text = self.store.get(keys::MASTERED_POOL).unwrap_or_default().to_string();
        self.content = ContentStore::from_text(&active_text, &mastered_text);

        self.ledger = match self.store.get(keys::PERFORMANCE) {
            Some(json) => match serde_json::from_str(json) {
                Ok(records) => PerformanceLedger::from_records(records),
                Err(e) => {
                    eprintln!("[Session] Ledger unreadable ({}), starting fresh", e);
                    PerformanceLedger::new()
                }
            },
            None => PerformanceLedger::new(),
        };

        self.total_score = self.store.get_u32(keys::TOTAL_SCORE, 0);

        self.progress = ProgressTracker::from_saved(
            self.store.get_u32(keys::DAILY_GOAL, DEFAULT_DAILY_GOAL),
            self.store.get_u32(keys::DAILY_PROGRESS, 0),
            self.store.get_u32(keys::STREAK_DAYS, 0),
            self.store.get_bool(keys::GOAL_MET_TODAY, false),
            self.store.get_date(keys::LAST_ACTIVE_DATE, today),
        );
        self.progress.rollover_if_new_day(today);

        if first_run {
            self.save_pools()?;
        }
        self.save_progress()
    }

    /// Start the next round. Any pending mastery removal is applied
    /// first, so a retired glyph is never offered again.
    pub fn start_round(&mut self) -> Result<Round, ShiziError> {
        self.apply_pending_mastery()?;

        let pool = self.content.active_items();
        if pool.len() < ROUND_OPTIONS {
            self.current = None;
            return Err(ShiziError::ContentTooSmall { found: pool.len(), needed: ROUND_OPTIONS });
        }

        let round = select_round(pool, &self.ledger, &mut self.rng)?;
        self.current = Some(ActiveRound { round: round.clone(), answered_correct: false });
        Ok(round)
    }

    /// Answer the active round with the option carrying `option_id`.
    ///
    /// Returns `None` when the submission is ignored: no round is active,
    /// the id matches no option, or the round was already answered
    /// correctly (the double-submit guard). After a wrong answer the
    /// round stays open so the user can try again.
    pub fn submit(&mut self, option_id: u32) -> Result<Option<AnswerFeedback>, ShiziError> {
        let Some(active) = self.current.as_mut() else {
            return Ok(None);
        };
        if active.answered_correct {
            return Ok(None);
        }
        let Some(selected) = active.round.option_by_id(option_id).cloned() else {
            return Ok(None);
        };
        let target = active.round.target.clone();

        let outcome = evaluate_answer(&selected, &target, &mut self.ledger);
        let mut goal_reached = false;

        if let Outcome::Correct { mastered } = outcome {
            active.answered_correct = true;
            self.total_score += 1;
            goal_reached = self.progress.advance();
            if mastered {
                // Removal is deferred until the next round starts so the
                // feedback for this answer still shows the item.
                self.pending_mastery = Some(target.glyph.clone());
            }
        }

        self.save_after_answer()?;
        Ok(Some(AnswerFeedback { outcome, goal_reached, total_score: self.total_score }))
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.current.as_ref().map(|active| &active.round)
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn ledger(&self) -> &PerformanceLedger {
        &self.ledger
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn set_daily_goal(&mut self, goal: u32) -> Result<(), ShiziError> {
        self.progress.set_daily_goal(goal);
        self.save_progress()
    }

    pub fn export_backup(&self) -> Result<String, ShiziError> {
        backup::export_json(&self.store)
    }

    /// Validate-then-apply: a bad payload fails before anything changes,
    /// a good one replaces the store and in-memory state wholesale.
    pub fn import_backup(&mut self, json: &str, today: NaiveDate) -> Result<(), ShiziError> {
        backup::import_json(json, &mut self.store)?;
        self.reload_from_store(today)
    }

    fn apply_pending_mastery(&mut self) -> Result<(), ShiziError> {
        if let Some(glyph) = self.pending_mastery.take() {
            if self.content.retire(&glyph) {
                println!("[Session] {} retired to the mastered pool", glyph);
                self.save_pools()?;
            }
        }
        Ok(())
    }

    fn save_pools(&mut self) -> Result<(), ShiziError> {
        let entries = [
            (keys::ACTIVE_POOL, self.content.active_text()),
            (keys::MASTERED_POOL, self.content.mastered_text()),
        ];
        self.store.set_many(&entries)
    }

    fn save_progress(&mut self) -> Result<(), ShiziError> {
        let entries = [
            (keys::DAILY_GOAL, self.progress.daily_goal().to_string()),
            (keys::DAILY_PROGRESS, self.progress.daily_progress().to_string()),
            (keys::STREAK_DAYS, self.progress.streak_days().to_string()),
            (keys::GOAL_MET_TODAY, self.progress.goal_met_today().to_string()),
            (
                keys::LAST_ACTIVE_DATE,
                self.progress.last_active_date().format("%Y-%m-%d").to_string(),
            ),
        ];
        self.store.set_many(&entries)
    }

    fn save_after_answer(&mut self) -> Result<(), ShiziError> {
        let ledger_json = serde_json::to_string(self.ledger.records())?;
        let entries = [
            (keys::PERFORMANCE, ledger_json),
            (keys::TOTAL_SCORE, self.total_score.to_string()),
            (keys::DAILY_PROGRESS, self.progress.daily_progress().to_string()),
            (keys::STREAK_DAYS, self.progress.streak_days().to_string()),
            (keys::GOAL_MET_TODAY, self.progress.goal_met_today().to_string()),
        ];
        self.store.set_many(&entries)
    }
}

use chrono::NaiveDate;

pub const DEFAULT_DAILY_GOAL: u32 = 10;

/// Daily-goal and streak state machine.
///
/// The day alternates between two states, NORMAL and GOAL_MET, persisted
/// as the `goal_met_today` flag. `streak_days` only ever grows inside
/// `advance` and only ever zeroes inside `rollover_if_new_day`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    daily_goal: u32,
    daily_progress: u32,
    streak_days: u32,
    goal_met_today: bool,
    last_active_date: NaiveDate,
}

impl ProgressTracker {
    pub fn new(daily_goal: u32, today: NaiveDate) -> Self {
        Self {
            daily_goal: daily_goal.max(1),
            daily_progress: 0,
            streak_days: 0,
            goal_met_today: false,
            last_active_date: today,
        }
    }

    /// Rebuild from persisted fields; counters already decoded leniently
    /// by the store.
    pub fn from_saved(
        daily_goal: u32,
        daily_progress: u32,
        streak_days: u32,
        goal_met_today: bool,
        last_active_date: NaiveDate,
    ) -> Self {
        Self {
            daily_goal: daily_goal.max(1),
            daily_progress,
            streak_days,
            goal_met_today,
            last_active_date,
        }
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    pub fn daily_progress(&self) -> u32 {
        self.daily_progress
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    pub fn goal_met_today(&self) -> bool {
        self.goal_met_today
    }

    pub fn last_active_date(&self) -> NaiveDate {
        self.last_active_date
    }

    pub fn set_daily_goal(&mut self, goal: u32) {
        self.daily_goal = goal.max(1);
    }

    /// Count one correct answer. Returns true exactly when this call
    /// crossed the daily goal, so the caller can run its celebration;
    /// later answers the same day keep counting without touching the
    /// streak.
    pub fn advance(&mut self) -> bool {
        self.daily_progress += 1;

        if self.daily_progress >= self.daily_goal && !self.goal_met_today {
            self.streak_days += 1;
            self.goal_met_today = true;
            return true;
        }

        false
    }

    /// Reset the day's counters when the calendar date has changed.
    ///
    /// A missed day (gap over one) with the goal unmet breaks the streak;
    /// a one-day gap, or any gap after a met goal, preserves it.
    pub fn rollover_if_new_day(&mut self, today: NaiveDate) {
        if self.last_active_date == today {
            return;
        }

        let gap_days = (today - self.last_active_date).num_days();
        if !self.goal_met_today && gap_days > 1 {
            self.streak_days = 0;
        }

        self.daily_progress = 0;
        self.goal_met_today = false;
        self.last_active_date = today;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn goal_crossing_bumps_streak_once() {
        let mut tracker = ProgressTracker::new(10, date(2026, 3, 1));
        for _ in 0..9 {
            assert!(!tracker.advance());
        }
        assert_eq!(tracker.daily_progress(), 9);

        // The tenth answer crosses the goal.
        assert!(tracker.advance());
        assert_eq!(tracker.daily_progress(), 10);
        assert_eq!(tracker.streak_days(), 1);
        assert!(tracker.goal_met_today());

        // Further answers keep counting but not the streak.
        assert!(!tracker.advance());
        assert_eq!(tracker.daily_progress(), 11);
        assert_eq!(tracker.streak_days(), 1);
    }

    #[test]
    fn same_day_rollover_is_a_no_op() {
        let mut tracker = ProgressTracker::new(5, date(2026, 3, 1));
        tracker.advance();
        tracker.rollover_if_new_day(date(2026, 3, 1));
        assert_eq!(tracker.daily_progress(), 1);
    }

    #[test]
    fn next_day_resets_counters_and_keeps_streak() {
        let mut tracker = ProgressTracker::new(2, date(2026, 3, 1));
        tracker.advance();
        tracker.advance();
        assert_eq!(tracker.streak_days(), 1);

        tracker.rollover_if_new_day(date(2026, 3, 2));
        assert_eq!(tracker.daily_progress(), 0);
        assert!(!tracker.goal_met_today());
        assert_eq!(tracker.streak_days(), 1);
        assert_eq!(tracker.last_active_date(), date(2026, 3, 2));
    }

    #[test]
    fn missed_day_without_goal_breaks_streak() {
        let mut tracker =
            ProgressTracker::from_saved(2, 1, 4, false, date(2026, 3, 1));

        tracker.rollover_if_new_day(date(2026, 3, 3));
        assert_eq!(tracker.streak_days(), 0);
    }

    #[test]
    fn met_goal_preserves_streak_across_a_gap() {
        let mut tracker =
            ProgressTracker::from_saved(2, 2, 4, true, date(2026, 3, 1));

        tracker.rollover_if_new_day(date(2026, 3, 3));
        assert_eq!(tracker.streak_days(), 4);
    }

    #[test]
    fn one_day_gap_preserves_streak_even_unmet() {
        let mut tracker =
            ProgressTracker::from_saved(2, 1, 4, false, date(2026, 3, 1));

        tracker.rollover_if_new_day(date(2026, 3, 2));
        assert_eq!(tracker.streak_days(), 4);
    }

    #[test]
    fn goal_is_clamped_positive() {
        let tracker = ProgressTracker::new(0, date(2026, 3, 1));
        assert_eq!(tracker.daily_goal(), 1);
    }
}

//! Completion streaks and the pure reconciliation rule.
//!
//! The orchestrator calls [`StreakState::record_completion`] synchronously on
//! every first completion and persists the result, so the rule is testable
//! without a database.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Streak counters independent of ownership and timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completion_date: Option<NaiveDate>,
}

impl StreakState {
    /// Apply a completion on `date`.
    ///
    /// Consecutive days extend the streak, a repeat on the same day changes
    /// nothing and anything else starts over at one. `longest_streak` never
    /// decreases.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use moodshift::domain::StreakState;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).expect("valid date");
    /// let state = StreakState::default()
    ///     .record_completion(day(1))
    ///     .record_completion(day(2))
    ///     .record_completion(day(4));
    /// assert_eq!(state.current_streak, 1);
    /// assert_eq!(state.longest_streak, 2);
    /// ```
    #[must_use]
    pub fn record_completion(self, date: NaiveDate) -> Self {
        let current_streak = match self.last_completion_date {
            Some(last) if last == date => self.current_streak,
            Some(last) if last.checked_add_days(Days::new(1)) == Some(date) => {
                self.current_streak.saturating_add(1)
            }
            _ => 1,
        };
        Self {
            current_streak,
            longest_streak: self.longest_streak.max(current_streak),
            last_completion_date: Some(date),
        }
    }

    /// The streak as it reads on `today`.
    ///
    /// A streak whose last completion is older than yesterday has lapsed and
    /// reports a current value of zero; stored counters are left untouched.
    #[must_use]
    pub fn as_of(self, today: NaiveDate) -> Self {
        let lapsed = match self.last_completion_date {
            Some(last) => today
                .checked_sub_days(Days::new(1))
                .is_some_and(|yesterday| last < yesterday),
            None => true,
        };
        if lapsed {
            Self {
                current_streak: 0,
                ..self
            }
        } else {
            self
        }
    }
}

/// A user's persisted streak row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streak {
    pub user_id: UserId,
    pub state: StreakState,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).expect("valid date")
    }

    fn state(current: u32, longest: u32, last: Option<u32>) -> StreakState {
        StreakState {
            current_streak: current,
            longest_streak: longest,
            last_completion_date: last.map(day),
        }
    }

    #[rstest]
    #[case::first_ever(state(0, 0, None), day(10), state(1, 1, Some(10)))]
    #[case::consecutive(state(3, 5, Some(9)), day(10), state(4, 5, Some(10)))]
    #[case::new_record(state(5, 5, Some(9)), day(10), state(6, 6, Some(10)))]
    #[case::same_day(state(3, 5, Some(10)), day(10), state(3, 5, Some(10)))]
    #[case::skipped_day(state(7, 7, Some(8)), day(10), state(1, 7, Some(10)))]
    fn record_completion(
        #[case] prior: StreakState,
        #[case] date: NaiveDate,
        #[case] expected: StreakState,
    ) {
        assert_eq!(prior.record_completion(date), expected);
    }

    #[rstest]
    fn consecutive_days_strictly_increase() {
        let mut streak = StreakState::default();
        for (offset, d) in (1..=6).enumerate() {
            streak = streak.record_completion(day(d));
            assert_eq!(streak.current_streak as usize, offset + 1);
        }
        assert_eq!(streak.longest_streak, 6);
    }

    #[rstest]
    fn crosses_month_boundaries() {
        let end_of_jan = NaiveDate::from_ymd_opt(2026, 1, 31).expect("valid date");
        let streak = state(2, 2, None)
            .record_completion(end_of_jan)
            .record_completion(day(1));
        assert_eq!(streak.current_streak, 2);
    }

    #[rstest]
    #[case::today(Some(10), 3)]
    #[case::yesterday(Some(9), 3)]
    #[case::lapsed(Some(8), 0)]
    #[case::never(None, 0)]
    fn as_of_reports_lapsed_streaks_as_zero(#[case] last: Option<u32>, #[case] current: u32) {
        let viewed = state(3, 4, last).as_of(day(10));
        assert_eq!(viewed.current_streak, current);
        assert_eq!(viewed.longest_streak, 4);
    }
}

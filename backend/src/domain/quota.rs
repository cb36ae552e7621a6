//! Daily generation allowance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::UserId;

/// Generations allowed per user per day unless configured otherwise.
pub const DEFAULT_MAX_GENERATIONS: u32 = 2;

/// Usage of the generation allowance for one `(user, date)`.
///
/// Rows are keyed by date, so a new day implicitly starts from zero.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use moodshift::domain::{GenerationQuota, UserId};
///
/// let today = NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date");
/// let quota = GenerationQuota::unused(UserId::random(), today, 2)
///     .record_generation()
///     .record_generation();
/// assert!(quota.is_exhausted());
/// assert_eq!(quota.remaining(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationQuota {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub generations_used: u32,
    pub max_generations: u32,
}

impl GenerationQuota {
    /// The implicit state of a day with no recorded generations.
    pub fn unused(user_id: UserId, date: NaiveDate, max_generations: u32) -> Self {
        Self {
            user_id,
            date,
            generations_used: 0,
            max_generations,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.generations_used >= self.max_generations
    }

    pub fn remaining(&self) -> u32 {
        self.max_generations.saturating_sub(self.generations_used)
    }

    /// Count one successful generation.
    #[must_use]
    pub fn record_generation(self) -> Self {
        Self {
            generations_used: self.generations_used.saturating_add(1),
            ..self
        }
    }
}

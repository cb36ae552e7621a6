//! Driving port for reading today's card state.

use async_trait::async_trait;

use crate::domain::{Card, Error, GenerationQuota, MoodMode, StreakState, UserId};

/// Request for the caller's current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodayRequest {
    pub user_id: UserId,
    /// Mode to read; `None` uses the stored settings mode, else zen.
    pub mode: Option<MoodMode>,
}

/// Card, quota and streak for display. Entities not created yet are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodaySnapshot {
    pub card: Option<Card>,
    pub quota: Option<GenerationQuota>,
    pub streak: Option<StreakState>,
}

/// Driving port for read-only card views. Never creates rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardQuery: Send + Sync {
    async fn today(&self, request: TodayRequest) -> Result<TodaySnapshot, Error>;
}

/// Fixture implementation reporting an empty day.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCardQuery;

#[async_trait]
impl CardQuery for FixtureCardQuery {
    async fn today(&self, _request: TodayRequest) -> Result<TodaySnapshot, Error> {
        Ok(TodaySnapshot::default())
    }
}

//! Port for daily generation quotas.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{GenerationQuota, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by quota repository adapters.
    pub enum QuotaRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "quota repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "quota repository query failed: {message}",
    }
}

/// Port for quota rows keyed by `(user_id, date)`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuotaRepository: Send + Sync {
    /// Fetch the quota row for a user's day, or `None` before any generation.
    async fn find_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<GenerationQuota>, QuotaRepositoryError>;

    /// Count one generation and return the post-increment row.
    ///
    /// Creates the row with `default_max` when absent. Implementations must
    /// perform insert-or-increment atomically so concurrent calls never lose
    /// an increment.
    async fn increment(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        default_max: u32,
    ) -> Result<GenerationQuota, QuotaRepositoryError>;
}

/// Fixture implementation reporting a single generation per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureQuotaRepository;

#[async_trait]
impl QuotaRepository for FixtureQuotaRepository {
    async fn find_for_day(
        &self,
        _user_id: &UserId,
        _date: NaiveDate,
    ) -> Result<Option<GenerationQuota>, QuotaRepositoryError> {
        Ok(None)
    }

    async fn increment(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        default_max: u32,
    ) -> Result<GenerationQuota, QuotaRepositoryError> {
        Ok(GenerationQuota::unused(*user_id, date, default_max).record_generation())
    }
}

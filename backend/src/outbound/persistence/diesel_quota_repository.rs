//! PostgreSQL-backed `QuotaRepository`.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{QuotaRepository, QuotaRepositoryError};
use crate::domain::{GenerationQuota, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, pool_error_message};
use super::models::{NewQuotaRow, QuotaRow, counter_to_db};
use super::pool::{DbPool, PoolError};
use super::schema::generation_quotas;

/// Diesel implementation of [`QuotaRepository`].
///
/// `increment` is a single `INSERT .. ON CONFLICT DO UPDATE` so concurrent
/// generations never lose a count.
#[derive(Clone)]
pub struct DieselQuotaRepository {
    pool: DbPool,
}

impl DieselQuotaRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> QuotaRepositoryError {
    QuotaRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> QuotaRepositoryError {
    map_basic_diesel_error(
        error,
        QuotaRepositoryError::query,
        QuotaRepositoryError::connection,
    )
}

#[async_trait]
impl QuotaRepository for DieselQuotaRepository {
    async fn find_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<GenerationQuota>, QuotaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = generation_quotas::table
            .filter(generation_quotas::user_id.eq(user_id.as_uuid()))
            .filter(generation_quotas::date.eq(date))
            .select(QuotaRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        Ok(row.map(GenerationQuota::from))
    }

    async fn increment(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        default_max: u32,
    ) -> Result<GenerationQuota, QuotaRepositoryError> {
        let first = NewQuotaRow {
            user_id: *user_id.as_uuid(),
            date,
            generations_used: 1,
            max_generations: counter_to_db(default_max),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(generation_quotas::table)
            .values(&first)
            .on_conflict((generation_quotas::user_id, generation_quotas::date))
            .do_update()
            .set((
                generation_quotas::generations_used.eq(generation_quotas::generations_used + 1),
                generation_quotas::updated_at.eq(Utc::now()),
            ))
            .returning(QuotaRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        Ok(GenerationQuota::from(row))
    }
}

//! PostgreSQL-backed `StreakRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StreakRepository, StreakRepositoryError};
use crate::domain::{Streak, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, pool_error_message};
use super::models::{StreakRow, StreakWrite};
use super::pool::{DbPool, PoolError};
use super::schema::streaks;

/// Diesel implementation of [`StreakRepository`].
#[derive(Clone)]
pub struct DieselStreakRepository {
    pool: DbPool,
}

impl DieselStreakRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StreakRepositoryError {
    StreakRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: &diesel::result::Error) -> StreakRepositoryError {
    map_basic_diesel_error(
        error,
        StreakRepositoryError::query,
        StreakRepositoryError::connection,
    )
}

#[async_trait]
impl StreakRepository for DieselStreakRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Streak>, StreakRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = streaks::table
            .filter(streaks::user_id.eq(user_id.as_uuid()))
            .select(StreakRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        Ok(row.map(Streak::from))
    }

    async fn save(&self, streak: &Streak) -> Result<(), StreakRepositoryError> {
        let write = StreakWrite::from(streak);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(streaks::table)
            .values(&write)
            .on_conflict(streaks::user_id)
            .do_update()
            .set(&write)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        Ok(())
    }
}

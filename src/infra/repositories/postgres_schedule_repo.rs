use crate::domain::{
    models::{special_day::SpecialHourRow, time_range::TimeRange, work_day::WorkingHourRow},
    ports::ScheduleRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresScheduleRepo {
    pool: PgPool,
}

impl PostgresScheduleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepo {
    async fn list_working_hours(&self) -> Result<Vec<WorkingHourRow>, AppError> {
        sqlx::query_as::<_, WorkingHourRow>("SELECT * FROM working_hours ORDER BY day_of_week ASC, opens_at ASC NULLS FIRST").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_special_hours_by_date(&self, date: NaiveDate) -> Result<Vec<SpecialHourRow>, AppError> {
        sqlx::query_as::<_, SpecialHourRow>("SELECT * FROM special_hours WHERE date = $1 ORDER BY opens_at ASC NULLS FIRST").bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_special_hours_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SpecialHourRow>, AppError> {
        sqlx::query_as::<_, SpecialHourRow>("SELECT * FROM special_hours WHERE date >= $1 AND date <= $2 ORDER BY date ASC, opens_at ASC NULLS FIRST").bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn replace_working_hour(&self, day_of_week: i32, ranges: &[TimeRange], active: bool) -> Result<Vec<WorkingHourRow>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM working_hours WHERE day_of_week = $1").bind(day_of_week).execute(&mut *tx).await.map_err(AppError::Database)?;

        let mut saved = Vec::new();
        for row in WorkingHourRow::rows_for(day_of_week, ranges, active) {
            let inserted = sqlx::query_as::<_, WorkingHourRow>("INSERT INTO working_hours (id, day_of_week, opens_at, closes_at, is_open) VALUES ($1, $2, $3, $4, $5) RETURNING *").bind(&row.id).bind(row.day_of_week).bind(row.opens_at).bind(row.closes_at).bind(row.is_open).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            saved.push(inserted);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }

    async fn replace_special_hour(&self, date: NaiveDate, ranges: &[TimeRange], active: bool) -> Result<Vec<SpecialHourRow>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM special_hours WHERE date = $1").bind(date).execute(&mut *tx).await.map_err(AppError::Database)?;

        let mut saved = Vec::new();
        for row in SpecialHourRow::rows_for(date, ranges, active) {
            let inserted = sqlx::query_as::<_, SpecialHourRow>("INSERT INTO special_hours (id, date, opens_at, closes_at, is_open) VALUES ($1, $2, $3, $4, $5) RETURNING *").bind(&row.id).bind(row.date).bind(row.opens_at).bind(row.closes_at).bind(row.is_open).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            saved.push(inserted);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }

    async fn delete_special_hour(&self, date: NaiveDate) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM special_hours WHERE date = $1").bind(date).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("No special hours for this date".into())); }
        Ok(())
    }
}

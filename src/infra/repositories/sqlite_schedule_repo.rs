use crate::domain::{
    models::{special_day::SpecialHourRow, time_range::TimeRange, work_day::WorkingHourRow},
    ports::ScheduleRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteScheduleRepo {
    pool: SqlitePool,
}

impl SqliteScheduleRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepo {
    async fn list_working_hours(&self) -> Result<Vec<WorkingHourRow>, AppError> {
        sqlx::query_as::<_, WorkingHourRow>(
            "SELECT * FROM working_hours ORDER BY day_of_week ASC, opens_at ASC"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_special_hours_by_date(&self, date: NaiveDate) -> Result<Vec<SpecialHourRow>, AppError> {
        sqlx::query_as::<_, SpecialHourRow>(
            "SELECT * FROM special_hours WHERE date = ? ORDER BY opens_at ASC"
        )
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_special_hours_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SpecialHourRow>, AppError> {
        sqlx::query_as::<_, SpecialHourRow>(
            "SELECT * FROM special_hours WHERE date >= ? AND date <= ? ORDER BY date ASC, opens_at ASC"
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn replace_working_hour(&self, day_of_week: i32, ranges: &[TimeRange], active: bool) -> Result<Vec<WorkingHourRow>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM working_hours WHERE day_of_week = ?")
            .bind(day_of_week)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let mut saved = Vec::new();
        for row in WorkingHourRow::rows_for(day_of_week, ranges, active) {
            let inserted = sqlx::query_as::<_, WorkingHourRow>(
                r#"INSERT INTO working_hours (id, day_of_week, opens_at, closes_at, is_open)
                   VALUES (?, ?, ?, ?, ?)
                   RETURNING *"#
            )
                .bind(&row.id)
                .bind(row.day_of_week)
                .bind(row.opens_at)
                .bind(row.closes_at)
                .bind(row.is_open)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            saved.push(inserted);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }

    async fn replace_special_hour(&self, date: NaiveDate, ranges: &[TimeRange], active: bool) -> Result<Vec<SpecialHourRow>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM special_hours WHERE date = ?")
            .bind(date)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let mut saved = Vec::new();
        for row in SpecialHourRow::rows_for(date, ranges, active) {
            let inserted = sqlx::query_as::<_, SpecialHourRow>(
                r#"INSERT INTO special_hours (id, date, opens_at, closes_at, is_open)
                   VALUES (?, ?, ?, ?, ?)
                   RETURNING *"#
            )
                .bind(&row.id)
                .bind(row.date)
                .bind(row.opens_at)
                .bind(row.closes_at)
                .bind(row.is_open)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            saved.push(inserted);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }

    async fn delete_special_hour(&self, date: NaiveDate) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM special_hours WHERE date = ?")
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("No special hours for this date".into()));
        }
        Ok(())
    }
}

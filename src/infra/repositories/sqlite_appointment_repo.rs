use crate::domain::{
    models::appointment::Appointment,
    ports::{AppointmentRepository, DayScope},
};
use crate::domain::services::conflict::ensure_no_conflict;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use chrono::{DateTime, Duration, Utc};

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }

    /// Takes the day's lock row and returns the appointments the candidate has
    /// to be checked against. The upsert is the first statement of the
    /// transaction so SQLite grabs the write lock before anything is read.
    async fn lock_day(
        tx: &mut Transaction<'_, Sqlite>,
        scope: &DayScope,
        gap: Duration,
    ) -> Result<Vec<Appointment>, AppError> {
        sqlx::query(
            r#"INSERT INTO appointment_day_locks (day, locked_at) VALUES (?, ?)
               ON CONFLICT(day) DO UPDATE SET locked_at = excluded.locked_at"#
        )
            .bind(scope.day)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(AppError::Database)?;

        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE start_time < ? AND end_time > ? ORDER BY start_time ASC"
        )
            .bind(scope.end)
            .bind(scope.start - gap)
            .fetch_all(&mut **tx)
            .await
            .map_err(AppError::Database)
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE start_time < ? AND end_time > ? ORDER BY start_time ASC"
        )
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn create_checked(&self, appointment: &Appointment, scope: &DayScope, gap: Duration) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let existing = Self::lock_day(&mut tx, scope, gap).await?;
        ensure_no_conflict(appointment, &existing, None, gap)?;

        let created = sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointments (id, patient_id, name, start_time, end_time, duration_secs, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&appointment.id)
            .bind(&appointment.patient_id)
            .bind(&appointment.name)
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(appointment.duration_secs)
            .bind(appointment.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn update_checked(&self, appointment: &Appointment, scope: &DayScope, gap: Duration) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let existing = Self::lock_day(&mut tx, scope, gap).await?;
        ensure_no_conflict(appointment, &existing, Some(&appointment.id), gap)?;

        let updated = sqlx::query_as::<_, Appointment>(
            r#"UPDATE appointments SET start_time = ?, end_time = ?, duration_secs = ?
               WHERE id = ?
               RETURNING *"#
        )
            .bind(appointment.start_time)
            .bind(appointment.end_time)
            .bind(appointment.duration_secs)
            .bind(&appointment.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Appointment not found".into()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Appointment not found".into()));
        }
        Ok(())
    }
}

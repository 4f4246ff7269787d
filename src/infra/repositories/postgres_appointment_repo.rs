use crate::domain::{
    models::appointment::Appointment,
    ports::{AppointmentRepository, DayScope},
};
use crate::domain::services::conflict::ensure_no_conflict;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use chrono::{DateTime, Duration, Utc};

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The upserted lock row stays locked until the transaction ends, so a
    /// second writer for the same day waits here.
    async fn lock_day(tx: &mut Transaction<'_, Postgres>, scope: &DayScope, gap: Duration) -> Result<Vec<Appointment>, AppError> {
        sqlx::query("INSERT INTO appointment_day_locks (day, locked_at) VALUES ($1, $2) ON CONFLICT (day) DO UPDATE SET locked_at = EXCLUDED.locked_at").bind(scope.day).bind(Utc::now()).execute(&mut **tx).await.map_err(AppError::Database)?;
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE start_time < $1 AND end_time > $2 ORDER BY start_time ASC").bind(scope.end).bind(scope.start - gap).fetch_all(&mut **tx).await.map_err(AppError::Database)
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE start_time < $1 AND end_time > $2 ORDER BY start_time ASC").bind(end).bind(start).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_checked(&self, appointment: &Appointment, scope: &DayScope, gap: Duration) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let existing = Self::lock_day(&mut tx, scope, gap).await?;
        ensure_no_conflict(appointment, &existing, None, gap)?;

        let created = sqlx::query_as::<_, Appointment>("INSERT INTO appointments (id, patient_id, name, start_time, end_time, duration_secs, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *").bind(&appointment.id).bind(&appointment.patient_id).bind(&appointment.name).bind(appointment.start_time).bind(appointment.end_time).bind(appointment.duration_secs).bind(appointment.created_at).fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn update_checked(&self, appointment: &Appointment, scope: &DayScope, gap: Duration) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let existing = Self::lock_day(&mut tx, scope, gap).await?;
        ensure_no_conflict(appointment, &existing, Some(&appointment.id), gap)?;

        let updated = sqlx::query_as::<_, Appointment>("UPDATE appointments SET start_time = $1, end_time = $2, duration_secs = $3 WHERE id = $4 RETURNING *").bind(appointment.start_time).bind(appointment.end_time).bind(appointment.duration_secs).bind(&appointment.id).fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Appointment not found".into()))?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Appointment not found".into())); }
        Ok(())
    }
}

use std::sync::Arc;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::info;
use crate::domain::{
    models::{
        appointment::{Appointment, NewAppointmentParams},
        availability::AvailabilitySlot,
    },
    ports::{AppointmentRepository, DayScope},
};
use crate::domain::services::{
    availability::{calculate_slots, effective_slot_secs, MAX_SLOT_SECS},
    clinic_time::{day_bounds, utc_to_local},
    schedule_service::ScheduleService,
};
use crate::error::AppError;

pub struct AppointmentService {
    repo: Arc<dyn AppointmentRepository>,
    schedule: Arc<ScheduleService>,
    tz: Tz,
    gap: Duration,
}

impl AppointmentService {
    pub fn new(repo: Arc<dyn AppointmentRepository>, schedule: Arc<ScheduleService>, gap: Duration) -> Self {
        let tz = schedule.timezone();
        Self { repo, schedule, tz, gap }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Appointment, AppError> {
        self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".into()))
    }

    /// Appointments touching the clinic-local calendar day.
    pub async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<Appointment>, AppError> {
        let (start, end) = day_bounds(self.tz, date)?;
        self.repo.list_between(start, end).await
    }

    pub async fn get_today(&self) -> Result<Vec<Appointment>, AppError> {
        let (today, _) = utc_to_local(self.tz, Utc::now());
        self.get_by_date(today).await
    }

    pub async fn get_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        if start > end {
            return Err(AppError::Validation("Start must not be after end".into()));
        }
        self.repo.list_between(start, end).await
    }

    pub async fn create(&self, params: NewAppointmentParams) -> Result<Appointment, AppError> {
        let has_patient = params.patient_id.as_deref().is_some_and(|s| !s.trim().is_empty());
        let has_name = params.name.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !has_patient && !has_name {
            return Err(AppError::Validation("Either patient_id or name is required".into()));
        }
        validate_duration(params.duration_secs)?;

        let appointment = Appointment::new(params);
        self.schedule.check_appointment_hours(appointment.start_time, appointment.end_time).await?;

        let scope = self.scope_of(appointment.start_time)?;
        let created = self.repo.create_checked(&appointment, &scope, self.gap).await?;

        info!(
            appointment_id = %created.id,
            start = %created.start_time,
            duration_secs = created.duration_secs,
            "Appointment created"
        );
        Ok(created)
    }

    /// Moves and/or resizes an appointment. Omitted fields keep their stored value.
    pub async fn update(&self, id: &str, start: Option<DateTime<Utc>>, duration_secs: Option<i64>) -> Result<Appointment, AppError> {
        if let Some(secs) = duration_secs {
            validate_duration(secs)?;
        }

        let mut appointment = self.get_by_id(id).await?;
        let new_start = start.unwrap_or(appointment.start_time);
        let new_duration = duration_secs.unwrap_or(appointment.duration_secs);
        appointment.reschedule(new_start, new_duration);

        self.schedule.check_appointment_hours(appointment.start_time, appointment.end_time).await?;

        let scope = self.scope_of(appointment.start_time)?;
        let updated = self.repo.update_checked(&appointment, &scope, self.gap).await?;

        info!(appointment_id = %updated.id, start = %updated.start_time, "Appointment updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.repo.delete(id).await?;
        info!(appointment_id = %id, "Appointment deleted");
        Ok(())
    }

    /// Slots of the day together with the slot length actually used.
    pub async fn available_slots(&self, date: NaiveDate, slot_secs: i64) -> Result<(i64, Vec<AvailabilitySlot>), AppError> {
        if slot_secs > MAX_SLOT_SECS {
            return Err(AppError::Validation(format!("Slot duration may not exceed {} seconds", MAX_SLOT_SECS)));
        }
        let slot_secs = effective_slot_secs(slot_secs);

        let day = self.schedule.effective_day(date).await?;
        if !day.active {
            return Ok((slot_secs, Vec::new()));
        }

        let booked = self.get_by_date(date).await?;
        Ok((slot_secs, calculate_slots(&day, self.tz, &booked, slot_secs, self.gap)))
    }

    fn scope_of(&self, start: DateTime<Utc>) -> Result<DayScope, AppError> {
        let (day, _) = utc_to_local(self.tz, start);
        let (day_start, day_end) = day_bounds(self.tz, day)?;
        Ok(DayScope { day, start: day_start, end: day_end })
    }
}

fn validate_duration(secs: i64) -> Result<(), AppError> {
    if secs <= 0 {
        return Err(AppError::Validation("Duration must be a positive number of seconds".into()));
    }
    if secs > MAX_SLOT_SECS {
        return Err(AppError::Validation(format!("Duration may not exceed {} seconds", MAX_SLOT_SECS)));
    }
    Ok(())
}

use std::sync::Arc;
use chrono::Duration;
use crate::domain::ports::{AppointmentRepository, ScheduleRepository};
use crate::domain::services::{appointment_service::AppointmentService, schedule_service::ScheduleService};
use crate::config::Config;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub schedule_service: Arc<ScheduleService>,
    pub appointment_service: Arc<AppointmentService>,
}

impl AppState {
    pub fn new(
        config: Config,
        schedule_repo: Arc<dyn ScheduleRepository>,
        appointment_repo: Arc<dyn AppointmentRepository>,
    ) -> Result<Self, AppError> {
        let gap = Duration::try_minutes(config.appointment_gap_min)
            .filter(|gap| *gap >= Duration::zero())
            .ok_or_else(|| AppError::InternalWithMsg(format!(
                "Appointment gap of {} minutes is out of range", config.appointment_gap_min
            )))?;

        let schedule_service = Arc::new(ScheduleService::new(schedule_repo, config.clinic_tz));
        let appointment_service = Arc::new(AppointmentService::new(
            appointment_repo,
            schedule_service.clone(),
            gap,
        ));

        Ok(Self {
            config,
            schedule_service,
            appointment_service,
        })
    }
}

pub mod clinic_time;
pub mod conflict;
pub mod availability;
pub mod schedule_service;
pub mod appointment_service;

pub mod sqlite_schedule_repo;
pub mod sqlite_appointment_repo;

pub mod postgres_schedule_repo;
pub mod postgres_appointment_repo;

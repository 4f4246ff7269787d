use std::env;
use chrono_tz::Tz;
use crate::error::AppError;

pub const DEFAULT_CLINIC_TZ: &str = "America/Guatemala";
/// A gap longer than a day would block every following appointment anyway.
pub const MAX_APPOINTMENT_GAP_MIN: i64 = 24 * 60;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub clinic_tz: Tz,
    /// Minutes kept free after every appointment before the next may start.
    pub appointment_gap_min: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::InternalWithMsg("DATABASE_URL must be set".into()))?;

        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse()
            .map_err(|_| AppError::InternalWithMsg("PORT must be a number".into()))?;

        let tz_name = env::var("CLINIC_TZ").unwrap_or_else(|_| DEFAULT_CLINIC_TZ.to_string());
        let clinic_tz = tz_name.parse::<Tz>()
            .map_err(|_| AppError::InternalWithMsg(format!("CLINIC_TZ '{}' is not a valid IANA time zone", tz_name)))?;

        let appointment_gap_min = parse_gap_minutes(
            &env::var("APPOINTMENT_GAP_MIN").unwrap_or_else(|_| "0".to_string()),
        )?;

        Ok(Self {
            database_url,
            port,
            clinic_tz,
            appointment_gap_min,
        })
    }
}

fn parse_gap_minutes(raw: &str) -> Result<i64, AppError> {
    let minutes: i64 = raw.trim().parse()
        .map_err(|_| AppError::InternalWithMsg("APPOINTMENT_GAP_MIN must be a number".into()))?;
    if minutes < 0 {
        return Err(AppError::InternalWithMsg("APPOINTMENT_GAP_MIN must not be negative".into()));
    }
    if minutes > MAX_APPOINTMENT_GAP_MIN {
        return Err(AppError::InternalWithMsg(format!(
            "APPOINTMENT_GAP_MIN may not exceed {} minutes", MAX_APPOINTMENT_GAP_MIN
        )));
    }
    Ok(minutes)
}

pub mod time_range;
pub mod work_day;
pub mod special_day;
pub mod effective_day;
pub mod appointment;
pub mod availability;

pub mod log;
pub mod time_format;

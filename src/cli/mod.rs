pub mod actions;
pub mod session_file;
pub mod telemetry;

pub mod commands;
pub mod dispatch;

mod start;
pub use self::start::start;

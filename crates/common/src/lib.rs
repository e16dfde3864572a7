pub mod config;
pub mod logging;

pub use crate::config::AppConfig;
pub use crate::logging::init_logging;

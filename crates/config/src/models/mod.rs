pub mod app_config;
pub mod logging;

pub use app_config::*;
pub use logging::*;

pub mod models;
pub mod validation;

pub use models::{AppConfig, LogLevel, OutputFormat, DEFAULT_CONFIG_FILE};
pub use validation::{ConfigValidator, ValidationUtils};

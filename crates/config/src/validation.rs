use mailsync_errors::{SyncError, SyncResult};

/// Trait for configuration validation
pub trait ConfigValidator {
    fn validate(&self) -> SyncResult<()>;
}

/// General validation utilities
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field_name: &str) -> SyncResult<()> {
        if value.trim().is_empty() {
            return Err(SyncError::validation_error(format!(
                "{field_name} cannot be empty"
            )));
        }
        Ok(())
    }

    /// Validate that a count lies in `1..=max`
    pub fn validate_count(count: usize, field_name: &str, max: usize) -> SyncResult<()> {
        if count == 0 {
            return Err(SyncError::validation_error(format!(
                "{field_name} must be greater than 0"
            )));
        }
        if count > max {
            return Err(SyncError::validation_error(format!(
                "{field_name} must be less than or equal to {max}"
            )));
        }
        Ok(())
    }
}

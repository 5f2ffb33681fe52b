//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.max_steps == Some(0) {
            return Err(ConfigError::ValidationError(
                "pipeline.max_steps must be > 0 when set".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.max_decompressed_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_decompressed_size_mb must be > 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if self.logging.format != "pretty" && self.logging.format != "json" {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

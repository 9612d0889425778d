//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::file::{OptionsFile, SinkKind};
use super::Rotation;

impl Rotation {
    /// Validate rotation values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "file.max_size_mb must be > 0".into(),
            ));
        }
        if self.max_backups == 0 {
            return Err(ConfigError::ValidationError(
                "file.max_backups must be > 0".into(),
            ));
        }
        if self.max_age_days == 0 {
            return Err(ConfigError::ValidationError(
                "file.max_age_days must be > 0".into(),
            ));
        }
        Ok(())
    }
}

impl OptionsFile {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.sinks.contains(&SinkKind::File) {
            self.file.rotation.validate()?;
            if self.file.path.as_deref().is_some_and(|p| p.trim().is_empty()) {
                return Err(ConfigError::ValidationError(
                    "file.path must not be empty".into(),
                ));
            }
        }
        if self.filter.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "filter must not be empty when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rotation_passes_validation() {
        assert!(Rotation::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let rotation = Rotation {
            max_size_mb: 0,
            ..Rotation::default()
        };
        let err = rotation.validate().unwrap_err();
        assert!(err.to_string().contains("max_size_mb"));
    }

    #[test]
    fn test_validate_rejects_zero_backups() {
        let rotation = Rotation {
            max_backups: 0,
            ..Rotation::default()
        };
        let err = rotation.validate().unwrap_err();
        assert!(err.to_string().contains("max_backups"));
    }

    #[test]
    fn test_validate_rejects_zero_age() {
        let rotation = Rotation {
            max_age_days: 0,
            ..Rotation::default()
        };
        let err = rotation.validate().unwrap_err();
        assert!(err.to_string().contains("max_age_days"));
    }

    #[test]
    fn test_file_rotation_only_checked_when_file_sink_listed() {
        let mut file = OptionsFile::default();
        file.file.rotation.max_size_mb = 0;
        assert!(file.validate().is_ok());

        file.sinks.push(SinkKind::File);
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_filter() {
        let file = OptionsFile {
            filter: Some("  ".into()),
            ..OptionsFile::default()
        };
        let err = file.validate().unwrap_err();
        assert!(err.to_string().contains("filter"));
    }
}

//! Error types for the AFPS HUD.

use thiserror::Error;

/// Top-level error type for AFPS operations.
#[derive(Debug, Error)]
pub enum AfpsError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config text could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Config could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// A color string was not valid `RRGGBB` / `RRGGBBAA` hex
    #[error("Invalid color '{0}': expected RRGGBB or RRGGBBAA hex")]
    InvalidColor(String),
}

/// Result type alias for AFPS operations.
pub type AfpsResult<T> = Result<T, AfpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps_into_top_level() {
        let err: AfpsError = ConfigError::InvalidColor("zz".to_string()).into();
        assert!(matches!(err, AfpsError::Config(ConfigError::InvalidColor(_))));
        assert_eq!(
            err.to_string(),
            "Config error: Invalid color 'zz': expected RRGGBB or RRGGBBAA hex"
        );
    }

    #[test]
    fn test_io_error_wraps_into_top_level() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AfpsError = io.into();
        assert!(err.to_string().starts_with("IO error:"));
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Request '{request_id}' is missing required attribute '{attribute}'")]
    MissingAttributeError {
        request_id: String,
        attribute: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl RouterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RouterError::IoError(_) => ErrorCategory::Io,
            RouterError::SerializationError(_)
            | RouterError::CsvError(_)
            | RouterError::ProcessingError { .. } => ErrorCategory::Data,
            RouterError::ConfigError { .. }
            | RouterError::ConfigValidationError { .. }
            | RouterError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RouterError::MissingAttributeError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RouterError::IoError(_) => "Check that the input file exists and the output directory is writable",
            RouterError::SerializationError(_) => {
                "Make sure the request file is valid JSON with a top-level \"requests\" array"
            }
            RouterError::CsvError(_) => "Check the output path and the csv filename setting",
            RouterError::ConfigError { .. }
            | RouterError::ConfigValidationError { .. }
            | RouterError::InvalidConfigValueError { .. } => {
                "Review the configuration file or command line arguments"
            }
            RouterError::MissingAttributeError { .. } => {
                "Supply the attribute in the request file or set missing_attributes = \"falsy_default\""
            }
            RouterError::ProcessingError { .. } => "Re-run with --verbose to see which request failed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RouterError::IoError(e) => format!("Could not read or write a file: {}", e),
            RouterError::MissingAttributeError {
                request_id,
                attribute,
            } => format!(
                "Request '{}' does not say whether it is '{}'",
                request_id, attribute
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_is_validation_error() {
        let err = RouterError::MissingAttributeError {
            request_id: "r-1".to_string(),
            attribute: "aeon".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("aeon"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = RouterError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_severity_ordering() {
        let config = RouterError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::High);
        assert!(ErrorSeverity::Medium < config.severity());
        assert!(config.severity() < ErrorSeverity::Critical);
    }
}

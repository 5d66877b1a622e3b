//! Error types for the logging core

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Structural contradiction inside a [`Config`](crate::core::Config)
    #[error("Invalid configuration for logger '{name}': {message}")]
    InvalidConfig { name: String, message: String },

    /// A logger with this name has already been constructed
    #[error("A logger with the name '{name}' already exists")]
    DuplicateLoggerName { name: String },

    /// The global convenience context was installed twice
    #[error("A global logging context is already installed")]
    ContextAlreadyInstalled,

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn invalid_config(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfig {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate logger name error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        LoggerError::DuplicateLoggerName { name: name.into() }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_config("app", "missing file path");
        assert!(matches!(err, LoggerError::InvalidConfig { .. }));

        let err = LoggerError::duplicate_name("svc");
        assert!(matches!(err, LoggerError::DuplicateLoggerName { .. }));

        let err = LoggerError::file_sink("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_config("app", "File logger must have a file path");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for logger 'app': File logger must have a file path"
        );

        let err = LoggerError::duplicate_name("svc");
        assert_eq!(err.to_string(), "A logger with the name 'svc' already exists");

        assert_eq!(
            LoggerError::ContextAlreadyInstalled.to_string(),
            "A global logging context is already installed"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "cannot open app.log", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("cannot open app.log"));
    }
}

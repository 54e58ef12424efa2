/// Centralized error types for code-segmenter using thiserror
///
/// Provides domain-specific error types for better error handling and user-facing messages.
use thiserror::Error;

/// Main error type for the segmentation system
#[derive(Error, Debug)]
pub enum SegmenterError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to parsing source text
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid syntax at line {line}, column {column}")]
    InvalidSyntax { line: usize, column: usize },

    #[error("Failed to load Python grammar: {0}")]
    Grammar(String),

    #[error("Parser produced no syntax tree")]
    NoTree,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Errors related to filesystem watching
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to initialize filesystem watcher: {0}")]
    InitFailed(String),

    #[error("Failed to watch '{path}': {reason}")]
    WatchFailed { path: String, reason: String },

    #[error("Watch root does not exist: {0}")]
    RootNotFound(String),

    #[error("Watcher event channel closed")]
    ChannelClosed,
}

// Helper methods for SegmenterError
impl SegmenterError {
    /// Create a new error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        SegmenterError::Other(msg.into())
    }

    /// Check if this is a user error (bad input or configuration) vs system error
    pub fn is_user_error(&self) -> bool {
        matches!(self, SegmenterError::Parse(_) | SegmenterError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SegmenterError::Parse(ParseError::InvalidSyntax { line: 3, column: 7 });
        assert_eq!(
            err.to_string(),
            "Parse error: Invalid syntax at line 3, column 7"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SegmenterError = io_err.into();
        assert!(matches!(err, SegmenterError::Io(_)));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            key: "watch.debounce_ms".to_string(),
            reason: "must be greater than 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'watch.debounce_ms': must be greater than 0"
        );
    }

    #[test]
    fn test_watch_error_display() {
        let err = WatchError::WatchFailed {
            path: "/src".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to watch '/src': permission denied");
    }

    #[test]
    fn test_is_user_error() {
        let user_err = SegmenterError::Parse(ParseError::NoTree);
        assert!(user_err.is_user_error());

        let system_err = SegmenterError::Io(std::io::Error::other("test"));
        assert!(!system_err.is_user_error());
    }

    #[test]
    fn test_error_other() {
        let err = SegmenterError::other("custom error message");
        assert_eq!(err.to_string(), "custom error message");
    }
}

//! Error types for chalkboard.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChalkboardError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio stream errors
    #[error("Malformed audio chunk: {message}")]
    ChunkDecode { message: String },

    // Graph rendering errors
    #[error("Failed to parse graph expression '{expression}': {message}")]
    ExpressionParse { expression: String, message: String },

    #[error("Invalid graph domain [{start}, {end}]")]
    GraphDomain { start: f64, end: f64 },

    // Session errors
    #[error("Session channel closed: {message}")]
    ChannelClosed { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ChalkboardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = ChalkboardError::ConfigFileNotFound {
            path: "/path/to/chalkboard.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/chalkboard.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = ChalkboardError::ConfigInvalidValue {
            key: "sample_rate".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for sample_rate: must be positive"
        );
    }

    #[test]
    fn test_chunk_decode_display() {
        let error = ChalkboardError::ChunkDecode {
            message: "odd byte length".to_string(),
        };
        assert_eq!(error.to_string(), "Malformed audio chunk: odd byte length");
    }

    #[test]
    fn test_expression_parse_display() {
        let error = ChalkboardError::ExpressionParse {
            expression: "x +* 2".to_string(),
            message: "unexpected token".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse graph expression 'x +* 2': unexpected token"
        );
    }

    #[test]
    fn test_graph_domain_display() {
        let error = ChalkboardError::GraphDomain {
            start: 2.0,
            end: -2.0,
        };
        assert_eq!(error.to_string(), "Invalid graph domain [2, -2]");
    }

    #[test]
    fn test_channel_closed_display() {
        let error = ChalkboardError::ChannelClosed {
            message: "session task ended".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Session channel closed: session task ended"
        );
    }

    #[test]
    fn test_other_display() {
        let error = ChalkboardError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: ChalkboardError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: ChalkboardError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ChalkboardError>();
        assert_sync::<ChalkboardError>();
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: ChalkboardError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }
}

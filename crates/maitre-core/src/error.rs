use thiserror::Error;

/// Top-level error type for the Maitre system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates convert
/// their errors into `MaitreError` so that the `?` operator works seamlessly
/// across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MaitreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Message is required")]
    EmptyMessage,

    #[error("Voice session error: {0}")]
    Voice(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MaitreError {
    fn from(err: toml::de::Error) -> Self {
        MaitreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MaitreError {
    fn from(err: toml::ser::Error) -> Self {
        MaitreError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MaitreError {
    fn from(err: serde_json::Error) -> Self {
        MaitreError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Maitre operations.
pub type Result<T> = std::result::Result<T, MaitreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MaitreError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_empty_message_display() {
        assert_eq!(MaitreError::EmptyMessage.to_string(), "Message is required");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MaitreError = io_err.into();
        assert!(matches!(err, MaitreError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        let err: MaitreError = parsed.unwrap_err().into();
        assert!(matches!(err, MaitreError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let parsed: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ invalid json }");
        let err: MaitreError = parsed.unwrap_err().into();
        assert!(matches!(err, MaitreError::Serialization(_)));
    }

    #[test]
    fn test_error_display_subsystem_variants() {
        let cases: Vec<(MaitreError, &str)> = vec![
            (
                MaitreError::Capture("microphone lost".to_string()),
                "Capture error: microphone lost",
            ),
            (
                MaitreError::Playback("synthesis failed".to_string()),
                "Playback error: synthesis failed",
            ),
            (
                MaitreError::Transport("connection refused".to_string()),
                "Transport error: connection refused",
            ),
            (
                MaitreError::Voice("invalid transition".to_string()),
                "Voice session error: invalid transition",
            ),
            (
                MaitreError::KnowledgeBase("no specialties".to_string()),
                "Knowledge base error: no specialties",
            ),
            (
                MaitreError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }
        assert_eq!(inner().unwrap(), "success");
    }
}

//! Error types for odio-sacd.
//!
//! Defines the error codes and the error type shared by argument parsing,
//! the decode engine seam and the orchestrator.

use std::fmt;

/// Error codes for every failure the tool can report.
///
/// All of them map to exit status 1. Cancellation is not an error and has
/// no code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No input path, no arguments, or an unrecognized option.
    MissingInput,

    /// The `-r/--rate` value is not one of the supported rates.
    InvalidSampleRate,

    /// The decode engine could not open the source.
    /// Trigger: missing file, unsupported container, unreadable disc.
    OpenFailed,

    /// The decode engine reported a failure during conversion.
    ConvertFailed,

    /// The binary was built without a decode engine.
    EngineUnavailable,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingInput => "MISSING_INPUT",
            ErrorCode::InvalidSampleRate => "INVALID_SAMPLE_RATE",
            ErrorCode::OpenFailed => "OPEN_FAILED",
            ErrorCode::ConvertFailed => "CONVERT_FAILED",
            ErrorCode::EngineUnavailable => "ENGINE_UNAVAILABLE",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MissingInput => "Invalid command-line syntax",
            ErrorCode::InvalidSampleRate => "Invalid samplerate",
            ErrorCode::OpenFailed => "Failed to open the input source",
            ErrorCode::ConvertFailed => "Conversion failed",
            ErrorCode::EngineUnavailable => "No decode engine is linked into this build",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::MissingInput => "Pass the source with -i /path/to/file",
            ErrorCode::InvalidSampleRate => "Use -r 88200 or -r 176400, or omit -r for 88200",
            ErrorCode::OpenFailed => {
                "Check that the file exists and is an SACD ISO, DSF or DFF file"
            }
            ErrorCode::ConvertFailed => {
                "Check that the output directory exists, is writable and has free space"
            }
            ErrorCode::EngineUnavailable => {
                "Rebuild with --features libodiosacd and the libodiosacd library installed"
            }
        }
    }

    /// Returns true for the usage error category (bad or missing arguments).
    pub fn is_usage(&self) -> bool {
        matches!(self, ErrorCode::MissingInput | ErrorCode::InvalidSampleRate)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for odio-sacd operations.
#[derive(Debug)]
pub struct SacdError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SacdError {
    /// Creates a new SacdError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new SacdError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a MISSING_INPUT error.
    pub fn missing_input(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingInput, reason)
    }

    /// Creates an INVALID_SAMPLE_RATE error for the rejected value.
    pub fn invalid_sample_rate(value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidSampleRate,
            format!("Invalid sample rate: {:?} (must be 88200 or 176400)", value),
        )
    }

    /// Creates an OPEN_FAILED error.
    pub fn open_failed(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::OpenFailed,
            format!("Failed to open: {}", path.into()),
        )
    }

    /// Creates a CONVERT_FAILED error.
    pub fn convert_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConvertFailed,
            format!("Conversion failed: {}", reason.into()),
        )
    }

    /// Creates an ENGINE_UNAVAILABLE error.
    pub fn engine_unavailable() -> Self {
        Self::new(
            ErrorCode::EngineUnavailable,
            "This build of odio-sacd has no decode engine",
        )
    }

    /// Returns true if this error belongs to the usage category.
    pub fn is_usage(&self) -> bool {
        self.code.is_usage()
    }
}

impl fmt::Display for SacdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for SacdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using SacdError.
pub type Result<T> = std::result::Result<T, SacdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_as_str() {
        assert_eq!(ErrorCode::MissingInput.as_str(), "MISSING_INPUT");
        assert_eq!(ErrorCode::InvalidSampleRate.as_str(), "INVALID_SAMPLE_RATE");
        assert_eq!(ErrorCode::OpenFailed.as_str(), "OPEN_FAILED");
        assert_eq!(ErrorCode::ConvertFailed.as_str(), "CONVERT_FAILED");
        assert_eq!(ErrorCode::EngineUnavailable.as_str(), "ENGINE_UNAVAILABLE");
    }

    #[test]
    fn only_argument_errors_are_usage_errors() {
        assert!(ErrorCode::MissingInput.is_usage());
        assert!(ErrorCode::InvalidSampleRate.is_usage());
        assert!(!ErrorCode::OpenFailed.is_usage());
        assert!(!ErrorCode::ConvertFailed.is_usage());
        assert!(!ErrorCode::EngineUnavailable.is_usage());
    }

    #[test]
    fn sacd_error_display() {
        let err = SacdError::invalid_sample_rate("48000");
        assert!(err.to_string().contains("INVALID_SAMPLE_RATE"));
        assert!(err.to_string().contains("48000"));
        assert!(err.to_string().contains("Recovery:"));
    }

    #[test]
    fn source_is_exposed() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SacdError::with_source(ErrorCode::OpenFailed, "disc.iso", io);
        assert!(err.source().is_some());
    }
}

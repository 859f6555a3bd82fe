use std::fmt;

/// Result type for training operations
pub type Result<T> = std::result::Result<T, AproxError>;

/// Main error type for the crate
#[derive(Debug, Clone, PartialEq)]
pub enum AproxError {
    /// A caller broke an operation's preconditions (oversampling, misaligned batches)
    ContractViolation(String),

    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Action index outside the environment's action space
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Failure reported by an environment; ends the run
    Environment(String),

    /// Numerical computation errors
    NumericalError(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for AproxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AproxError::ContractViolation(msg) => write!(f, "Contract violation: {}", msg),
            AproxError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            AproxError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            AproxError::InvalidAction { action, max_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, max_actions)
            }
            AproxError::Environment(msg) => write!(f, "Environment error: {}", msg),
            AproxError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            AproxError::IoError(msg) => write!(f, "IO error: {}", msg),
            AproxError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for AproxError {}

impl From<std::io::Error> for AproxError {
    fn from(err: std::io::Error) -> Self {
        AproxError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AproxError {
    fn from(err: serde_json::Error) -> Self {
        AproxError::SerializationError(err.to_string())
    }
}

// Helpers for the common error patterns
impl AproxError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        AproxError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        AproxError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn contract<S: Into<String>>(msg: S) -> Self {
        AproxError::ContractViolation(msg.into())
    }
}

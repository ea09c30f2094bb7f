use crate::domain::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    EmptyInput,
    NoResult,
    InvalidCredentials(Platform),
    AlreadyInProgress(String),
    InputChanged,
    Transport(String),
    Protocol(String),
    ValidationError(String),
    ConfigError(String),
    SecurityError(String),
    ParseError(String),
    IoError(String),
    Internal(String),
}

impl AppError {
    /// Text surfaced to the user for this failure.
    ///
    /// Transport and protocol failures already carry the message extracted from
    /// the response body (or the generic fallback), so it is returned as is.
    pub fn display_message(&self) -> String {
        match self {
            AppError::EmptyInput => {
                "Please provide a requirement file or requirement text first.".to_string()
            }
            AppError::NoResult => {
                "No generated test cases to send. Generate test cases first.".to_string()
            }
            AppError::InvalidCredentials(platform) => format!(
                "{} settings are incomplete. Fill in every required field.",
                platform.display_name()
            ),
            AppError::AlreadyInProgress(operation) => {
                format!("A {} request is already in progress.", operation)
            }
            AppError::InputChanged => {
                "The requirement changed while test cases were being generated. Generate again."
                    .to_string()
            }
            AppError::Transport(msg) | AppError::Protocol(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Input errors are detected locally and never reach the network.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AppError::EmptyInput
                | AppError::NoResult
                | AppError::InvalidCredentials(_)
                | AppError::AlreadyInProgress(_)
                | AppError::ValidationError(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EmptyInput => write!(f, "Input error: no requirement provided"),
            AppError::NoResult => write!(f, "Input error: no generated test cases"),
            AppError::InvalidCredentials(platform) => {
                write!(f, "Input error: incomplete credentials for {}", platform)
            }
            AppError::AlreadyInProgress(op) => write!(f, "Input error: {} already in progress", op),
            AppError::InputChanged => write!(f, "Stale result: requirement changed during generation"),
            AppError::Transport(msg) => write!(f, "Transport error: {}", msg),
            AppError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::SecurityError(msg) => write!(f, "Security error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to bind {transport} listener on {address}: {source}")]
    BindError {
        transport: String,
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Receiver task failed: {message}")]
    TaskError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SignError {
    pub fn config(message: impl Into<String>) -> Self {
        SignError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SignError::IoError(_) | SignError::BindError { .. } => ErrorCategory::Network,
            SignError::ConfigError { .. } | SignError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            SignError::SerializationError(_) | SignError::TaskError { .. } => {
                ErrorCategory::Runtime
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SignError::SerializationError(_) => ErrorSeverity::Low,
            SignError::IoError(_) => ErrorSeverity::Medium,
            SignError::ConfigError { .. } | SignError::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            SignError::BindError { .. } | SignError::TaskError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SignError::BindError { address, .. } => format!(
                "Check that nothing else is listening on {} and that the port is allowed for this user",
                address
            ),
            SignError::IoError(_) => "Check the network interface and retry".to_string(),
            SignError::ConfigError { .. } => {
                "Check the settings file syntax (TOML) and the command line flags".to_string()
            }
            SignError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the settings file or CLI flags", field)
            }
            SignError::SerializationError(_) => {
                "The frame output pipe may be closed; check the downstream panel driver".to_string()
            }
            SignError::TaskError { .. } => {
                "Restart the receiver; the process supervisor should do this automatically"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SignError::BindError {
                transport, address, ..
            } => format!("Could not listen for {} timing data on {}", transport, address),
            SignError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SignError>;

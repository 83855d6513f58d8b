//! Error types for the switch hardware abstraction layer

use std::path::PathBuf;

use thiserror::Error;

use crate::types::DriverRole;

/// Core error type for platform operations
#[derive(Error, Debug)]
pub enum HalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Hardware access errors (unexpected sysfs content, failed kernel operation)
    #[error("Hardware error: {0}")]
    Hardware(String),

    /// A component was asked for a driver role it does not own
    #[error("Driver {role} not found in component {component}")]
    DriverNotFound {
        component: String,
        role: DriverRole,
    },

    /// Port number outside the inventory's port range
    #[error("Invalid port: {0}")]
    InvalidPort(u32),

    /// No transceiver registered for the port
    #[error("No transceiver registered for port {0}")]
    XcvrNotFound(u32),

    /// A path the driver depends on has not appeared yet
    #[error("Not ready, waiting for {}", .0.display())]
    NotReady(PathBuf),

    /// Remote CLI invocation failed
    #[error("CLI error: {0}")]
    Cli(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for platform operations
pub type Result<T> = std::result::Result<T, HalError>;

impl From<serde_json::Error> for HalError {
    fn from(err: serde_json::Error) -> Self {
        HalError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for HalError {
    fn from(err: toml::de::Error) -> Self {
        HalError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: HalError = json_err.into();

        match err {
            HalError::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HalError = io_err.into();

        match err {
            HalError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = HalError::DriverNotFound {
            component: "ScdFanComponent".to_string(),
            role: DriverRole::FanSysfs,
        };
        assert_eq!(
            format!("{}", err),
            "Driver FanSysfsDriver not found in component ScdFanComponent"
        );

        let err = HalError::InvalidPort(99);
        assert_eq!(format!("{}", err), "Invalid port: 99");

        let err = HalError::NotReady(PathBuf::from("/run/fans-ready"));
        assert_eq!(format!("{}", err), "Not ready, waiting for /run/fans-ready");
    }
}

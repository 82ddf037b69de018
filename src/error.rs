use thiserror::Error;

#[derive(Error, Debug)]
pub enum RageQuitError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Insufficient permissions: {0}")]
    Permission(String),

    #[error("Game host unavailable: {0}")]
    HostUnavailable(String),

    #[error("Command delivery failed: {0}")]
    Command(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RageQuitError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(RageQuitError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, RageQuitError>;

// Convenience macro for constructing error values
#[macro_export]
macro_rules! ragequit_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::RageQuitError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::RageQuitError::Permission(format!($($arg)*))
    };
    (host_unavailable, $($arg:tt)*) => {
        $crate::error::RageQuitError::HostUnavailable(format!($($arg)*))
    };
    (command, $($arg:tt)*) => {
        $crate::error::RageQuitError::Command(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::RageQuitError::Internal(format!($($arg)*))
    };
}

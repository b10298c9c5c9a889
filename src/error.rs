use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum TentboxError {
    #[error("Sensor address {0} is already registered")]
    DuplicateAddress(u32),

    #[error("No sensor registered at address {0}")]
    SensorNotFound(u32),

    #[error("Sensor read cycle is already running")]
    AlreadyRunning,

    #[error("Poll interval must be greater than zero")]
    ZeroInterval,

    #[error("Sensor read cycle is not running")]
    NotRunning,

    #[error("Relay {0:?} is already registered")]
    DuplicateRelay(String),

    #[error("No relay named {0:?}")]
    RelayNotFound(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TentboxError>;

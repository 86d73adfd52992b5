use crate::sensor::Sensor;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, SensorError>;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    #[error("Could not open I2C bus {bus}: {reason}")]
    OpenError { bus: String, reason: String },
    #[error("I2C transaction to {address:#04x} failed: {reason}")]
    TransactionError { address: u8, reason: String },
    #[error("{0:#x} is not a 7-bit I2C address")]
    InvalidAddressError(u8),
    #[error("I2C bus is closed")]
    ClosedError,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor} initialization failed: {source}")]
    InitError {
        sensor: Sensor,
        source: TransportError,
    },
    #[error("{sensor} read failed: {source}")]
    ReadError {
        sensor: Sensor,
        source: TransportError,
    },
    #[error("{sensor} was read before being initialized")]
    NotReadyError { sensor: Sensor },
}

impl SensorError {
    pub fn sensor(&self) -> Sensor {
        match self {
            SensorError::InitError { sensor, .. }
            | SensorError::ReadError { sensor, .. }
            | SensorError::NotReadyError { sensor } => *sensor,
        }
    }

    /// True when the underlying bus has been closed, as opposed to a single failed transfer
    pub fn is_bus_closed(&self) -> bool {
        matches!(
            self,
            SensorError::InitError {
                source: TransportError::ClosedError,
                ..
            } | SensorError::ReadError {
                source: TransportError::ClosedError,
                ..
            }
        )
    }
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Could not write record: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Could not format timestamp: {0}")]
    TimestampError(#[from] time::error::Format),
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown argument {0}")]
    UnknownArgumentError(String),
    #[error("Missing value for {0}")]
    MissingValueError(String),
    #[error("Invalid value {value:?} for {flag}")]
    InvalidValueError { flag: String, value: String },
    #[error("Polling period must be between {min} and {max} seconds, got {got}")]
    PeriodOutOfRangeError { min: u64, max: u64, got: u64 },
    #[error("Help requested")]
    HelpRequested,
}

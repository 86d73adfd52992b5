use core::fmt;

mod aht10;
pub use aht10::{Aht10, AHT10_ADDRESS};
mod max30102;
pub use max30102::{Max30102, MAX30102_ADDRESS, MAX30102_PART_ID};

/// Identifies a sensor in errors and log lines
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Sensor {
    Aht10,
    Max30102,
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sensor::Aht10 => f.write_str("AHT10"),
            Sensor::Max30102 => f.write_str("MAX30102"),
        }
    }
}

/// Drivers block while a measurement is in flight, so only the settled states are kept
#[derive(Default, Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum DriverState {
    #[default]
    Uninitialized,
    Initialized,
}

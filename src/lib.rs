pub mod codec;
pub mod config;
pub mod error;
pub mod poller;
pub mod record;
pub mod sensor;
pub mod transport;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use super::{
        config::Config,
        poller::{Buses, Poller},
        record::{LineSink, Record, Sink},
        sensor::{Aht10, DriverState, Max30102, Sensor},
        transport::{Bus, Transport},
        ClimateReading, OpticalSample,
    };
}

/// Temperature and relative humidity derived from one AHT10 measurement
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct ClimateReading {
    /// Degrees Celsius
    pub temperature: f64,
    /// Percent relative humidity
    pub humidity: f64,
}

/// Raw 18 bit ADC counts for one MAX30102 FIFO sample
#[derive(Default, Clone, Copy, Debug, Eq, PartialEq)]
pub struct OpticalSample {
    pub red: u32,
    pub ir: u32,
}

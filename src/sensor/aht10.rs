use crate::codec::decode_aht10;
use crate::error::{Result, SensorError};
use crate::sensor::{DriverState, Sensor};
use crate::transport::Transport;
use crate::ClimateReading;
use embedded_hal::blocking::delay::DelayMs;
use log::debug;

/// Fixed I2C address of the AHT10
pub const AHT10_ADDRESS: u8 = 0x38;

const CMD_CALIBRATE: [u8; 3] = [0xE1, 0x08, 0x00];
const CMD_MEASURE: [u8; 3] = [0xAC, 0x33, 0x00];
const CMD_SOFT_RESET: [u8; 1] = [0xBA];

const CALIBRATE_SETTLE_MS: u32 = 20;
const CONVERSION_MS: u32 = 80;
const RESET_SETTLE_MS: u32 = 20;

/// The humidity and temperature sensor. The bus is borrowed on every call.
#[derive(Copy, Clone, Debug)]
pub struct Aht10<D> {
    delay: D,
    address: u8,
    state: DriverState,
}

impl<D> Aht10<D>
where
    D: DelayMs<u32>,
{
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            address: AHT10_ADDRESS,
            state: DriverState::default(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == DriverState::Initialized
    }

    /// Sends the calibration command and waits for it to settle
    pub fn init<T: Transport>(&mut self, bus: &mut T) -> Result<()> {
        self.state = DriverState::Uninitialized;

        bus.write(self.address, &CMD_CALIBRATE)
            .map_err(|source| SensorError::InitError {
                sensor: Sensor::Aht10,
                source,
            })?;
        self.delay.delay_ms(CALIBRATE_SETTLE_MS);

        debug!("AHT10 calibrated");
        self.state = DriverState::Initialized;
        Ok(())
    }

    /// Triggers a measurement, waits out the conversion and reads the result
    pub fn read<T: Transport>(&mut self, bus: &mut T) -> Result<ClimateReading> {
        if !self.is_initialized() {
            return Err(SensorError::NotReadyError {
                sensor: Sensor::Aht10,
            });
        }
        let read_error = |source| SensorError::ReadError {
            sensor: Sensor::Aht10,
            source,
        };

        bus.write(self.address, &CMD_MEASURE).map_err(read_error)?;
        self.delay.delay_ms(CONVERSION_MS);

        let mut buffer = [0; 6];
        bus.read(self.address, &mut buffer).map_err(read_error)?;

        Ok(decode_aht10(buffer))
    }

    /// Restarts the sensor. Calibration is lost, so [`Aht10::init`] must run again.
    pub fn soft_reset<T: Transport>(&mut self, bus: &mut T) -> Result<()> {
        self.state = DriverState::Uninitialized;

        bus.write(self.address, &CMD_SOFT_RESET)
            .map_err(|source| SensorError::InitError {
                sensor: Sensor::Aht10,
                source,
            })?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }
}

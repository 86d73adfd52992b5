use crate::codec::decode_max30102_sample;
use crate::error::{Result, SensorError};
use crate::sensor::{DriverState, Sensor};
use crate::transport::Transport;
use crate::OpticalSample;
use embedded_hal::blocking::delay::DelayMs;
use log::debug;

/// Fixed I2C address of the MAX30102
pub const MAX30102_ADDRESS: u8 = 0x57;

/// Value of the part id register on a genuine MAX30102
pub const MAX30102_PART_ID: u8 = 0x15;

mod reg {
    pub const FIFO_DATA: u8 = 0x07;
    pub const MODE_CONFIG: u8 = 0x09;
    pub const SPO2_CONFIG: u8 = 0x0A;
    pub const LED1_PULSE_AMPLITUDE: u8 = 0x0C;
    pub const LED2_PULSE_AMPLITUDE: u8 = 0x0D;
    pub const PART_ID: u8 = 0xFF;
}

const MODE_RESET: u8 = 0x40;
// Red and IR LEDs both active
const MODE_SPO2: u8 = 0x03;
// 18 bit ADC, 100 samples/s, 411us pulses
const DEFAULT_SPO2_CONFIG: u8 = 0x67;
const DEFAULT_LED_AMPLITUDE: u8 = 0x1F;

const RESET_SETTLE_MS: u32 = 100;

/// The pulse oximetry front end, configured for raw SpO2 sampling
#[derive(Copy, Clone, Debug)]
pub struct Max30102<D> {
    delay: D,
    address: u8,
    led_amplitude: u8,
    spo2_config: u8,
    state: DriverState,
}

impl<D> Max30102<D>
where
    D: DelayMs<u32>,
{
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            address: MAX30102_ADDRESS,
            led_amplitude: DEFAULT_LED_AMPLITUDE,
            spo2_config: DEFAULT_SPO2_CONFIG,
            state: DriverState::default(),
        }
    }

    /// Change the pulse amplitude written to both LEDs on init
    pub fn set_led_amplitude(&mut self, amplitude: u8) {
        self.led_amplitude = amplitude;
    }

    /// Change the pulse amplitude written to both LEDs on init
    pub fn with_led_amplitude(mut self, amplitude: u8) -> Self {
        self.led_amplitude = amplitude;
        self
    }

    /// Change the raw SpO2 configuration byte (ADC range, sample rate, pulse width)
    pub fn with_spo2_config(mut self, config: u8) -> Self {
        self.spo2_config = config;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn led_amplitude(&self) -> u8 {
        self.led_amplitude
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == DriverState::Initialized
    }

    fn write_register<T: Transport>(&mut self, bus: &mut T, register: u8, value: u8) -> Result<()> {
        match bus.write(self.address, &[register, value]) {
            Ok(res) => Ok(res),
            Err(source) => Err(SensorError::InitError {
                sensor: Sensor::Max30102,
                source,
            }),
        }
    }

    /// Resets the device and configures SpO2 mode. The first failing write aborts the sequence.
    pub fn init<T: Transport>(&mut self, bus: &mut T) -> Result<()> {
        self.state = DriverState::Uninitialized;

        self.write_register(bus, reg::MODE_CONFIG, MODE_RESET)?;
        self.delay.delay_ms(RESET_SETTLE_MS);

        self.write_register(bus, reg::MODE_CONFIG, MODE_SPO2)?;
        self.write_register(bus, reg::SPO2_CONFIG, self.spo2_config)?;
        self.write_register(bus, reg::LED1_PULSE_AMPLITUDE, self.led_amplitude)?;
        self.write_register(bus, reg::LED2_PULSE_AMPLITUDE, self.led_amplitude)?;

        debug!("MAX30102 configured, LED amplitude {:#04x}", self.led_amplitude);
        self.state = DriverState::Initialized;
        Ok(())
    }

    /// Reads the next red/IR sample from the FIFO.
    ///
    /// The pointer write and the 6 byte burst go out as one transaction, the FIFO
    /// pointer only advances within a continuous transfer.
    pub fn read<T: Transport>(&mut self, bus: &mut T) -> Result<OpticalSample> {
        if !self.is_initialized() {
            return Err(SensorError::NotReadyError {
                sensor: Sensor::Max30102,
            });
        }

        let mut buffer = [0; 6];
        bus.write_read(self.address, &[reg::FIFO_DATA], &mut buffer)
            .map_err(|source| SensorError::ReadError {
                sensor: Sensor::Max30102,
                source,
            })?;

        Ok(decode_max30102_sample(buffer))
    }

    /// Reads the part id register. Works before init.
    pub fn part_id<T: Transport>(&mut self, bus: &mut T) -> Result<u8> {
        let mut buffer = [0; 1];
        bus.write_read(self.address, &[reg::PART_ID], &mut buffer)
            .map_err(|source| SensorError::ReadError {
                sensor: Sensor::Max30102,
                source,
            })?;
        Ok(buffer[0])
    }
}

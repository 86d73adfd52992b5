use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BUS: &str = "/dev/i2c-2";
pub const DEFAULT_LOG_PATH: &str = "datalog.txt";
pub const DEFAULT_LED_AMPLITUDE: u8 = 0x1F;

const MIN_PERIOD_SECS: u64 = 1;
const MAX_PERIOD_SECS: u64 = 5;

pub const USAGE: &str = "\
usage: sensorlog [--bus PATH] [--max30102-bus PATH] [--period SECS] [--led AMPLITUDE] [--log PATH]

  --bus PATH           I2C bus carrying the AHT10, and the MAX30102 unless split (default /dev/i2c-2)
  --max30102-bus PATH  separate I2C bus for the MAX30102
  --period SECS        polling period, 1 to 5 seconds (default 1)
  --led AMPLITUDE      MAX30102 LED pulse amplitude, decimal or 0x hex (default 0x1F)
  --log PATH           file the readings are appended to (default datalog.txt)";

/// Runtime settings of the logger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bus: String,
    /// Set when the MAX30102 sits on its own bus
    pub max30102_bus: Option<String>,
    pub period: Duration,
    pub led_amplitude: u8,
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: DEFAULT_BUS.to_string(),
            max30102_bus: None,
            period: Duration::from_secs(MIN_PERIOD_SECS),
            led_amplitude: DEFAULT_LED_AMPLITUDE,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl Config {
    /// Parses command line arguments, program name excluded
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(flag) = args.next() {
            if flag == "-h" || flag == "--help" {
                return Err(ConfigError::HelpRequested);
            }
            let value = match flag.as_str() {
                "--bus" | "--max30102-bus" | "--period" | "--led" | "--log" => args
                    .next()
                    .ok_or_else(|| ConfigError::MissingValueError(flag.clone()))?,
                _ => return Err(ConfigError::UnknownArgumentError(flag)),
            };

            match flag.as_str() {
                "--bus" => config.bus = value,
                "--max30102-bus" => config.max30102_bus = Some(value),
                "--period" => config.period = parse_period(&flag, &value)?,
                "--led" => config.led_amplitude = parse_byte(&flag, &value)?,
                _ => config.log_path = PathBuf::from(value),
            }
        }

        Ok(config)
    }

    /// True when each sensor has its own bus
    pub fn is_split(&self) -> bool {
        self.max30102_bus
            .as_ref()
            .map_or(false, |max30102_bus| *max30102_bus != self.bus)
    }
}

fn invalid(flag: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValueError {
        flag: flag.to_string(),
        value: value.to_string(),
    }
}

fn parse_period(flag: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = value.parse().map_err(|_| invalid(flag, value))?;
    if !(MIN_PERIOD_SECS..=MAX_PERIOD_SECS).contains(&secs) {
        return Err(ConfigError::PeriodOutOfRangeError {
            min: MIN_PERIOD_SECS,
            max: MAX_PERIOD_SECS,
            got: secs,
        });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_byte(flag: &str, value: &str) -> Result<u8, ConfigError> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| invalid(flag, value))
}

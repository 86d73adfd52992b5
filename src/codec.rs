//! Converts raw register bursts into readings. No I/O happens here.

use crate::{ClimateReading, OpticalSample};

// 2**20
const AHT10_DENOM: f64 = 1_048_576f64;

// Constants used to convert values
const HUMIDITY_SPAN: f64 = 100f64;
const TEMPERATURE_PAIR: (f64, f64) = (50f64, 200f64);

/// The MAX30102 ADC is at most 18 bits wide
pub const SAMPLE_MASK: u32 = 0x3FFFF;

/// Merges three bytes big endian, ex merge_bytes(0x12, 0x34, 0x56) = 0x123456
pub(crate) fn merge_bytes(a: u8, b: u8, c: u8) -> u32 {
    ((a as u32) << 16) | ((b as u32) << 8) | c as u32
}

/// Decodes the 6 byte AHT10 measurement.
///
/// Byte 0 is the status byte and is not inspected. Humidity occupies the 20 bits
/// following it, temperature the last 20 bits. Out of range results are returned
/// as computed.
pub fn decode_aht10(buffer: [u8; 6]) -> ClimateReading {
    let raw_humidity = merge_bytes(buffer[1], buffer[2], buffer[3]) >> 4;
    let raw_temp = merge_bytes(buffer[3] & 0x0F, buffer[4], buffer[5]);

    let humidity = raw_humidity as f64 / AHT10_DENOM * HUMIDITY_SPAN;

    let (sub, mul) = TEMPERATURE_PAIR;
    let temperature = raw_temp as f64 / AHT10_DENOM * mul - sub;

    ClimateReading {
        temperature,
        humidity,
    }
}

/// Decodes one FIFO sample in SpO2 mode, red channel first then IR
pub fn decode_max30102_sample(buffer: [u8; 6]) -> OpticalSample {
    OpticalSample {
        red: merge_bytes(buffer[0], buffer[1], buffer[2]) & SAMPLE_MASK,
        ir: merge_bytes(buffer[3], buffer[4], buffer[5]) & SAMPLE_MASK,
    }
}

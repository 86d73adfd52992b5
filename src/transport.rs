use crate::error::TransportError;
use core::fmt::Debug;
use embedded_hal::blocking::i2c;
pub use embedded_hal::blocking::i2c::Operation;
use log::debug;

// Highest 7-bit address
const MAX_ADDRESS: u8 = 0x7F;

/// An I2C bus able to run atomic transactions against one device at a time
pub trait Transport {
    /// Runs every segment against `address` as one indivisible transfer, filling
    /// the read segments in order
    fn transact<'a>(
        &mut self,
        address: u8,
        operations: &mut [Operation<'a>],
    ) -> Result<(), TransportError>;

    /// Releases the bus. Further transactions fail with [`TransportError::ClosedError`]
    fn close(&mut self);

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), TransportError> {
        self.transact(address, &mut [Operation::Write(bytes)])
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), TransportError> {
        self.transact(address, &mut [Operation::Read(buffer)])
    }

    /// Register pointer write followed by a read without releasing the bus in between
    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        self.transact(address, &mut [Operation::Write(bytes), Operation::Read(buffer)])
    }
}

/// Owns an open I2C device until it is closed
#[derive(Debug)]
pub struct Bus<I2C> {
    name: String,
    i2c: Option<I2C>,
}

impl<I2C> Bus<I2C> {
    /// Wraps an already opened I2C device
    pub fn new(name: impl Into<String>, i2c: I2C) -> Self {
        Self {
            name: name.into(),
            i2c: Some(i2c),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.i2c.is_some()
    }
}

#[cfg(feature = "linux")]
impl Bus<linux_embedded_hal::I2cdev> {
    /// Opens a Linux i2c-dev character device such as `/dev/i2c-2`
    pub fn open(path: &str) -> Result<Self, TransportError> {
        match linux_embedded_hal::I2cdev::new(path) {
            Ok(dev) => {
                log::info!("Opened I2C bus {}", path);
                Ok(Self::new(path, dev))
            }
            Err(err) => Err(TransportError::OpenError {
                bus: path.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}

impl<I2C> Transport for Bus<I2C>
where
    I2C: i2c::Transactional,
    I2C::Error: Debug,
{
    fn transact<'a>(
        &mut self,
        address: u8,
        operations: &mut [Operation<'a>],
    ) -> Result<(), TransportError> {
        let i2c = self.i2c.as_mut().ok_or(TransportError::ClosedError)?;
        if address > MAX_ADDRESS {
            return Err(TransportError::InvalidAddressError(address));
        }

        match i2c.exec(address, operations) {
            Ok(res) => Ok(res),
            Err(err) => Err(TransportError::TransactionError {
                address,
                reason: format!("{:?}", err),
            }),
        }
    }

    fn close(&mut self) {
        if self.i2c.take().is_some() {
            debug!("Closed I2C bus {}", self.name);
        }
    }
}

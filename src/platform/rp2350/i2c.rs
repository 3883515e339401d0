//! RP2350 I2C implementation
//!
//! This module provides blocking I2C support for RP2350 using the `rp235x-hal` crate.

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::{I2cConfig, I2cInterface},
    Result,
};
use embedded_hal::i2c::{Error as I2cErrorTrait, ErrorKind, I2c as I2cTrait};
use rp235x_hal::i2c::I2C as HalI2c;

/// RP2350 I2C implementation
///
/// Wraps the `rp235x-hal` I2C peripheral to implement the `I2cInterface` trait.
///
/// # Type Parameters
///
/// * `T` - I2C peripheral instance (I2C0 or I2C1)
/// * `PINS` - SDA/SCL pin pair the peripheral was constructed with
pub struct Rp2350I2c<T, PINS> {
    i2c: HalI2c<T, PINS>,
    _config: I2cConfig,
}

impl<T, PINS> Rp2350I2c<T, PINS> {
    /// Create a new RP2350 I2C instance
    ///
    /// # Arguments
    ///
    /// * `i2c` - The HAL I2C peripheral (configured via `rp235x_hal::i2c::I2C::i2c0`/`i2c1`)
    /// * `config` - I2C configuration (frequency, timeout)
    ///
    /// # Note
    ///
    /// The bus frequency is set when the HAL peripheral is constructed. The frequency
    /// in `config` is informational only and must match the value used there.
    pub fn new(i2c: HalI2c<T, PINS>, config: I2cConfig) -> Self {
        Self {
            i2c,
            _config: config,
        }
    }
}

impl<T, PINS> I2cInterface for Rp2350I2c<T, PINS>
where
    HalI2c<T, PINS>: I2cTrait,
{
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        self.i2c.write(addr, data).map_err(|e| map_hal_error(&e))
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        self.i2c.read(addr, buffer).map_err(|e| map_hal_error(&e))
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(addr, write_data, read_buffer)
            .map_err(|e| map_hal_error(&e))
    }

    fn set_frequency(&mut self, _frequency: u32) -> Result<()> {
        // The HAL has no runtime frequency change; the bus is clocked at the
        // rate chosen during peripheral construction.
        Ok(())
    }
}

/// Map HAL I2C errors to platform I2C errors
fn map_hal_error<E: I2cErrorTrait>(error: &E) -> PlatformError {
    match error.kind() {
        ErrorKind::NoAcknowledge(_) => PlatformError::I2c(I2cError::Nack),
        _ => PlatformError::I2c(I2cError::BusError),
    }
}

//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```
//! use pico_track::platform::mock::MockUart;
//! use pico_track::platform::traits::{UartConfig, UartInterface};
//!
//! let mut uart = MockUart::new(UartConfig::gps());
//! uart.inject_rx_data(b"$GPGGA,...\r\n");
//! let mut buf = [0u8; 16];
//! let n = uart.read(&mut buf).unwrap();
//! assert!(n > 0);
//! ```

#![cfg(any(test, feature = "mock"))]

mod i2c;
mod timer;
mod uart;

pub use i2c::{I2cTransaction, MockI2c};
pub use timer::MockTimer;
pub use uart::MockUart;

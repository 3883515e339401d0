//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the instrument's three
//! peripherals: the GPS and telemetry UARTs, the IMU I2C bus, and the
//! monotonic timer. All platform-specific code is isolated to this module.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{I2cInterface, TimerInterface, UartInterface};

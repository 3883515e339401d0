//! Inertial sensor driver and shared IMU data types
//!
//! The MPU-6050 driver is generic over `I2cInterface`, so the same code
//! runs against the mock bus on the host and the RP2350 I2C peripheral on
//! the board.

pub mod mpu6050;

pub use mpu6050::Mpu6050Driver;

use core::fmt;

use crate::platform::error::PlatformError;
use nalgebra::Vector3;

/// IMU operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImuError {
    /// Bus transaction failed
    Bus(PlatformError),
    /// Driver used before `init()` completed
    NotInitialized,
}

impl fmt::Display for ImuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImuError::Bus(e) => write!(f, "IMU bus fault: {}", e),
            ImuError::NotInitialized => write!(f, "IMU not initialized"),
        }
    }
}

/// One converted inertial sample
///
/// Acceleration and angular rate are in physical units; the temperature
/// register is carried raw and never converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertialReading {
    /// Instrument clock milliseconds when the sample was taken
    pub timestamp_ms: u64,
    /// Acceleration in m/s²
    pub accel: Vector3<f32>,
    /// Angular rate in rad/s
    pub gyro: Vector3<f32>,
    /// Raw temperature register value
    pub temp_raw: i16,
}

impl InertialReading {
    /// All-zero reading, used before the first successful sample
    pub fn zeroed() -> Self {
        Self {
            timestamp_ms: 0,
            accel: Vector3::zeros(),
            gyro: Vector3::zeros(),
            temp_raw: 0,
        }
    }
}

/// Per-axis raw offsets subtracted before scaling
///
/// Values are in raw LSB, determined per deployed sensor while the unit
/// sits level and still. The temperature offset is carried for symmetry
/// but never applied; the temperature register is reported raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOffsets {
    /// Accelerometer X offset
    pub ax: i16,
    /// Accelerometer Y offset
    pub ay: i16,
    /// Accelerometer Z offset
    pub az: i16,
    /// Temperature offset (unused by the conversion)
    pub temp: i16,
    /// Gyroscope X offset
    pub rx: i16,
    /// Gyroscope Y offset
    pub ry: i16,
    /// Gyroscope Z offset
    pub rz: i16,
}

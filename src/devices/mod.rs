//! Device drivers
//!
//! This module contains device drivers that use platform abstraction traits,
//! so they run unchanged against mock peripherals on the host.
//!
//! ## Modules
//!
//! - `gps`: GPS receiver driver (NMEA line assembly, decoder, u-blox configuration)
//! - `imu`: inertial sensor driver (MPU-6050) and shared IMU data types

pub mod gps;
pub mod imu;

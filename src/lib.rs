#![cfg_attr(not(test), no_std)]

//! pico_track - GPS + IMU data-acquisition instrument for Raspberry Pi Pico 2 W
//!
//! This library polls a u-blox GPS receiver and an MPU-6050 inertial sensor at
//! fixed rates, decodes their wire formats into structured readings, and
//! forwards formatted telemetry lines over a secondary serial link.
//!
//! The hardware is reached only through the platform abstraction traits, so
//! every decoder, driver, and sampler in here runs on the host under
//! `cargo test` against the mock peripherals.

// Platform abstraction layer (traits, errors, mock + RP2350 implementations)
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Core systems (logging)
pub mod core;

// Telemetry sink and line formatting
pub mod telemetry;

// Timed sampling tasks (GPS + IMU)
pub mod sampling;

//! Periodic samplers
//!
//! Each sampler owns its device driver, its record, a telemetry sink and a
//! timer, and exposes `poll()` for the firmware main loop to call freely. A
//! cycle runs only when the sampler is `Running` and its period has elapsed
//! on the sampler's own timer, so `pause()` and `stop()` take effect before
//! any subsequent cycle. Cycles run to completion; nothing blocks beyond a
//! bounded bus transaction.

pub mod gps;
pub mod imu;

pub use gps::GpsSampler;
pub use imu::ImuSampler;

/// Sampler lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplerState {
    /// Not armed, `poll()` does nothing
    #[default]
    Stopped,
    /// Armed, `poll()` runs a cycle each time the period elapses
    Running,
    /// Armed but held, `poll()` does nothing until resumed
    Paused,
}

/// Cycle rate of a periodic sampler
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollingRate {
    /// One cycle per second
    Rate1Hz,
    /// Five cycles per second, the instrument default
    #[default]
    Rate5Hz,
    /// Ten cycles per second
    Rate10Hz,
}

impl PollingRate {
    /// Cycle period in milliseconds
    pub fn interval_ms(&self) -> u64 {
        match self {
            PollingRate::Rate1Hz => 1000,
            PollingRate::Rate5Hz => 200,
            PollingRate::Rate10Hz => 100,
        }
    }

    /// Rate in cycles per second
    pub fn hz(&self) -> u8 {
        match self {
            PollingRate::Rate1Hz => 1,
            PollingRate::Rate5Hz => 5,
            PollingRate::Rate10Hz => 10,
        }
    }
}

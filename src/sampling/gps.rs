//! GPS sampler
//!
//! Runs the positioning side of the instrument: drain a bounded number of
//! complete NMEA lines from the receiver, decode them into the positioning
//! record, stamp it and emit one formatted snapshot per cycle. Receiver
//! configuration happens once at `start()`; those writes are fire-and-forget
//! and failures are logged rather than retried, since the receiver's default
//! sentence mix still contains everything the decoder understands.

use super::{PollingRate, SamplerState};
use crate::devices::gps::{decode, ublox, GpsDriver, PositioningRecord};
use crate::platform::traits::{TimerInterface, UartInterface};
use crate::telemetry::{format, TelemetrySink};

/// Sentence types left enabled on the receiver (RMC + GGA), which bounds
/// the number of lines worth draining per cycle.
pub const GPS_ENABLED_SENTENCES: usize = 2;

/// Periodic GPS sampler
///
/// Owns the line driver, the positioning record and its slice of the
/// telemetry link. The firmware main loop calls [`poll`](Self::poll)
/// freely; a cycle only runs when the sampler is running and its period
/// has elapsed.
pub struct GpsSampler<U, S, T>
where
    U: UartInterface,
    S: TelemetrySink,
    T: TimerInterface,
{
    driver: GpsDriver<U>,
    sink: S,
    timer: T,
    record: PositioningRecord,
    rate: PollingRate,
    state: SamplerState,
    next_due_ms: u64,
}

impl<U, S, T> GpsSampler<U, S, T>
where
    U: UartInterface,
    S: TelemetrySink,
    T: TimerInterface,
{
    /// Create a sampler in the `Stopped` state
    ///
    /// # Arguments
    ///
    /// * `driver` - line driver over the receiver UART
    /// * `sink` - telemetry sink receiving one snapshot line per cycle
    /// * `timer` - time source pacing the cycles
    /// * `rate` - requested reporting and polling rate
    pub fn new(driver: GpsDriver<U>, sink: S, timer: T, rate: PollingRate) -> Self {
        Self {
            driver,
            sink,
            timer,
            record: PositioningRecord::new(),
            rate,
            state: SamplerState::Stopped,
            next_due_ms: 0,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Configured rate
    pub fn rate(&self) -> PollingRate {
        self.rate
    }

    /// Snapshot copy of the positioning record
    pub fn record(&self) -> PositioningRecord {
        self.record.clone()
    }

    /// Get mutable reference to the line driver
    pub fn driver_mut(&mut self) -> &mut GpsDriver<U> {
        &mut self.driver
    }

    /// Get reference to the telemetry sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get mutable reference to the telemetry sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Get mutable reference to the timer
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Configure the receiver and arm the periodic cycle
    ///
    /// No-op unless the sampler is `Stopped`. Configuration failures are
    /// logged and not retried; an unsupported rate skips the rate command
    /// and the receiver keeps its default reporting rate, while polling
    /// still follows the requested interval.
    pub fn start(&mut self) {
        if self.state != SamplerState::Stopped {
            return;
        }

        self.configure_receiver();
        self.arm();
        crate::log_info!("GPS sampler started at {} Hz", self.rate.hz());
    }

    /// Toggle between `Running` and `Paused`
    ///
    /// Does not touch receiver configuration. No-op when `Stopped`.
    pub fn pause(&mut self) {
        match self.state {
            SamplerState::Running => self.state = SamplerState::Paused,
            SamplerState::Paused => self.arm(),
            SamplerState::Stopped => {}
        }
    }

    /// Disarm the cycle and release the receiver
    pub fn stop(&mut self) {
        if self.state == SamplerState::Stopped {
            return;
        }

        self.state = SamplerState::Stopped;
        if let Err(e) = self.driver.flush() {
            crate::log_warn!("GPS flush failed: {:?}", e);
        }
    }

    /// Run one cycle if the sampler is running and the period has elapsed
    ///
    /// A cycle drains at most [`GPS_ENABLED_SENTENCES`] complete lines,
    /// decodes each into the record (decode failures leave the record in
    /// its last valid state), then stamps the record and emits one
    /// formatted snapshot.
    pub fn poll(&mut self) {
        if self.state != SamplerState::Running {
            return;
        }
        let now = self.timer.now_ms();
        if now < self.next_due_ms {
            return;
        }
        self.next_due_ms = now.saturating_add(self.rate.interval_ms());

        for _ in 0..GPS_ENABLED_SENTENCES {
            match self.driver.read_line() {
                Ok(Some(line)) => {
                    if let Err(e) = decode(&line, &mut self.record) {
                        crate::log_debug!("NMEA decode failed: {:?}", e);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    crate::log_warn!("GPS read failed: {:?}", e);
                    break;
                }
            }
        }

        self.record.timestamp_ms = now;
        let line = format::format_gps_line(&self.record);
        if let Err(e) = self.sink.send_line(&line) {
            crate::log_warn!("telemetry send failed: {:?}", e);
        }
    }

    fn arm(&mut self) {
        self.state = SamplerState::Running;
        self.next_due_ms = self.timer.now_ms().saturating_add(self.rate.interval_ms());
    }

    fn configure_receiver(&mut self) {
        if let Err(e) = ublox::disable_default_sentences(self.driver.uart_mut()) {
            crate::log_warn!("GPS sentence disable failed: {:?}", e);
        }

        match ublox::rate_frame(self.rate.hz()) {
            Ok(frame) => {
                if let Err(e) = self.driver.uart_mut().write(&frame) {
                    crate::log_warn!("GPS rate config failed: {:?}", e);
                }
            }
            Err(e) => {
                crate::log_warn!(
                    "GPS rate {} Hz not configurable, receiver keeps its default: {:?}",
                    self.rate.hz(),
                    e
                );
            }
        }
    }
}

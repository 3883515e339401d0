//! IMU sampler
//!
//! Simpler lifecycle than the GPS side: `start()` initializes the device if
//! needed and arms the cycle, `pause()` toggles it. Each cycle takes one
//! sample, overwrites the current reading wholesale and emits a formatted
//! snapshot. A bus fault fails the whole cycle: the previous reading stays,
//! nothing is emitted, and the fault is surfaced to the caller while the
//! sampler keeps polling.

use super::{PollingRate, SamplerState};
use crate::devices::imu::{ImuError, InertialReading, Mpu6050Driver};
use crate::platform::traits::{I2cInterface, TimerInterface};
use crate::telemetry::{format, TelemetrySink};

/// Periodic inertial sampler
pub struct ImuSampler<I, S, T>
where
    I: I2cInterface,
    S: TelemetrySink,
    T: TimerInterface,
{
    driver: Mpu6050Driver<I>,
    sink: S,
    timer: T,
    reading: InertialReading,
    rate: PollingRate,
    state: SamplerState,
    next_due_ms: u64,
}

impl<I, S, T> ImuSampler<I, S, T>
where
    I: I2cInterface,
    S: TelemetrySink,
    T: TimerInterface,
{
    /// Create a sampler in the `Stopped` state
    pub fn new(driver: Mpu6050Driver<I>, sink: S, timer: T, rate: PollingRate) -> Self {
        Self {
            driver,
            sink,
            timer,
            reading: InertialReading::zeroed(),
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

    /// Snapshot copy of the latest complete reading
    pub fn reading(&self) -> InertialReading {
        self.reading
    }

    /// Get reference to the device driver
    pub fn driver(&self) -> &Mpu6050Driver<I> {
        &self.driver
    }

    /// Get mutable reference to the device driver
    pub fn driver_mut(&mut self) -> &mut Mpu6050Driver<I> {
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

    /// Initialize the device if needed and arm the periodic cycle
    ///
    /// No-op unless the sampler is `Stopped`.
    ///
    /// # Errors
    ///
    /// Returns the init failure unchanged; the sampler stays `Stopped` so a
    /// later call can retry the bring-up.
    pub fn start(&mut self) -> Result<(), ImuError> {
        if self.state != SamplerState::Stopped {
            return Ok(());
        }

        if !self.driver.is_initialized() {
            self.driver.init(&mut self.timer)?;
        }
        self.arm();
        crate::log_info!("IMU sampler started at {} Hz", self.rate.hz());
        Ok(())
    }

    /// Toggle between `Running` and `Paused`
    ///
    /// Does not touch the device. No-op when `Stopped`.
    pub fn pause(&mut self) {
        match self.state {
            SamplerState::Running => self.state = SamplerState::Paused,
            SamplerState::Paused => self.arm(),
            SamplerState::Stopped => {}
        }
    }

    /// Run one cycle if the sampler is running and the period has elapsed
    ///
    /// # Errors
    ///
    /// A bus fault is reported for every failed cycle. The sampler stays
    /// armed; the log escalates from warn to error once the device has
    /// faulted three times in a row.
    pub fn poll(&mut self) -> Result<(), ImuError> {
        if self.state != SamplerState::Running {
            return Ok(());
        }
        let now = self.timer.now_ms();
        if now < self.next_due_ms {
            return Ok(());
        }
        self.next_due_ms = now.saturating_add(self.rate.interval_ms());

        match self.driver.sample(&mut self.timer) {
            Ok(reading) => {
                self.reading = reading;
                let line = format::format_imu_line(&self.reading);
                if let Err(e) = self.sink.send_line(&line) {
                    crate::log_warn!("telemetry send failed: {:?}", e);
                }
                Ok(())
            }
            Err(e) => {
                if self.driver.is_healthy() {
                    crate::log_warn!("IMU sample failed: {:?}", e);
                } else {
                    crate::log_error!("IMU sample failed, device unhealthy: {:?}", e);
                }
                Err(e)
            }
        }
    }

    fn arm(&mut self) {
        self.state = SamplerState::Running;
        self.next_due_ms = self.timer.now_ms().saturating_add(self.rate.interval_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::imu::CalibrationOffsets;
    use crate::platform::mock::{I2cTransaction, MockI2c, MockTimer};
    use crate::platform::traits::I2cConfig;
    use crate::telemetry::MockTelemetry;

    fn sampler() -> ImuSampler<MockI2c, MockTelemetry, MockTimer> {
        ImuSampler::new(
            Mpu6050Driver::new(MockI2c::new(I2cConfig::default()), CalibrationOffsets::default()),
            MockTelemetry::new(),
            MockTimer::new(),
            PollingRate::Rate5Hz,
        )
    }

    fn block(values: [i16; 7]) -> [u8; 14] {
        let mut bytes = [0u8; 14];
        for (i, value) in values.iter().enumerate() {
            let be = value.to_be_bytes();
            bytes[2 * i] = be[0];
            bytes[2 * i + 1] = be[1];
        }
        bytes
    }

    #[test]
    fn test_start_initializes_device_once() {
        let mut sampler = sampler();
        sampler.start().unwrap();
        assert_eq!(sampler.state(), SamplerState::Running);

        let transactions = sampler.driver_mut().i2c_mut().transactions();
        assert_eq!(transactions.len(), 2);
        assert!(matches!(transactions[0], I2cTransaction::Write { addr: 0x68, .. }));

        // Second start is a no-op, pause/resume does not re-init either
        sampler.start().unwrap();
        sampler.pause();
        sampler.pause();
        assert_eq!(sampler.driver_mut().i2c_mut().transactions().len(), 2);
    }

    #[test]
    fn test_start_failure_leaves_sampler_stopped() {
        let mut sampler = sampler();
        sampler.driver_mut().i2c_mut().set_fail_transactions(true);

        assert!(sampler.start().is_err());
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(!sampler.driver().is_initialized());

        // Bring-up can be retried once the bus recovers
        sampler.driver_mut().i2c_mut().set_fail_transactions(false);
        sampler.start().unwrap();
        assert_eq!(sampler.state(), SamplerState::Running);
    }

    #[test]
    fn test_poll_waits_for_period() {
        let mut sampler = sampler();
        // The init settle delay moves the mock clock to 200ms, so the first
        // cycle falls due at 400ms.
        sampler.start().unwrap();

        sampler.poll().unwrap();
        assert!(sampler.sink().lines().is_empty());

        sampler.timer_mut().advance_ms(199);
        sampler.poll().unwrap();
        assert!(sampler.sink().lines().is_empty());

        sampler.timer_mut().advance_ms(1);
        sampler.poll().unwrap();
        assert_eq!(
            sampler.sink().last(),
            Some("400\tACC\t0.0000,0.0000,0.0000,0.0000,0.0000,0.0000")
        );
    }

    #[test]
    fn test_cycle_overwrites_reading_wholesale() {
        let mut sampler = sampler();
        sampler.start().unwrap();

        sampler.timer_mut().advance_ms(200);
        sampler.poll().unwrap();
        assert_eq!(sampler.reading().timestamp_ms, 400);
        assert_eq!(sampler.reading().accel.x, 0.0);

        // 4096 LSB is exactly 1 g at the +-8g setting
        sampler
            .driver_mut()
            .i2c_mut()
            .set_read_data(&block([4096, 0, 0, 0, 0, 0, 0]));
        sampler.timer_mut().advance_ms(200);
        sampler.poll().unwrap();

        let reading = sampler.reading();
        assert_eq!(reading.timestamp_ms, 600);
        assert_eq!(reading.accel.x, 9.806);
        assert_eq!(sampler.sink().lines().len(), 2);
        assert_eq!(
            sampler.sink().last(),
            Some("600\tACC\t9.8060,0.0000,0.0000,0.0000,0.0000,0.0000")
        );
    }

    #[test]
    fn test_fault_cycle_keeps_previous_reading() {
        let mut sampler = sampler();
        sampler.start().unwrap();
        sampler.timer_mut().advance_ms(200);
        sampler.poll().unwrap();

        let before = sampler.reading();
        assert_eq!(sampler.sink().lines().len(), 1);

        sampler.driver_mut().i2c_mut().set_fail_transactions(true);
        sampler.timer_mut().advance_ms(200);
        let result = sampler.poll();

        assert!(matches!(result, Err(ImuError::Bus(_))));
        assert_eq!(sampler.reading(), before);
        assert_eq!(sampler.sink().lines().len(), 1);
        assert_eq!(sampler.state(), SamplerState::Running);

        // Next good cycle recovers and emits again
        sampler.driver_mut().i2c_mut().set_fail_transactions(false);
        sampler
            .driver_mut()
            .i2c_mut()
            .set_read_data(&block([4096, 0, 0, 0, 0, 0, 0]));
        sampler.timer_mut().advance_ms(200);
        sampler.poll().unwrap();

        assert_eq!(sampler.sink().lines().len(), 2);
        assert_eq!(sampler.reading().accel.x, 9.806);
    }

    #[test]
    fn test_three_consecutive_faults_mark_device_unhealthy() {
        let mut sampler = sampler();
        sampler.start().unwrap();
        sampler.driver_mut().i2c_mut().set_fail_transactions(true);

        for _ in 0..2 {
            sampler.timer_mut().advance_ms(200);
            assert!(sampler.poll().is_err());
            assert!(sampler.driver().is_healthy());
        }

        sampler.timer_mut().advance_ms(200);
        assert!(sampler.poll().is_err());
        assert!(!sampler.driver().is_healthy());

        // A successful sample restores the health flag
        sampler.driver_mut().i2c_mut().set_fail_transactions(false);
        sampler.timer_mut().advance_ms(200);
        sampler.poll().unwrap();
        assert!(sampler.driver().is_healthy());
    }

    #[test]
    fn test_pause_freezes_polling() {
        let mut sampler = sampler();
        sampler.start().unwrap();
        sampler.timer_mut().advance_ms(200);
        sampler.poll().unwrap();
        assert_eq!(sampler.sink().lines().len(), 1);

        sampler.pause();
        assert_eq!(sampler.state(), SamplerState::Paused);
        sampler.timer_mut().advance_ms(1000);
        sampler.poll().unwrap();
        assert_eq!(sampler.sink().lines().len(), 1);

        sampler.pause();
        sampler.timer_mut().advance_ms(200);
        sampler.poll().unwrap();
        assert_eq!(sampler.sink().lines().len(), 2);
    }

    #[test]
    fn test_poll_before_start_does_nothing() {
        let mut sampler = sampler();
        sampler.timer_mut().advance_ms(1000);
        sampler.poll().unwrap();

        assert!(sampler.sink().lines().is_empty());
        assert!(sampler.driver_mut().i2c_mut().transactions().is_empty());
    }
}

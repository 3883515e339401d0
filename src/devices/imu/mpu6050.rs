//! MPU-6050 accelerometer/gyroscope driver
//!
//! Reads the 14-byte sensor block in one bus transaction, unpacks it into
//! seven big-endian signed words and converts the motion axes to physical
//! units with per-axis calibration offsets.

use crate::devices::imu::{CalibrationOffsets, ImuError, InertialReading};
use crate::platform::traits::{I2cInterface, TimerInterface};
use nalgebra::Vector3;

/// MPU-6050 register addresses
pub(crate) mod registers {
    /// Power management 1 (0x6B)
    pub const PWR_MGMT_1: u8 = 107;
    /// Accelerometer configuration, full-scale select (0x1C)
    pub const ACCEL_CONFIG: u8 = 28;
    /// First sensor output register (0x3B); a 14-byte burst from here
    /// covers accel, temperature and gyro
    pub const ACCEL_XOUT_H: u8 = 59;
}

/// Default I2C address (AD0 pin low)
pub const MPU6050_ADDR: u8 = 0x68;

/// ACCEL_CONFIG value selecting the ±8 g range (AFS_SEL = 2)
const ACCEL_RANGE_8G: u8 = 16;

/// Settle time after leaving sleep mode
const POWER_UP_SETTLE_MS: u32 = 200;

/// Accelerometer scale at ±8 g: m/s² per LSB (4096 LSB/g)
const ACCEL_LSB_TO_MS2: f32 = 9.806 / 4096.0;

/// Gyroscope scale: rad/s per LSB at the configured 205 °/s full scale
const GYRO_LSB_TO_RADS: f32 = (core::f32::consts::PI / 180.0) * (205.0 / 32768.0);

/// Maximum consecutive bus faults before the sensor is reported unhealthy
const MAX_CONSECUTIVE_ERRORS: u32 = 3;

/// Raw register words in sensor order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawSample {
    pub ax: i16,
    pub ay: i16,
    pub az: i16,
    pub temp: i16,
    pub rx: i16,
    pub ry: i16,
    pub rz: i16,
}

/// MPU-6050 driver
///
/// Generic over any type implementing `I2cInterface`. The driver must be
/// initialized with [`init`](Mpu6050Driver::init) before sampling; the
/// device powers up asleep.
pub struct Mpu6050Driver<I: I2cInterface> {
    i2c: I,
    addr: u8,
    offsets: CalibrationOffsets,
    healthy: bool,
    error_count: u32,
    initialized: bool,
}

impl<I: I2cInterface> Mpu6050Driver<I> {
    /// Create a new driver at the default address
    ///
    /// # Arguments
    ///
    /// * `i2c` - I2C interface the sensor is wired to
    /// * `offsets` - Per-axis calibration offsets for this unit
    pub fn new(i2c: I, offsets: CalibrationOffsets) -> Self {
        Self::with_address(i2c, MPU6050_ADDR, offsets)
    }

    /// Create a new driver at an explicit address (AD0 pin high: 0x69)
    pub fn with_address(i2c: I, addr: u8, offsets: CalibrationOffsets) -> Self {
        Self {
            i2c,
            addr,
            offsets,
            healthy: false,
            error_count: 0,
            initialized: false,
        }
    }

    /// Get mutable reference to the I2C interface
    pub fn i2c_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    /// Whether `init()` has completed successfully
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether recent bus transactions have been succeeding
    ///
    /// Turns false after `MAX_CONSECUTIVE_ERRORS` faults in a row and
    /// recovers on the next successful transaction.
    pub fn is_healthy(&self) -> bool {
        self.initialized && self.healthy
    }

    /// Current calibration offsets
    pub fn offsets(&self) -> CalibrationOffsets {
        self.offsets
    }

    /// Replace the calibration offsets wholesale
    pub fn set_offsets(&mut self, offsets: CalibrationOffsets) {
        self.offsets = offsets;
    }

    /// Wake the device and select the ±8 g accelerometer range
    ///
    /// The MPU-6050 powers up with the sleep bit set; writing zero to
    /// `PWR_MGMT_1` starts the sensor clocks. The gyro keeps its
    /// configured full scale.
    ///
    /// # Errors
    ///
    /// Returns `ImuError::Bus` if a register write fails; the driver stays
    /// uninitialized.
    pub fn init<T: TimerInterface>(&mut self, timer: &mut T) -> Result<(), ImuError> {
        self.write_register(registers::PWR_MGMT_1, 0)?;
        timer
            .delay_ms(POWER_UP_SETTLE_MS)
            .map_err(ImuError::Bus)?;
        self.write_register(registers::ACCEL_CONFIG, ACCEL_RANGE_8G)?;

        self.initialized = true;
        self.healthy = true;
        crate::log_info!("MPU-6050 initialized (addr {:#x}, range ±8 g)", self.addr);
        Ok(())
    }

    /// Read, unpack and convert one sample
    ///
    /// Performs a single 14-byte bus transaction, then stamps the reading
    /// with the timer's millisecond clock.
    ///
    /// # Errors
    ///
    /// Returns `ImuError::NotInitialized` before `init()`, or
    /// `ImuError::Bus` when the transaction fails.
    pub fn sample<T: TimerInterface>(&mut self, timer: &mut T) -> Result<InertialReading, ImuError> {
        let raw = self.read_raw()?;
        let timestamp_ms = timer.now_ms();
        Ok(to_physical(&raw, &self.offsets, timestamp_ms))
    }

    /// Read the 14-byte sensor block and unpack it
    fn read_raw(&mut self) -> Result<RawSample, ImuError> {
        if !self.initialized {
            return Err(ImuError::NotInitialized);
        }

        let mut buf = [0u8; 14];
        match self
            .i2c
            .write_read(self.addr, &[registers::ACCEL_XOUT_H], &mut buf)
        {
            Ok(()) => self.note_bus_ok(),
            Err(e) => {
                self.note_bus_fault();
                return Err(ImuError::Bus(e));
            }
        }

        Ok(unpack_block(&buf))
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), ImuError> {
        match self.i2c.write(self.addr, &[reg, value]) {
            Ok(()) => {
                self.note_bus_ok();
                Ok(())
            }
            Err(e) => {
                self.note_bus_fault();
                Err(ImuError::Bus(e))
            }
        }
    }

    fn note_bus_ok(&mut self) {
        self.error_count = 0;
        self.healthy = true;
    }

    fn note_bus_fault(&mut self) {
        self.error_count += 1;
        if self.error_count >= MAX_CONSECUTIVE_ERRORS {
            self.healthy = false;
        }
    }
}

/// Interpret the sensor block as seven consecutive big-endian signed words
pub(crate) fn unpack_block(buf: &[u8; 14]) -> RawSample {
    RawSample {
        ax: i16::from_be_bytes([buf[0], buf[1]]),
        ay: i16::from_be_bytes([buf[2], buf[3]]),
        az: i16::from_be_bytes([buf[4], buf[5]]),
        temp: i16::from_be_bytes([buf[6], buf[7]]),
        rx: i16::from_be_bytes([buf[8], buf[9]]),
        ry: i16::from_be_bytes([buf[10], buf[11]]),
        rz: i16::from_be_bytes([buf[12], buf[13]]),
    }
}

/// Convert raw words to physical units
///
/// Each motion axis is `(raw - offset) * scale`; the temperature word is
/// passed through raw.
pub(crate) fn to_physical(
    raw: &RawSample,
    offsets: &CalibrationOffsets,
    timestamp_ms: u64,
) -> InertialReading {
    InertialReading {
        timestamp_ms,
        accel: Vector3::new(
            convert_axis(raw.ax, offsets.ax, ACCEL_LSB_TO_MS2),
            convert_axis(raw.ay, offsets.ay, ACCEL_LSB_TO_MS2),
            convert_axis(raw.az, offsets.az, ACCEL_LSB_TO_MS2),
        ),
        gyro: Vector3::new(
            convert_axis(raw.rx, offsets.rx, GYRO_LSB_TO_RADS),
            convert_axis(raw.ry, offsets.ry, GYRO_LSB_TO_RADS),
            convert_axis(raw.rz, offsets.rz, GYRO_LSB_TO_RADS),
        ),
        temp_raw: raw.temp,
    }
}

/// Offset-subtract in i32 to avoid i16 overflow at range extremes
fn convert_axis(raw: i16, offset: i16, scale: f32) -> f32 {
    (raw as i32 - offset as i32) as f32 * scale
}

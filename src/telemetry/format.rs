//! Snapshot line formatting
//!
//! Field order, separators and precision are part of the relay wire
//! contract. Unknown values serialize as the sentinel constants below
//! rather than being omitted, so every line carries the same number of
//! fields.

use core::fmt::Write;

use crate::devices::gps::PositioningRecord;
use crate::devices::imu::InertialReading;

/// Capacity of one formatted snapshot line
pub const TELEMETRY_LINE_SIZE: usize = 192;

/// One formatted snapshot line
pub type TelemetryLine = heapless::String<TELEMETRY_LINE_SIZE>;

/// Serialized in place of an unknown latitude (real values cap at 90)
pub const LATITUDE_SENTINEL: f64 = 100.0;
/// Serialized in place of an unknown longitude (real values cap at 180)
pub const LONGITUDE_SENTINEL: f64 = 190.0;
/// Serialized in place of an unknown speed over ground
pub const SPEED_SENTINEL: f32 = -1.0;
/// Serialized in place of an unknown course over ground
pub const COURSE_SENTINEL: f32 = -1.0;
/// Serialized in place of an unknown horizontal dilution of precision
pub const HDOP_SENTINEL: f32 = 100.0;
/// Serialized in place of an unknown antenna altitude
pub const ALTITUDE_SENTINEL: f32 = -1.0;
/// Serialized in place of an unknown geoid separation
pub const ALTITUDE_REF_SENTINEL: f32 = -1.0;
/// Serialized in place of an unknown fix quality
pub const QUALITY_SENTINEL: i16 = -1;
/// Serialized in place of an unknown satellite count
pub const SATELLITES_SENTINEL: i16 = -1;

/// Format a positioning snapshot
///
/// Layout: `timestamp\tGPS\tdate,time,lat,lon,alt,speed,course,hdop,numSats`
/// with latitude and longitude at 6 decimal places, the remaining floats
/// at 2, and the satellite count as an integer. Missing date and time
/// serialize as empty strings.
pub fn format_gps_line(record: &PositioningRecord) -> TelemetryLine {
    let mut line = TelemetryLine::new();
    let date = record.fix_date.as_deref().unwrap_or("");
    let time = record.fix_time.as_deref().unwrap_or("");
    let _ = write!(
        line,
        "{}\tGPS\t{},{},{:.6},{:.6},{:.2},{:.2},{:.2},{:.2},{}",
        record.timestamp_ms,
        date,
        time,
        record.latitude.unwrap_or(LATITUDE_SENTINEL),
        record.longitude.unwrap_or(LONGITUDE_SENTINEL),
        record.altitude.unwrap_or(ALTITUDE_SENTINEL),
        record.speed_knots.unwrap_or(SPEED_SENTINEL),
        record.course_deg.unwrap_or(COURSE_SENTINEL),
        record.hdop.unwrap_or(HDOP_SENTINEL),
        record
            .satellites
            .map(i16::from)
            .unwrap_or(SATELLITES_SENTINEL),
    );
    line
}

/// Format an inertial snapshot
///
/// Layout: `timestamp\tACC\tax,ay,az,rx,ry,rz` with accelerations in
/// m/s^2, angular rates in rad/s, 4 decimal places each.
pub fn format_imu_line(reading: &InertialReading) -> TelemetryLine {
    let mut line = TelemetryLine::new();
    let _ = write!(
        line,
        "{}\tACC\t{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
        reading.timestamp_ms,
        reading.accel.x,
        reading.accel.y,
        reading.accel.z,
        reading.gyro.x,
        reading.gyro.y,
        reading.gyro.z,
    );
    line
}

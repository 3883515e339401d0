//! u-blox receiver configuration
//!
//! Builds the UBX binary frames the instrument sends at start-up: CFG-MSG
//! disables for the NMEA sentence types the decoder does not use, and
//! CFG-RATE for the reporting period. GGA and RMC stay enabled; they are
//! the two sentence types the decoder understands.
//!
//! # UBX framing
//!
//! Sync `0xB5 0x62`, class, id, 2-byte little-endian payload length,
//! payload, then a 2-byte Fletcher checksum over class through payload.
//!
//! # References
//!
//! - [u-blox M8 Receiver Description (UBX-13003221)](https://content.u-blox.com/sites/default/files/products/documents/u-blox8-M8_ReceiverDescrProtSpec_UBX-13003221.pdf)

use core::fmt;

use crate::platform::{error::PlatformError, traits::UartInterface};

/// NMEA standard message class for CFG-MSG
const NMEA_CLASS: u8 = 0xF0;
/// NMEA-GLL message id
const NMEA_GLL: u8 = 0x01;
/// NMEA-GSA message id
const NMEA_GSA: u8 = 0x02;
/// NMEA-GSV message id
const NMEA_GSV: u8 = 0x03;
/// NMEA-VTG message id
const NMEA_VTG: u8 = 0x05;

/// Rate configuration failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RateConfigError {
    /// No CFG-RATE frame exists for the requested reporting rate
    UnsupportedFrequency,
}

impl fmt::Display for RateConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateConfigError::UnsupportedFrequency => write!(f, "unsupported reporting rate"),
        }
    }
}

/// CFG-RATE frame for a supported reporting rate
///
/// Only 5 Hz and 10 Hz have a measurement period wired up; any other rate
/// is rejected and the receiver keeps its default reporting rate.
pub fn rate_frame(rate_hz: u8) -> Result<[u8; 14], RateConfigError> {
    match rate_hz {
        5 => Ok(build_cfg_rate(200)),
        10 => Ok(build_cfg_rate(100)),
        _ => Err(RateConfigError::UnsupportedFrequency),
    }
}

/// Disable the NMEA sentence types the decoder does not handle
///
/// Sends CFG-MSG rate-zero frames for VTG, GLL, GSV and GSA, in that order.
///
/// # Errors
///
/// Returns the first UART write failure; frames already written stay
/// written.
pub fn disable_default_sentences<U: UartInterface>(uart: &mut U) -> Result<(), PlatformError> {
    uart.write(&build_cfg_msg_disable(NMEA_VTG))?;
    uart.write(&build_cfg_msg_disable(NMEA_GLL))?;
    uart.write(&build_cfg_msg_disable(NMEA_GSV))?;
    uart.write(&build_cfg_msg_disable(NMEA_GSA))?;
    Ok(())
}

/// Build a UBX-CFG-RATE command
///
/// # Arguments
///
/// * `measurement_ms` - Measurement period in milliseconds (200 = 5 Hz)
pub(crate) fn build_cfg_rate(measurement_ms: u16) -> [u8; 14] {
    let mut cmd = [0u8; 14];

    // Sync chars
    cmd[0] = 0xB5;
    cmd[1] = 0x62;

    // Message class and ID for CFG-RATE
    cmd[2] = 0x06; // CFG class
    cmd[3] = 0x08; // RATE id

    // Payload length (little endian)
    cmd[4] = 6;
    cmd[5] = 0;

    // Payload: measRate (ms), navRate (cycles), timeRef (1 = GPS time)
    cmd[6..8].copy_from_slice(&measurement_ms.to_le_bytes());
    cmd[8] = 1;
    cmd[9] = 0;
    cmd[10] = 1;
    cmd[11] = 0;

    let (ck_a, ck_b) = ubx_checksum(&cmd[2..12]);
    cmd[12] = ck_a;
    cmd[13] = ck_b;

    cmd
}

/// Build a UBX-CFG-MSG command disabling one NMEA message type
///
/// Uses the 8-byte payload form carrying a rate per I/O target: zero on
/// every target, with the trailing slot fixed at 1.
///
/// # Arguments
///
/// * `msg_id` - NMEA message ID (0x01=GLL, 0x02=GSA, 0x03=GSV, 0x05=VTG)
pub(crate) fn build_cfg_msg_disable(msg_id: u8) -> [u8; 16] {
    let mut cmd = [0u8; 16];

    // Sync chars
    cmd[0] = 0xB5;
    cmd[1] = 0x62;

    // Message class and ID for CFG-MSG
    cmd[2] = 0x06; // CFG class
    cmd[3] = 0x01; // MSG id

    // Payload length (little endian)
    cmd[4] = 8;
    cmd[5] = 0;

    // Payload: msgClass, msgID, per-target rates
    cmd[6] = NMEA_CLASS;
    cmd[7] = msg_id;
    cmd[13] = 1;

    let (ck_a, ck_b) = ubx_checksum(&cmd[2..14]);
    cmd[14] = ck_a;
    cmd[15] = ck_b;

    cmd
}

/// Calculate UBX checksum (8-bit Fletcher algorithm)
pub(crate) fn ubx_checksum(data: &[u8]) -> (u8, u8) {
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;

    for &byte in data {
        ck_a = ck_a.wrapping_add(byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }

    (ck_a, ck_b)
}

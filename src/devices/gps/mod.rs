//! GPS receiver driver
//!
//! Assembles NMEA lines from a byte-oriented UART without blocking. The
//! decoder lives in [`nmea`]; the u-blox start-up commands live in
//! [`ublox`].
//!
//! # Example
//!
//! ```ignore
//! use pico_track::devices::gps::{nmea, GpsDriver};
//!
//! let mut gps = GpsDriver::new(uart);
//! let mut record = nmea::PositioningRecord::new();
//! if let Some(line) = gps.read_line()? {
//!     nmea::decode(&line, &mut record)?;
//! }
//! ```

pub mod nmea;
pub mod ublox;

pub use nmea::{decode, DecodeError, PositioningRecord};
pub use ublox::RateConfigError;

use crate::platform::{traits::UartInterface, Result};
use heapless::{String, Vec};

/// Line assembly buffer capacity
///
/// NMEA sentences are at most 82 characters; the spare absorbs receiver
/// output from before the sentence disables take effect.
pub const LINE_BUFFER_SIZE: usize = 128;

/// A complete received line, CR/LF stripped
pub type GpsLine = String<LINE_BUFFER_SIZE>;

/// GPS receiver driver
///
/// Generic over any `UartInterface`, so it runs against the mock UART on
/// the host. Bytes are pulled into a pending buffer as they arrive and
/// handed out one complete line at a time.
pub struct GpsDriver<U: UartInterface> {
    uart: U,
    pending: Vec<u8, LINE_BUFFER_SIZE>,
}

impl<U: UartInterface> GpsDriver<U> {
    /// Create a new GPS driver
    ///
    /// # Arguments
    ///
    /// * `uart` - UART interface the receiver is wired to
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            pending: Vec::new(),
        }
    }

    /// Get mutable reference to the UART interface
    ///
    /// Used for direct UART access, primarily for vendor configuration
    /// commands.
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Pull buffered bytes and return one complete line if available
    ///
    /// Never blocks: returns `Ok(None)` when no full line has arrived yet.
    /// Both `\r\n` and bare `\n` terminators are accepted and stripped. If
    /// the pending buffer fills without a terminator, its contents are
    /// discarded as garbage and assembly restarts.
    ///
    /// # Errors
    ///
    /// Returns an error if the UART read fails.
    pub fn read_line(&mut self) -> Result<Option<GpsLine>> {
        let mut chunk = [0u8; 64];
        while self.uart.available() {
            let count = self.uart.read(&mut chunk)?;
            if count == 0 {
                break;
            }
            for &byte in &chunk[..count] {
                if self.pending.push(byte).is_err() {
                    // No terminator within capacity: drop the garbage and
                    // restart assembly from this byte.
                    self.pending.clear();
                    let _ = self.pending.push(byte);
                }
            }
        }
        Ok(self.take_line())
    }

    /// Discard any partial line and flush the UART
    ///
    /// # Errors
    ///
    /// Returns an error if the UART flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.pending.clear();
        self.uart.flush()
    }

    /// Extract the first complete line from the pending buffer
    fn take_line(&mut self) -> Option<GpsLine> {
        loop {
            let newline = self.pending.iter().position(|&b| b == b'\n')?;

            let mut line = GpsLine::new();
            let valid = {
                let mut bytes = &self.pending[..newline];
                if bytes.last() == Some(&b'\r') {
                    bytes = &bytes[..bytes.len() - 1];
                }
                match core::str::from_utf8(bytes) {
                    Ok(text) => {
                        // Always fits: the line is shorter than the buffer.
                        let _ = line.push_str(text);
                        true
                    }
                    Err(_) => false,
                }
            };

            // Drop the consumed line plus its terminator.
            let remaining = self.pending.len() - (newline + 1);
            self.pending.copy_within(newline + 1.., 0);
            self.pending.truncate(remaining);

            if valid {
                return Some(line);
            }
            // Binary interleaved with the text (UBX acknowledgements):
            // skip it and try the next line.
        }
    }
}

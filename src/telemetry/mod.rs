//! Telemetry output
//!
//! Formatted snapshot lines travel to the downstream relay over a
//! secondary UART. Samplers talk to a [`TelemetrySink`], so host tests can
//! capture the traffic with [`MockTelemetry`]. Line layouts live in
//! [`format`].

pub mod format;

use crate::platform::{traits::UartInterface, Result};

/// Sink for formatted telemetry lines
///
/// Implementations append `\r\n` framing on the wire; callers pass bare
/// lines.
pub trait TelemetrySink {
    /// Send one formatted line
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying link write fails.
    fn send_line(&mut self, line: &str) -> Result<()>;
}

/// Telemetry sink over a UART link
pub struct SerialTelemetry<U: UartInterface> {
    uart: U,
}

impl<U: UartInterface> SerialTelemetry<U> {
    /// Create a new serial sink
    ///
    /// # Arguments
    ///
    /// * `uart` - UART interface wired to the relay
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    /// Get mutable reference to the UART interface
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }
}

impl<U: UartInterface> TelemetrySink for SerialTelemetry<U> {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.uart.write(line.as_bytes())?;
        self.uart.write(b"\r\n")?;
        Ok(())
    }
}

/// Handle sharing one sink between several samplers
///
/// The instrument has a single relay link but one sampler per device, each
/// owning its sink. Sampler cycles run to completion on a single core, so
/// the borrow never overlaps; this must not be used from interrupt context.
pub struct SharedSink<'a, S: TelemetrySink> {
    inner: &'a core::cell::RefCell<S>,
}

impl<'a, S: TelemetrySink> SharedSink<'a, S> {
    /// Create a handle on a shared sink
    pub fn new(inner: &'a core::cell::RefCell<S>) -> Self {
        Self { inner }
    }
}

impl<S: TelemetrySink> TelemetrySink for SharedSink<'_, S> {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.inner.borrow_mut().send_line(line)
    }
}

/// Recording sink for tests
///
/// Stores each line as sent, without the CRLF framing a real link would
/// add.
#[cfg(any(test, feature = "mock"))]
pub struct MockTelemetry {
    lines: heapless::Vec<format::TelemetryLine, 16>,
}

#[cfg(any(test, feature = "mock"))]
impl MockTelemetry {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self {
            lines: heapless::Vec::new(),
        }
    }

    /// Lines sent so far, oldest first
    pub fn lines(&self) -> &[format::TelemetryLine] {
        &self.lines
    }

    /// The most recent line, if any
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(|line| line.as_str())
    }

    /// Forget all recorded lines
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(any(test, feature = "mock"))]
impl Default for MockTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "mock"))]
impl TelemetrySink for MockTelemetry {
    fn send_line(&mut self, line: &str) -> Result<()> {
        let mut owned = format::TelemetryLine::new();
        let _ = owned.push_str(line);
        let _ = self.lines.push(owned);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockUart;
    use crate::platform::traits::UartConfig;

    #[test]
    fn test_serial_telemetry_appends_crlf() {
        let mut sink = SerialTelemetry::new(MockUart::new(UartConfig::telemetry()));
        sink.send_line("123\tACC\t0.0000").unwrap();

        assert_eq!(
            sink.uart_mut().tx_buffer().as_slice(),
            b"123\tACC\t0.0000\r\n"
        );
    }

    #[test]
    fn test_serial_telemetry_propagates_write_failure() {
        let mut sink = SerialTelemetry::new(MockUart::new(UartConfig::telemetry()));
        sink.uart_mut().set_fail_writes(true);
        assert!(sink.send_line("line").is_err());
    }

    #[test]
    fn test_mock_telemetry_records_lines_in_order() {
        let mut sink = MockTelemetry::new();
        sink.send_line("first").unwrap();
        sink.send_line("second").unwrap();

        assert_eq!(sink.lines().len(), 2);
        assert_eq!(sink.lines()[0].as_str(), "first");
        assert_eq!(sink.last(), Some("second"));

        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_shared_sink_interleaves_on_one_link() {
        let shared = core::cell::RefCell::new(MockTelemetry::new());
        let mut gps_handle = SharedSink::new(&shared);
        let mut imu_handle = SharedSink::new(&shared);

        gps_handle.send_line("gps").unwrap();
        imu_handle.send_line("imu").unwrap();
        gps_handle.send_line("gps").unwrap();

        let sink = shared.borrow();
        assert_eq!(sink.lines().len(), 3);
        assert_eq!(sink.lines()[1].as_str(), "imu");
    }
}

//! Mock I2C implementation for testing

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::{I2cConfig, I2cInterface},
    Result,
};
use core::cell::{Cell, RefCell};
use heapless::Vec;

/// Maximum bytes recorded per write transaction
const WRITE_LOG_SIZE: usize = 16;

/// Maximum number of transactions kept in the log
const TRANSACTION_LOG_SIZE: usize = 32;

/// Capacity of the scripted read-data queue
const READ_DATA_SIZE: usize = 64;

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    /// Write transaction
    Write {
        addr: u8,
        data: Vec<u8, WRITE_LOG_SIZE>,
    },
    /// Read transaction
    Read { addr: u8, len: usize },
    /// Write-Read transaction
    WriteRead {
        addr: u8,
        write_data: Vec<u8, WRITE_LOG_SIZE>,
        read_len: usize,
    },
}

/// Mock I2C implementation
///
/// Records all transactions for test verification and allows
/// pre-programming expected read data. Bus faults can be injected
/// to exercise error paths.
#[derive(Debug)]
pub struct MockI2c {
    config: I2cConfig,
    transactions: RefCell<Vec<I2cTransaction, TRANSACTION_LOG_SIZE>>,
    read_data: RefCell<Vec<u8, READ_DATA_SIZE>>,
    fail_transactions: Cell<bool>,
}

impl MockI2c {
    /// Create a new mock I2C
    pub fn new(config: I2cConfig) -> Self {
        Self {
            config,
            transactions: RefCell::new(Vec::new()),
            read_data: RefCell::new(Vec::new()),
            fail_transactions: Cell::new(false),
        }
    }

    /// Get transaction log (for test verification)
    pub fn transactions(&self) -> Vec<I2cTransaction, TRANSACTION_LOG_SIZE> {
        self.transactions.borrow().clone()
    }

    /// Clear transaction log
    pub fn clear_transactions(&mut self) {
        self.transactions.borrow_mut().clear();
    }

    /// Set data to return for read operations
    pub fn set_read_data(&mut self, data: &[u8]) {
        let mut queue = self.read_data.borrow_mut();
        queue.clear();
        for &byte in data {
            if queue.push(byte).is_err() {
                break;
            }
        }
    }

    /// Make all subsequent transactions fail with a bus error (for test setup)
    pub fn set_fail_transactions(&mut self, fail: bool) {
        self.fail_transactions.set(fail);
    }

    /// Get current frequency
    pub fn frequency(&self) -> u32 {
        self.config.frequency
    }

    fn log(&self, transaction: I2cTransaction) {
        let _ = self.transactions.borrow_mut().push(transaction);
    }

    fn fill_from_read_data(&self, buffer: &mut [u8]) {
        let mut read_data = self.read_data.borrow_mut();
        let to_read = core::cmp::min(buffer.len(), read_data.len());
        buffer[..to_read].copy_from_slice(&read_data[..to_read]);
        let remaining = read_data.len() - to_read;
        read_data.copy_within(to_read.., 0);
        read_data.truncate(remaining);
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        if self.fail_transactions.get() {
            return Err(PlatformError::I2c(I2cError::BusError));
        }

        let mut logged = Vec::new();
        let _ = logged.extend_from_slice(data);
        self.log(I2cTransaction::Write { addr, data: logged });
        Ok(())
    }

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        if self.fail_transactions.get() {
            return Err(PlatformError::I2c(I2cError::BusError));
        }

        self.log(I2cTransaction::Read {
            addr,
            len: buffer.len(),
        });
        self.fill_from_read_data(buffer);
        Ok(())
    }

    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()> {
        if self.fail_transactions.get() {
            return Err(PlatformError::I2c(I2cError::BusError));
        }

        let mut logged = Vec::new();
        let _ = logged.extend_from_slice(write_data);
        self.log(I2cTransaction::WriteRead {
            addr,
            write_data: logged,
            read_len: read_buffer.len(),
        });
        self.fill_from_read_data(read_buffer);
        Ok(())
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        self.config.frequency = frequency;
        Ok(())
    }
}

use embedded_io::{Read, ReadReady, Write};
use heapless::Vec;

use crate::log;

/// Byte stream the reader consumes input from and echoes to
pub trait Transport {
    /// Whether a byte can be read without blocking
    fn available(&mut self) -> bool;

    /// Read one byte, `None` if nothing is available
    fn read_byte(&mut self) -> Option<u8>;

    /// Write one byte
    fn write_byte(&mut self, byte: u8);

    /// Write all of `bytes`
    fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }
}

/// Transport over a blocking `embedded-io` serial port
pub struct Serial<T> {
    port: T,
}

impl<T> Serial<T> {
    /// Wrap a serial port
    pub fn new(port: T) -> Self {
        Self { port }
    }

    /// Get a reference to the wrapped port
    pub fn port(&self) -> &T {
        &self.port
    }

    /// Get a mutable reference to the wrapped port
    pub fn port_mut(&mut self) -> &mut T {
        &mut self.port
    }

    /// Release the wrapped port
    pub fn into_inner(self) -> T {
        self.port
    }
}

impl<T: Read + ReadReady + Write> Transport for Serial<T> {
    fn available(&mut self) -> bool {
        self.port.read_ready().unwrap_or(false)
    }

    fn read_byte(&mut self) -> Option<u8> {
        if !self.available() {
            return None;
        }
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write_byte(&mut self, byte: u8) {
        self.write_bytes(&[byte]);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        // Echo is best effort
        if self.port.write_all(bytes).is_err() {
            log::debug!("serial write failed, {} bytes dropped", bytes.len());
        }
    }
}

/// Output-only transport queueing echo for an async writer
pub struct EchoBuffer<const N: usize> {
    pending: Vec<u8, N>,
}

impl<const N: usize> EchoBuffer<N> {
    /// Create an empty echo buffer
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Bytes waiting to be flushed
    pub fn as_bytes(&self) -> &[u8] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Discard queued bytes
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<const N: usize> Default for EchoBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Transport for EchoBuffer<N> {
    fn available(&mut self) -> bool {
        false
    }

    fn read_byte(&mut self) -> Option<u8> {
        None
    }

    fn write_byte(&mut self, byte: u8) {
        if self.pending.push(byte).is_err() {
            log::debug!("echo buffer full, byte dropped");
        }
    }
}

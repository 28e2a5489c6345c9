use core::fmt;

use embedded_io_async::ErrorKind;

/// Errors that can occur while driving a reader from async I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveError {
    /// Reading input failed
    Read(ErrorKind),
    /// Flushing echo failed
    Write(ErrorKind),
    /// The input returned no data
    EndOfFile,
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::Read(kind) => write!(f, "read failed: {:?}", kind),
            DriveError::Write(kind) => write!(f, "write failed: {:?}", kind),
            DriveError::EndOfFile => f.write_str("end of input"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DriveError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DriveError::Read(_) => defmt::write!(f, "Read"),
            DriveError::Write(_) => defmt::write!(f, "Write"),
            DriveError::EndOfFile => defmt::write!(f, "EndOfFile"),
        }
    }
}

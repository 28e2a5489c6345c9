#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

//! Non-blocking input reader for character consoles on `no_std` systems.
//!
//! This crate reads letters, words, lines and bounded hex/decimal numbers
//! one byte at a time, echoing edits to the console and reporting each
//! finished input through a callback.

extern crate alloc;

pub mod driver;
pub mod error;
pub mod format;
pub mod key;
mod log;
pub mod mode;
pub mod reader;
pub mod transport;

#[cfg(test)]
pub(crate) mod testlib;

pub use driver::{ReaderTask, MIN_ECHO};
pub use error::DriveError;
pub use format::Formatter;
pub use mode::{Radix, Reason};
pub use reader::Reader;
pub use transport::{EchoBuffer, Serial, Transport};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::format::Formatter;
    pub use crate::mode::{Radix, Reason};
    pub use crate::reader::Reader;
    pub use crate::transport::{EchoBuffer, Serial, Transport};
}

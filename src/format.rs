use core::fmt::{self, Write as _};

use heapless::String;

use crate::mode::Radix;
use crate::transport::Transport;

/// Visual backspace: move back, blank the cell, move back again
pub const ERASE: &[u8] = b"\x08 \x08";

/// Line terminator written by the `println` family
pub const NEWLINE: &[u8] = b"\r\n";

/// Number of digits of `value` in `radix`; zero has one digit
pub fn digits(value: u32, radix: Radix) -> u8 {
    let base = radix.base();
    let mut value = value;
    let mut n = 1;
    while value >= base {
        value /= base;
        n += 1;
    }
    n
}

/// Padded number and text output on top of a [`Transport`]
pub struct Formatter<'a, T: Transport> {
    transport: &'a mut T,
}

impl<'a, T: Transport> Formatter<'a, T> {
    /// Create a new formatter writing to `transport`
    pub fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        self.transport.write_bytes(bytes);
        bytes.len()
    }

    /// Write a newline
    pub fn println(&mut self) -> usize {
        self.write_bytes(NEWLINE)
    }

    /// Print `value` in zero-padded uppercase hexadecimal of `width` chars.
    ///
    /// A negative `width` left-aligns the value and pads with spaces instead.
    pub fn print_hex(&mut self, value: u32, width: i8) -> usize {
        let mut text = String::<8>::new();
        write!(&mut text, "{:X}", value).ok();
        self.print_padded(&text, width, b'0')
    }

    /// Print `value` in right-aligned decimal of `width` chars.
    ///
    /// A negative `width` left-aligns the value.
    pub fn print_dec(&mut self, value: u32, width: i8) -> usize {
        let mut text = String::<10>::new();
        write!(&mut text, "{}", value).ok();
        self.print_padded(&text, width, b' ')
    }

    /// Print `text` right-aligned in `width` chars; negative `width` left-aligns
    pub fn print_str(&mut self, text: &str, width: i8) -> usize {
        self.print_padded(text, width, b' ')
    }

    /// [`print_hex`](Self::print_hex) followed by a newline
    pub fn println_hex(&mut self, value: u32, width: i8) -> usize {
        self.print_hex(value, width) + self.println()
    }

    /// [`print_dec`](Self::print_dec) followed by a newline
    pub fn println_dec(&mut self, value: u32, width: i8) -> usize {
        self.print_dec(value, width) + self.println()
    }

    /// [`print_str`](Self::print_str) followed by a newline
    pub fn println_str(&mut self, text: &str, width: i8) -> usize {
        self.print_str(text, width) + self.println()
    }

    /// Print `value` in the canonical form of a number input: `width` digits,
    /// zero-padded for hex and space-padded for decimal
    pub fn print_number(&mut self, value: u32, radix: Radix, width: u8) -> usize {
        let width = width.min(i8::MAX as u8) as i8;
        match radix {
            Radix::Hex => self.print_hex(value, width),
            Radix::Dec => self.print_dec(value, width),
        }
    }

    /// Erase `n` characters in place
    pub fn backspace(&mut self, n: usize) -> usize {
        (0..n).map(|_| self.write_bytes(ERASE)).sum()
    }

    fn print_padded(&mut self, text: &str, width: i8, pad: u8) -> usize {
        let len = text.len();
        let width = width as isize;
        let mut size = 0;
        if width > 0 {
            size += self.repeat(pad, (width as usize).saturating_sub(len));
        }
        size += self.write_bytes(text.as_bytes());
        if width < 0 {
            size += self.repeat(b' ', width.unsigned_abs().saturating_sub(len));
        }
        size
    }

    fn repeat(&mut self, byte: u8, n: usize) -> usize {
        for _ in 0..n {
            self.transport.write_byte(byte);
        }
        n
    }
}

impl<T: Transport> fmt::Write for Formatter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

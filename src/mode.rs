use heapless::String;

use crate::format::digits;

/// What terminated an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reason {
    /// Input accepted, terminated by space; more tokens may follow
    Space,
    /// Input accepted, terminated by newline
    Newline,
    /// Backspace on an empty input; go back to the previous step
    Delete,
    /// The whole input was canceled
    Cancel,
}

/// Radix of a number input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Radix {
    Dec,
    Hex,
}

impl Radix {
    /// Numeric base
    pub const fn base(self) -> u32 {
        match self {
            Radix::Dec => 10,
            Radix::Hex => 16,
        }
    }

    /// Value of `byte` as a digit in this radix
    pub fn digit(self, byte: u8) -> Option<u8> {
        (byte as char).to_digit(self.base()).map(|d| d as u8)
    }
}

/// Accumulation state of a word or line input
#[derive(Debug, Clone)]
pub struct TextState<const N: usize> {
    buffer: String<N>,
    limit: usize,
    word: bool,
}

impl<const N: usize> TextState<N> {
    /// Create an empty text state.
    ///
    /// `capacity` counts one reserved terminator slot, so at most
    /// `capacity - 1` characters are accepted, and never more than `N`.
    pub fn new(capacity: usize, word: bool) -> Self {
        Self {
            buffer: String::new(),
            limit: capacity.saturating_sub(1).min(N),
            word,
        }
    }

    /// Create a text state pre-seeded with `default`.
    ///
    /// Bytes that could not have been typed are skipped and the default is
    /// truncated to the capacity.
    pub fn with_default(capacity: usize, word: bool, default: &str) -> Self {
        let mut state = Self::new(capacity, word);
        for byte in default.bytes() {
            if state.is_full() {
                break;
            }
            if word && byte == b' ' {
                continue;
            }
            state.push(byte);
        }
        state
    }

    /// Append a printable byte. Returns false if it was refused.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() || !(0x20..=0x7E).contains(&byte) {
            return false;
        }
        self.buffer.push(byte as char).is_ok()
    }

    /// Remove the last character. Returns false if the buffer was empty.
    pub fn pop(&mut self) -> bool {
        self.buffer.pop().is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.limit
    }

    /// Maximum number of characters this input accepts
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Word inputs terminate on space as well as newline
    pub fn is_word(&self) -> bool {
        self.word
    }
}

/// Accumulation state of a number input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberState {
    value: u32,
    typed: u8,
    max_digits: u8,
    radix: Radix,
    limit: u32,
}

impl NumberState {
    /// Create an empty number state accepting values up to `limit`
    pub fn new(radix: Radix, limit: u32) -> Self {
        Self {
            value: 0,
            typed: 0,
            max_digits: digits(limit, radix),
            radix,
            limit,
        }
    }

    /// Create a number state holding `default`, clamped to `limit`.
    ///
    /// The default counts as fully typed, so it has to be erased before
    /// new digits are accepted.
    pub fn with_default(radix: Radix, limit: u32, default: u32) -> Self {
        let mut state = Self::new(radix, limit);
        state.value = default.min(limit);
        state.typed = state.max_digits;
        state
    }

    /// Check whether `digit` can be appended without exceeding the limit.
    ///
    /// Decided before multiplying, so the value never exceeds `limit`.
    pub fn accepts(&self, digit: u8) -> bool {
        if self.typed >= self.max_digits {
            return false;
        }
        let base = self.radix.base();
        let digit = digit as u32;
        if digit >= base {
            return false;
        }
        let bound = self.limit / base;
        self.value < bound || (self.value == bound && digit <= self.limit % base)
    }

    /// Append a digit byte.
    ///
    /// Returns the character to echo (hex letters are uppercased), or `None`
    /// if the byte is not a digit or would exceed the limit.
    pub fn push(&mut self, byte: u8) -> Option<u8> {
        let digit = self.radix.digit(byte)?;
        if !self.accepts(digit) {
            return None;
        }
        self.value = self.value * self.radix.base() + digit as u32;
        self.typed += 1;
        Some(byte.to_ascii_uppercase())
    }

    /// Erase the last digit. Returns false if nothing was typed.
    pub fn pop(&mut self) -> bool {
        if self.typed == 0 {
            return false;
        }
        self.value /= self.radix.base();
        self.typed -= 1;
        true
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn digits_typed(&self) -> u8 {
        self.typed
    }

    pub fn max_digits(&self) -> u8 {
        self.max_digits
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

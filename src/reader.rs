use alloc::boxed::Box;
use core::mem;

use crate::format::{Formatter, NEWLINE};
use crate::key::Key;
use crate::log;
use crate::mode::{NumberState, Radix, Reason, TextState};
use crate::transport::Transport;

/// Echo of a canceled input
pub const CANCEL_ECHO: &[u8] = b" cancel\r\n";

/// Completion of [`Reader::read_letter`]
pub type LetterCallback<T, const N: usize> = Box<dyn FnOnce(&mut Reader<T, N>, u8)>;

/// Completion of [`Reader::read_word`] and [`Reader::read_line`]
pub type TextCallback<T, const N: usize> = Box<dyn FnOnce(&mut Reader<T, N>, &str, Reason)>;

/// Completion of [`Reader::read_hex`] and [`Reader::read_dec`]
pub type NumberCallback<T, const N: usize> = Box<dyn FnOnce(&mut Reader<T, N>, u32, Reason)>;

/// The pending input and the callback that completes it
enum Mode<T, const N: usize> {
    Idle,
    Letter(LetterCallback<T, N>),
    Text(TextState<N>, TextCallback<T, N>),
    Number(NumberState, NumberCallback<T, N>),
}

/// Incremental input reader for a character console.
///
/// A `read_*` call arms the reader, then every input byte is handed to
/// [`consume_byte`](Self::consume_byte) (or pulled by [`poll`](Self::poll)).
/// Typed characters are echoed to the transport, and once the input is
/// complete the callback runs exactly once. The reader is idle again by the
/// time the callback runs, so the callback may arm it for the next input.
///
/// `N` is the size of the text buffer used by word and line inputs.
pub struct Reader<T, const N: usize> {
    transport: T,
    mode: Mode<T, N>,
}

impl<T: Transport, const N: usize> Reader<T, N> {
    /// Create an idle reader on top of `transport`
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            mode: Mode::Idle,
        }
    }

    /// Get a reference to the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport, dropping any pending input
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Formatted output to the console
    pub fn formatter(&mut self) -> Formatter<'_, T> {
        Formatter::new(&mut self.transport)
    }

    /// Whether no input is pending
    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Idle)
    }

    /// Text typed so far, if a word or line input is pending
    pub fn pending_text(&self) -> Option<&str> {
        match &self.mode {
            Mode::Text(state, _) => Some(state.as_str()),
            _ => None,
        }
    }

    /// Number typed so far, if a number input is pending
    pub fn pending_number(&self) -> Option<&NumberState> {
        match &self.mode {
            Mode::Number(state, _) => Some(state),
            _ => None,
        }
    }

    /// Drop the pending input without running its callback
    pub fn cancel_pending(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Read a single letter
    pub fn read_letter<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut Self, u8) + 'static,
    {
        log::trace!("read letter");
        self.mode = Mode::Letter(Box::new(callback));
    }

    /// Read a word terminated by space or newline.
    ///
    /// `capacity` includes one reserved slot, so at most `capacity - 1`
    /// characters are accepted.
    pub fn read_word<F>(&mut self, capacity: usize, callback: F)
    where
        F: FnOnce(&mut Self, &str, Reason) + 'static,
    {
        self.arm_text(TextState::new(capacity, true), Box::new(callback));
    }

    /// Read a word, starting from an editable `default`
    pub fn read_word_with_default<F>(&mut self, capacity: usize, default: &str, callback: F)
    where
        F: FnOnce(&mut Self, &str, Reason) + 'static,
    {
        let state = TextState::with_default(capacity, true, default);
        self.transport.write_bytes(state.as_str().as_bytes());
        self.arm_text(state, Box::new(callback));
    }

    /// Read a line terminated by newline.
    ///
    /// `capacity` includes one reserved slot, so at most `capacity - 1`
    /// characters are accepted.
    pub fn read_line<F>(&mut self, capacity: usize, callback: F)
    where
        F: FnOnce(&mut Self, &str, Reason) + 'static,
    {
        self.arm_text(TextState::new(capacity, false), Box::new(callback));
    }

    /// Read a line, starting from an editable `default`
    pub fn read_line_with_default<F>(&mut self, capacity: usize, default: &str, callback: F)
    where
        F: FnOnce(&mut Self, &str, Reason) + 'static,
    {
        let state = TextState::with_default(capacity, false, default);
        self.transport.write_bytes(state.as_str().as_bytes());
        self.arm_text(state, Box::new(callback));
    }

    /// Read a hexadecimal number less than or equal to `limit`
    pub fn read_hex<F>(&mut self, limit: u32, callback: F)
    where
        F: FnOnce(&mut Self, u32, Reason) + 'static,
    {
        self.arm_number(NumberState::new(Radix::Hex, limit), Box::new(callback));
    }

    /// Read a hexadecimal number, starting from an editable `default`
    pub fn read_hex_with_default<F>(&mut self, limit: u32, default: u32, callback: F)
    where
        F: FnOnce(&mut Self, u32, Reason) + 'static,
    {
        let state = NumberState::with_default(Radix::Hex, limit, default);
        self.render_number(&state);
        self.arm_number(state, Box::new(callback));
    }

    /// Read a decimal number less than or equal to `limit`
    pub fn read_dec<F>(&mut self, limit: u32, callback: F)
    where
        F: FnOnce(&mut Self, u32, Reason) + 'static,
    {
        self.arm_number(NumberState::new(Radix::Dec, limit), Box::new(callback));
    }

    /// Read a decimal number, starting from an editable `default`
    pub fn read_dec_with_default<F>(&mut self, limit: u32, default: u32, callback: F)
    where
        F: FnOnce(&mut Self, u32, Reason) + 'static,
    {
        let state = NumberState::with_default(Radix::Dec, limit, default);
        self.render_number(&state);
        self.arm_number(state, Box::new(callback));
    }

    /// Consume one byte from the transport if one is available.
    ///
    /// Meant to be called from the main loop; returns whether a byte was
    /// consumed.
    pub fn poll(&mut self) -> bool {
        if !self.transport.available() {
            return false;
        }
        match self.transport.read_byte() {
            Some(byte) => {
                self.consume_byte(byte);
                true
            }
            None => false,
        }
    }

    /// Process a single byte of input
    pub fn consume_byte(&mut self, byte: u8) {
        let key = Key::from_byte(byte);
        match mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => {}
            Mode::Letter(callback) => {
                log::trace!("letter done");
                callback(self, byte);
            }
            Mode::Text(state, callback) => self.process_text(key, state, callback),
            Mode::Number(state, callback) => self.process_number(key, state, callback),
        }
    }

    fn arm_text(&mut self, state: TextState<N>, callback: TextCallback<T, N>) {
        log::trace!("read text, word={}, limit={}", state.is_word(), state.limit());
        self.mode = Mode::Text(state, callback);
    }

    fn arm_number(&mut self, state: NumberState, callback: NumberCallback<T, N>) {
        log::trace!("read number, radix={}, limit={}", state.radix(), state.limit());
        self.mode = Mode::Number(state, callback);
    }

    fn render_number(&mut self, state: &NumberState) {
        self.formatter()
            .print_number(state.value(), state.radix(), state.max_digits());
    }

    fn process_text(&mut self, key: Key, mut state: TextState<N>, callback: TextCallback<T, N>) {
        let reason = match key {
            Key::Newline => {
                // Nothing to terminate in an empty word
                if state.is_word() && state.is_empty() {
                    None
                } else {
                    self.transport.write_bytes(NEWLINE);
                    Some(Reason::Newline)
                }
            }
            Key::Space if state.is_word() => {
                if state.is_empty() {
                    None
                } else {
                    self.transport.write_byte(b' ');
                    Some(Reason::Space)
                }
            }
            Key::Backspace => {
                if state.pop() {
                    self.formatter().backspace(1);
                    None
                } else if state.is_word() {
                    Some(Reason::Delete)
                } else {
                    None
                }
            }
            Key::Cancel => {
                self.transport.write_bytes(CANCEL_ECHO);
                Some(Reason::Cancel)
            }
            _ => {
                if let Some(byte) = key.printable() {
                    if state.push(byte) {
                        self.transport.write_byte(byte);
                    }
                }
                None
            }
        };

        match reason {
            Some(reason) => {
                log::trace!("text done: {}", reason);
                callback(self, state.as_str(), reason);
            }
            None => self.mode = Mode::Text(state, callback),
        }
    }

    fn process_number(
        &mut self,
        key: Key,
        mut state: NumberState,
        callback: NumberCallback<T, N>,
    ) {
        let reason = match key {
            Key::Char(byte) => {
                if let Some(echo) = state.push(byte) {
                    self.transport.write_byte(echo);
                }
                None
            }
            Key::Backspace => {
                if state.pop() {
                    self.formatter().backspace(1);
                    None
                } else {
                    Some(Reason::Delete)
                }
            }
            Key::Space | Key::Newline if state.digits_typed() > 0 => {
                let mut out = self.formatter();
                out.backspace(state.digits_typed() as usize);
                out.print_number(state.value(), state.radix(), state.max_digits());
                if key == Key::Newline {
                    out.println();
                    Some(Reason::Newline)
                } else {
                    out.write_bytes(b" ");
                    Some(Reason::Space)
                }
            }
            Key::Cancel => {
                self.transport.write_bytes(CANCEL_ECHO);
                Some(Reason::Cancel)
            }
            _ => None,
        };

        match reason {
            Some(reason) => {
                log::trace!("number done: {=u32}, {}", state.value(), reason);
                callback(self, state.value(), reason);
            }
            None => self.mode = Mode::Number(state, callback),
        }
    }
}

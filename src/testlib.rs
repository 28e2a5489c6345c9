use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use crate::mode::Reason;
use crate::transport::Transport;

/// Scripted console: queued input, captured output
#[derive(Default)]
pub struct FakeConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl FakeConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: &[u8]) {
        self.input.extend(input.iter().copied());
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Return the captured output and forget it
    pub fn take_output(&mut self) -> String {
        let text = self.output_str();
        self.output.clear();
        text
    }
}

impl Transport for FakeConsole {
    fn available(&mut self) -> bool {
        !self.input.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }
}

/// Blocking `embedded-io` port backed by memory
pub struct FakePort {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl FakePort {
    pub fn with_input(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }
}

impl embedded_io::ErrorType for FakePort {
    type Error = core::convert::Infallible;
}

impl embedded_io::Read for FakePort {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.input.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for FakePort {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.input.is_empty())
    }
}

impl embedded_io::Write for FakePort {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl embedded_io_async::Read for FakePort {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        embedded_io::Read::read(self, buf)
    }
}

impl embedded_io_async::Write for FakePort {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        embedded_io::Write::write(self, buf)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Async input that never produces a byte
pub struct Silent;

impl embedded_io_async::ErrorType for Silent {
    type Error = core::convert::Infallible;
}

impl embedded_io_async::Read for Silent {
    async fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        core::future::pending().await
    }
}

/// Completions observed by callbacks under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Letter(u8),
    Text(String, Reason),
    Number(u32, Reason),
}

/// Shared log of completions that callbacks can capture
#[derive(Clone, Default)]
pub struct Recorder {
    completions: Rc<RefCell<Vec<Completion>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, completion: Completion) {
        self.completions.borrow_mut().push(completion);
    }

    pub fn letter(&self, letter: u8) {
        self.push(Completion::Letter(letter));
    }

    pub fn text(&self, text: &str, reason: Reason) {
        self.push(Completion::Text(text.into(), reason));
    }

    pub fn number(&self, value: u32, reason: Reason) {
        self.push(Completion::Number(value, reason));
    }

    pub fn completions(&self) -> Vec<Completion> {
        self.completions.borrow().clone()
    }
}

pub fn text(text: &str, reason: Reason) -> Completion {
    Completion::Text(text.into(), reason)
}

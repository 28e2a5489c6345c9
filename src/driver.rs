use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embedded_io_async::{Error as _, Read, Write};

use crate::error::DriveError;
use crate::format::{ERASE, NEWLINE};
use crate::log;
use crate::reader::Reader;
use crate::transport::EchoBuffer;

/// Worst-case echo of one input byte: erasing and re-rendering a ten-digit
/// decimal followed by a newline
pub const MIN_ECHO: usize = 10 * ERASE.len() + 10 + NEWLINE.len();

/// Async task feeding a [`Reader`] from an input stream.
///
/// Echo is queued in an [`EchoBuffer`] of `E` bytes and flushed to the
/// output after every consumed byte; echo beyond `E` is dropped. A single
/// byte can produce up to [`MIN_ECHO`] bytes of echo (completing a ten-digit
/// decimal), so `E` should be at least that, plus the longest default a
/// completion callback renders when it arms the next input.
pub struct ReaderTask<const E: usize, const N: usize> {
    reader: Reader<EchoBuffer<E>, N>,
}

impl<const E: usize, const N: usize> ReaderTask<E, N> {
    /// Create a task with an idle reader
    pub fn new() -> Self {
        Self {
            reader: Reader::new(EchoBuffer::new()),
        }
    }

    /// Get the reader, e.g. to arm it before [`run`](Self::run)
    pub fn reader(&mut self) -> &mut Reader<EchoBuffer<E>, N> {
        &mut self.reader
    }

    /// Feed input to the reader until it goes idle.
    ///
    /// Returns once a completion callback finishes without arming the
    /// reader again, or when `stop` is signalled.
    pub async fn run<R, W, M>(
        &mut self,
        input: &mut R,
        output: &mut W,
        stop: Option<&Signal<M, ()>>,
    ) -> Result<(), DriveError>
    where
        R: Read,
        W: Write,
        M: RawMutex,
    {
        // A default may already be rendered
        self.flush(output).await?;

        let mut byte_buf = [0u8; 1];

        while !self.reader.is_idle() {
            let read = if let Some(signal) = stop {
                match select(input.read(&mut byte_buf), signal.wait()).await {
                    Either::First(read) => read,
                    Either::Second(_) => {
                        log::debug!("reader task stopped");
                        signal.reset();
                        return Ok(());
                    }
                }
            } else {
                input.read(&mut byte_buf).await
            };

            match read {
                Ok(0) => return Err(DriveError::EndOfFile),
                Ok(_) => self.reader.consume_byte(byte_buf[0]),
                Err(e) => return Err(DriveError::Read(e.kind())),
            }

            self.flush(output).await?;
        }

        Ok(())
    }

    async fn flush<W: Write>(&mut self, output: &mut W) -> Result<(), DriveError> {
        let echo = self.reader.transport_mut();
        if echo.is_empty() {
            return Ok(());
        }
        output
            .write_all(echo.as_bytes())
            .await
            .map_err(|e| DriveError::Write(e.kind()))?;
        echo.clear();
        output.flush().await.map_err(|e| DriveError::Write(e.kind()))
    }
}

impl<const E: usize, const N: usize> Default for ReaderTask<E, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Reason;
    use crate::testlib::{text, Completion, FakePort, Recorder, Silent};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    type Task = ReaderTask<64, 16>;

    fn read_words(reader: &mut Reader<EchoBuffer<64>, 16>, recorder: Recorder) {
        reader.read_word(16, move |reader, word, reason| {
            recorder.text(word, reason);
            if reason == Reason::Space {
                read_words(reader, recorder);
            }
        });
    }

    #[test]
    fn test_run_until_idle() {
        let mut task = Task::new();
        let recorder = Recorder::new();
        read_words(task.reader(), recorder.clone());

        let mut input = FakePort::with_input(b"ab cd\nef");
        let mut output = FakePort::with_input(b"");
        let result = block_on(task.run(&mut input, &mut output, None::<&Signal<NoopRawMutex, ()>>));

        assert_eq!(result, Ok(()));
        assert_eq!(
            recorder.completions(),
            [text("ab", Reason::Space), text("cd", Reason::Newline)]
        );
        assert_eq!(output.output(), b"ab cd\r\n");
        assert!(task.reader().is_idle());
    }

    #[test]
    fn test_run_flushes_default() {
        let mut task = Task::new();
        let recorder = Recorder::new();
        let rec = recorder.clone();
        task.reader()
            .read_hex_with_default(0xFF, 0xAB, move |_, value, reason| rec.number(value, reason));

        let mut input = FakePort::with_input(b"\n");
        let mut output = FakePort::with_input(b"");
        let result = block_on(task.run(&mut input, &mut output, None::<&Signal<NoopRawMutex, ()>>));

        assert_eq!(result, Ok(()));
        assert_eq!(recorder.completions(), [Completion::Number(0xAB, Reason::Newline)]);
        assert_eq!(output.output(), b"AB\x08 \x08\x08 \x08AB\r\n");
    }

    #[test]
    fn test_min_echo_fits_largest_decimal() {
        assert_eq!(MIN_ECHO, 42);
        let mut task = ReaderTask::<MIN_ECHO, 16>::new();
        let recorder = Recorder::new();
        let rec = recorder.clone();
        task.reader()
            .read_dec(u32::MAX, move |_, value, reason| rec.number(value, reason));

        let mut input = FakePort::with_input(b"4294967295\n");
        let mut output = FakePort::with_input(b"");
        let result = block_on(task.run(&mut input, &mut output, None::<&Signal<NoopRawMutex, ()>>));

        assert_eq!(result, Ok(()));
        assert_eq!(recorder.completions(), [Completion::Number(u32::MAX, Reason::Newline)]);
        let mut expected = b"4294967295".to_vec();
        for _ in 0..10 {
            expected.extend_from_slice(ERASE);
        }
        expected.extend_from_slice(b"4294967295\r\n");
        assert_eq!(output.output(), &expected[..]);
    }

    #[test]
    fn test_run_reports_end_of_input() {
        let mut task = Task::new();
        task.reader().read_dec(100, |_, _, _| {});

        let mut input = FakePort::with_input(b"4");
        let mut output = FakePort::with_input(b"");
        let result = block_on(task.run(&mut input, &mut output, None::<&Signal<NoopRawMutex, ()>>));

        assert_eq!(result, Err(DriveError::EndOfFile));
        assert_eq!(output.output(), b"4");
    }

    #[test]
    fn test_run_stops_on_signal() {
        let mut task = Task::new();
        task.reader().read_line(16, |_, _, _| {});

        let stop = Signal::<NoopRawMutex, ()>::new();
        stop.signal(());
        let mut output = FakePort::with_input(b"");
        let result = block_on(task.run(&mut Silent, &mut output, Some(&stop)));

        assert_eq!(result, Ok(()));
        assert!(!task.reader().is_idle());
        assert!(!stop.signaled());
    }

    #[test]
    fn test_idle_reader_returns_immediately() {
        let mut task = Task::new();
        let mut output = FakePort::with_input(b"");
        let result = block_on(task.run(&mut Silent, &mut output, None::<&Signal<NoopRawMutex, ()>>));
        assert_eq!(result, Ok(()));
    }
}

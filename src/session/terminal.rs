//! Line-oriented terminal I/O used by interactive sessions
//!
//! The session never touches stdin/stdout directly. It talks to a [`Terminal`],
//! which lets the binary use the real console while tests drive a session
//! from an in-memory script.

use crate::error::{PropwizardError, Result};
use std::io::{self, BufRead, Cursor, Write};

/// Blocking, line-oriented terminal used to ask questions and read answers
pub trait Terminal {
    /// Write `text` without a trailing line break
    fn write(&mut self, text: &str) -> Result<()>;

    /// Write `text` followed by a line break
    fn write_line(&mut self, text: &str) -> Result<()>;

    /// Read one line of input, without its line terminator
    fn read_line(&mut self) -> Result<String>;

    /// Read one line of input that must not be echoed back
    fn read_secret(&mut self) -> Result<String>;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn write(&mut self, text: &str) -> Result<()> {
        (**self).write(text)
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        (**self).write_line(text)
    }

    fn read_line(&mut self) -> Result<String> {
        (**self).read_line()
    }

    fn read_secret(&mut self) -> Result<String> {
        (**self).read_secret()
    }
}

/// Strip a single trailing `\n` or `\r\n`, leaving everything else untouched
fn strip_line_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Terminal backed by the process console
///
/// Secret answers are read through `rpassword`, so they are never echoed.
#[derive(Debug, Default)]
pub struct ConsoleTerminal;

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl Terminal for ConsoleTerminal {
    fn write(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| PropwizardError::terminal(format!("Failed to write to console: {e}")))
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")
            .and_then(|_| stdout.flush())
            .map_err(|e| PropwizardError::terminal(format!("Failed to write to console: {e}")))
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| PropwizardError::terminal(format!("Failed to read from console: {e}")))?;

        if read == 0 {
            return Err(PropwizardError::InputClosed);
        }

        Ok(strip_line_terminator(line))
    }

    fn read_secret(&mut self) -> Result<String> {
        rpassword::read_password().map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => PropwizardError::InputClosed,
            _ => PropwizardError::terminal(format!("Failed to read secret input: {e}")),
        })
    }
}

/// Terminal over arbitrary reader/writer streams
///
/// Secret input is read like any other line; hiding it is the job of whatever
/// sits behind the reader.
#[derive(Debug)]
pub struct StreamTerminal<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StreamTerminal<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn read_raw_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| PropwizardError::terminal(format!("Failed to read input: {e}")))?;

        if read == 0 {
            return Err(PropwizardError::InputClosed);
        }

        Ok(strip_line_terminator(line))
    }
}

impl StreamTerminal<Cursor<Vec<u8>>, Vec<u8>> {
    /// Terminal that answers from a fixed script and records everything written
    pub fn scripted(input: &str) -> Self {
        Self::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    /// Everything written to this terminal so far
    pub fn transcript(&self) -> String {
        String::from_utf8_lossy(&self.writer).into_owned()
    }
}

impl<R: BufRead, W: Write> Terminal for StreamTerminal<R, W> {
    fn write(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|e| PropwizardError::terminal(format!("Failed to write output: {e}")))
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{text}")
            .map_err(|e| PropwizardError::terminal(format!("Failed to write output: {e}")))
    }

    fn read_line(&mut self) -> Result<String> {
        self.read_raw_line()
    }

    fn read_secret(&mut self) -> Result<String> {
        self.read_raw_line()
    }
}

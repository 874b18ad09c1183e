//! Serial console adapters.
//!
//! [`UartConsole`] implements [`ConsolePort`] by writing bare lines to
//! stdout (UART0 on device), bypassing the `log` facade so result lines
//! carry no log prefix and survive any log level filter.
//! [`ConsoleSink`] implements [`OutputSink`] by formatting each result
//! into a fixed-size line and handing it to any `ConsolePort`.

use core::fmt::Write;
use std::io::{self, Write as _};

use embedded_hal::digital::PinState;
use heapless::String;

use crate::app::ports::{ConsolePort, OutputSink};
use crate::error::TransientError;
use crate::pipeline::ProcessingResult;

/// Longest console line the sink will format.
pub const CONSOLE_LINE_CAPACITY: usize = 64;

/// Console port writing newline-terminated lines to a byte stream.
pub struct UartConsole<W: io::Write> {
    out: W,
}

impl UartConsole<io::Stdout> {
    /// Console on the process stdout (UART0 under ESP-IDF).
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for UartConsole<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: io::Write> UartConsole<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: io::Write> ConsolePort for UartConsole<W> {
    fn write_line(&mut self, line: &str) -> Result<(), TransientError> {
        writeln!(self.out, "{}", line)
            .and_then(|()| self.out.flush())
            .map_err(|_| TransientError::ConsoleWriteFailed)
    }
}

/// Render a result as a console line.
///
/// Levels print as `Led Level <0|1>`; classes as `Signal Level <class>`.
pub fn format_result(
    result: &ProcessingResult,
) -> Result<String<CONSOLE_LINE_CAPACITY>, TransientError> {
    let mut line = String::new();
    let written = match result {
        ProcessingResult::Level(state) => {
            let bit = u8::from(*state == PinState::High);
            write!(line, "Led Level {}", bit)
        }
        ProcessingResult::Class(class) => write!(line, "Signal Level {}", class),
    };
    written.map_err(|_| TransientError::ConsoleOverflow)?;
    Ok(line)
}

/// Output sink echoing results to a console.
pub struct ConsoleSink<C: ConsolePort> {
    console: C,
    enabled: bool,
}

impl<C: ConsolePort> ConsoleSink<C> {
    pub fn new(console: C, enabled: bool) -> Self {
        Self { console, enabled }
    }

    pub fn console(&self) -> &C {
        &self.console
    }
}

impl<C: ConsolePort> OutputSink for ConsoleSink<C> {
    fn emit(&mut self, result: &ProcessingResult) -> Result<(), TransientError> {
        if !self.enabled {
            return Ok(());
        }
        let line = format_result(result)?;
        self.console.write_line(&line)
    }
}

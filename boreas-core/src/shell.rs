//! Line editor and command dispatch
//!
//! The shell owns no I/O: the caller feeds it received bytes one at a
//! time and performs whatever echo the editor asks for, then hands
//! completed lines to [`dispatch`] against a command table. Keeping the
//! console out of here lets the whole shell run under the host harness
//! on plain byte slices.

use heapless::Vec;

use crate::error::Error;

/// Longest accepted command line, terminator included
pub const LINE_CAPACITY: usize = 64;
/// Command name plus at most four arguments
pub const MAX_ARGS: usize = 5;

/// Byte that completes a line
pub const TERMINATOR: u8 = b'\r';
const DELETE: u8 = 127;

/// What the editor wants done with one fed byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Echo this byte back to the terminal
    Echo(u8),
    /// A complete line is ready in [`LineEditor::line`]
    Line,
    /// The line outgrew the buffer and was discarded
    Overflow,
}

/// Accumulates a command line byte by byte
#[derive(Default)]
pub struct LineEditor {
    buf: Vec<u8, LINE_CAPACITY>,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed one received byte
    pub fn feed(&mut self, byte: u8) -> Event {
        match byte {
            TERMINATOR => Event::Line,
            DELETE => {
                if self.buf.pop().is_some() {
                    Event::Echo(DELETE)
                } else {
                    // Nothing to rub out
                    Event::Echo(0)
                }
            }
            _ => {
                if self.buf.push(byte).is_err() {
                    self.buf.clear();
                    Event::Overflow
                } else {
                    Event::Echo(byte)
                }
            }
        }
    }

    /// The accumulated line
    pub fn line(&self) -> &[u8] {
        &self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Split a line into command name and arguments
///
/// Arguments past [`MAX_ARGS`] are dropped rather than rejected, the
/// handler's argument count check reports the mismatch.
pub fn split_args(line: &str) -> Vec<&str, MAX_ARGS> {
    let mut args = Vec::new();
    for word in line.split_whitespace() {
        if args.push(word).is_err() {
            break;
        }
    }
    args
}

/// One entry in a command table
pub struct Command<Ctx> {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub run: fn(&mut Ctx, &[&str]) -> Result<(), Error>,
}

/// Look up `args[0]` in `table` and run it
///
/// An empty line is a no-op; an unknown name is [`Error::NotFound`].
pub fn dispatch<Ctx>(table: &[Command<Ctx>], ctx: &mut Ctx, args: &[&str]) -> Result<(), Error> {
    let Some(&name) = args.first() else {
        return Ok(());
    };

    let cmd = table
        .iter()
        .find(|cmd| cmd.name == name)
        .ok_or(Error::NotFound)?;

    (cmd.run)(ctx, args)
}

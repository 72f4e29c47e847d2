//! Line input for prompts.
//!
//! A [`KeystrokeSource`] produces one line per call and reports the
//! keystrokes it echoes through the writer it is given. The prompter hands it
//! either the plain output sink or a [`MaskingWriter`](crate::mask::MaskingWriter),
//! so masking never depends on which source is in use.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::mask::ERASE;

/// A source of typed lines.
pub trait KeystrokeSource {
    /// Read one line, without its line terminator.
    ///
    /// Characters the source echoes itself are written to `echo`. `hidden` asks
    /// a real terminal to suppress its own echo for this line. End of input is
    /// an [`io::ErrorKind::UnexpectedEof`] error.
    fn read_line(&mut self, echo: &mut dyn Write, hidden: bool) -> io::Result<String>;
}

/// The process standard input.
///
/// Visible lines are read in cooked mode and echoed by the terminal. Hidden
/// lines on a TTY are read key by key in raw mode and echoed through `echo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinKeys;

impl KeystrokeSource for StdinKeys {
    fn read_line(&mut self, echo: &mut dyn Write, hidden: bool) -> io::Result<String> {
        let stdin = io::stdin();
        if hidden && stdin.is_terminal() {
            let _raw = RawMode::enable()?;
            return read_key_line(std::iter::repeat_with(event::read), echo);
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err(eof());
        }
        Ok(strip_line_ending(line))
    }
}

/// Restores cooked mode when dropped, including on error paths.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Assemble one line from raw terminal events, echoing typed characters and
/// erasures through `echo`. Running out of events is end of input.
fn read_key_line<I>(events: I, echo: &mut dyn Write) -> io::Result<String>
where
    I: IntoIterator<Item = io::Result<Event>>,
{
    let mut line = String::new();
    for event in events {
        let Event::Key(key) = event? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(line),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "prompt interrupted"));
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if line.is_empty() {
                    return Err(eof());
                }
            }
            KeyCode::Backspace => {
                if line.pop().is_some() {
                    echo.write_all(ERASE.as_bytes())?;
                    echo.flush()?;
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                line.push(c);
                let mut buf = [0u8; 4];
                echo.write_all(c.encode_utf8(&mut buf).as_bytes())?;
                echo.flush()?;
            }
            _ => {}
        }
    }
    Err(eof())
}

/// Lines from any reader, echoed back the way a terminal driver would.
///
/// Useful for scripted sessions and tests: every line read is written to the
/// echo sink with its newline, so a masked prompt shows `*` per character.
#[derive(Debug)]
pub struct ScriptedKeys<R> {
    reader: R,
}

impl<R: BufRead> ScriptedKeys<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl ScriptedKeys<io::Cursor<Vec<u8>>> {
    /// Script the given answers, one line each.
    pub fn lines<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut script = String::new();
        for answer in answers {
            script.push_str(answer.as_ref());
            script.push('\n');
        }
        Self::new(io::Cursor::new(script.into_bytes()))
    }
}

impl<R: BufRead> KeystrokeSource for ScriptedKeys<R> {
    fn read_line(&mut self, echo: &mut dyn Write, _hidden: bool) -> io::Result<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(eof());
        }
        let line = strip_line_ending(line);
        echo.write_all(line.as_bytes())?;
        echo.write_all(b"\n")?;
        echo.flush()?;
        Ok(line)
    }
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

fn eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "input closed before a value was entered")
}

//! Echo masking for secret prompts.
//!
//! [`MaskingWriter`] wraps the real output sink for the duration of one
//! question. Text that starts with the prompt is passed through once, so the
//! label renders normally; every printable character after that (code point
//! at or above space) becomes `*`. Control characters are dropped, except the
//! [`ERASE`] sequence, which passes through so a deleted keystroke removes its
//! `*` from the screen.

use std::io::{self, Write};

/// Terminal sequence that erases the cell left of the cursor.
pub const ERASE: &str = "\x08 \x08";

pub struct MaskingWriter<W> {
    inner: W,
    prompt: String,
}

impl<W: Write> MaskingWriter<W> {
    pub fn new(inner: W, prompt: &str) -> Self {
        Self {
            inner,
            prompt: prompt.to_string(),
        }
    }

    /// Write `text`, passing a leading prompt through and masking the rest.
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        let rest = match text.strip_prefix(self.prompt.as_str()) {
            Some(rest) if !self.prompt.is_empty() => {
                self.inner.write_all(self.prompt.as_bytes())?;
                rest
            }
            _ => text,
        };
        let mut pieces = rest.split(ERASE);
        if let Some(first) = pieces.next() {
            self.write_masked(first)?;
        }
        for piece in pieces {
            self.inner.write_all(ERASE.as_bytes())?;
            self.write_masked(piece)?;
        }
        Ok(())
    }

    fn write_masked(&mut self, text: &str) -> io::Result<()> {
        let stars = text.chars().filter(|c| *c >= ' ').count();
        if stars > 0 {
            self.inner.write_all("*".repeat(stars).as_bytes())?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for MaskingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_text(&String::from_utf8_lossy(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

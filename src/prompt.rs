//! Interactive prompting: ask for one value until a valid one is entered.
//!
//! The prompt text is `<label><hint>: ` where the hint is built from the
//! schema:
//!
//! | Schema | Hint |
//! |--------|------|
//! | default `localhost` | ` (default=localhost)` |
//! | masked, default `hunter2` | ` (default=*******)` |
//! | enum `a, b` with default `a` | ` [a, b] (default=a)` |
//! | boolean, truthy default | ` [Y/n]` |
//! | boolean, otherwise | ` [y/N]` |
//!
//! An empty answer selects the default. Any coercion error is printed to the
//! error sink and the question is asked again; invalid input never reaches
//! the caller. Only I/O failures (including end of input) are returned.

use std::io::{self, Stderr, Stdout, Write};

use tracing::debug;

use crate::coerce::{ParseResult, coerce};
use crate::error::CaptureError;
use crate::mask::MaskingWriter;
use crate::schema::{ValueKind, ValueSchema};
use crate::terminal::{KeystrokeSource, StdinKeys};
use crate::value::Value;

/// Something that can obtain a value for a schema interactively.
pub trait Ask {
    fn ask(&mut self, schema: &ValueSchema) -> Result<Value, CaptureError>;
}

/// Asks questions over a keystroke source, an output sink and an error sink.
///
/// Each [`prompt`](Self::prompt) call owns the three for one exchange at a
/// time; callers that share a terminal must not prompt concurrently.
pub struct Prompter<K, O, E> {
    keys: K,
    output: O,
    errors: E,
}

impl Prompter<StdinKeys, Stdout, Stderr> {
    /// Prompt on the process terminal.
    pub fn stdio() -> Self {
        Self::new(StdinKeys, io::stdout(), io::stderr())
    }
}

impl<K: KeystrokeSource, O: Write, E: Write> Prompter<K, O, E> {
    pub fn new(keys: K, output: O, errors: E) -> Self {
        Self {
            keys,
            output,
            errors,
        }
    }

    /// Ask for `schema` until the answer coerces cleanly.
    pub fn prompt(&mut self, schema: &ValueSchema) -> Result<Value, CaptureError> {
        schema.validate()?;
        let text = prompt_text(schema);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let answer = self.exchange(schema, &text)?;
            let raw = if answer.is_empty() {
                schema.default().cloned()
            } else {
                Some(Value::String(answer))
            };

            match coerce(schema, raw.as_ref()) {
                ParseResult {
                    value: Some(value),
                    error: None,
                } => {
                    debug!(key = schema.key(), attempt, "prompt answered");
                    return Ok(value);
                }
                ParseResult {
                    error: Some(err), ..
                } => {
                    let err = if schema.is_masked() { err.redacted() } else { err };
                    debug!(key = schema.key(), attempt, "prompt answer rejected");
                    writeln!(self.errors, "{err}")?;
                    self.errors.flush()?;
                }
                ParseResult { .. } => {
                    debug!(key = schema.key(), attempt, "empty prompt answer");
                }
            }
        }
    }

    /// One question-and-answer exchange.
    fn exchange(&mut self, schema: &ValueSchema, text: &str) -> io::Result<String> {
        if !schema.is_masked() {
            self.output.write_all(text.as_bytes())?;
            self.output.flush()?;
            return self.keys.read_line(&mut self.output, false);
        }

        let answer = {
            let mut echo = MaskingWriter::new(&mut self.output, text);
            echo.write_text(text)?;
            echo.flush()?;
            self.keys.read_line(&mut echo, true)?
        };
        // Hidden input suppresses the newline echo.
        self.output.write_all(b"\n")?;
        self.output.flush()?;
        Ok(answer)
    }

    pub fn into_parts(self) -> (K, O, E) {
        (self.keys, self.output, self.errors)
    }
}

impl<K: KeystrokeSource, O: Write, E: Write> Ask for Prompter<K, O, E> {
    fn ask(&mut self, schema: &ValueSchema) -> Result<Value, CaptureError> {
        self.prompt(schema)
    }
}

/// Compose the prompt line for `schema`.
pub fn prompt_text(schema: &ValueSchema) -> String {
    let mut default_hint = match schema.default() {
        Some(value) if schema.is_masked() => format!(" (default={})", value.masked()),
        Some(value) => format!(" (default={value})"),
        None => String::new(),
    };

    let accepted_hint = match schema.kind() {
        ValueKind::Enum(allowed) => format!(" [{}]", allowed.join(", ")),
        ValueKind::Boolean => {
            default_hint.clear();
            if default_is_true(schema) {
                " [Y/n]".to_string()
            } else {
                " [y/N]".to_string()
            }
        }
        ValueKind::String | ValueKind::Number => String::new(),
    };

    format!("{}{accepted_hint}{default_hint}: ", schema.display_label())
}

fn default_is_true(schema: &ValueSchema) -> bool {
    match schema.default() {
        Some(default) => matches!(
            coerce(schema, Some(default)).value,
            Some(Value::Boolean(true))
        ),
        None => false,
    }
}

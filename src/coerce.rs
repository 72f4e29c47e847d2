//! Coercion of raw input into typed values.
//!
//! Shared by the argv resolver and the prompter so a value typed on the
//! command line and one typed at a prompt are validated identically.
//!
//! Rules per kind:
//!
//! - **String**: the raw value, stringified.
//! - **Enum**: stringified, then checked against the allowed set. On a miss the
//!   error is set *and* the string is still returned as `value`; the caller
//!   decides whether a best-effort value is acceptable.
//! - **Number**: parsed as `f64`. Anything that is not a finite number
//!   (including `inf` and `NaN`) is an error and `value` keeps the unparsed
//!   input.
//! - **Boolean**: booleans pass through; strings are matched case-insensitively
//!   against `true/y/yes` and `false/n/no`; numbers use truthiness.
//!
//! A required schema with neither a raw value nor a default fails before any
//! kind-specific rule runs.

use crate::error::CaptureError;
use crate::schema::{ValueKind, ValueSchema};
use crate::value::Value;

const TRUTHY: [&str; 3] = ["true", "y", "yes"];
const FALSY: [&str; 3] = ["false", "n", "no"];

/// Outcome of coercing one raw value.
///
/// When `error` is set, `value` (if any) is a best-effort rendering and must
/// not be treated as final.
#[derive(Debug)]
pub struct ParseResult {
    pub value: Option<Value>,
    pub error: Option<CaptureError>,
}

impl ParseResult {
    fn ok(value: Value) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    fn failed(value: Option<Value>, error: CaptureError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.value.is_some()
    }

    /// Collapse into a `Result`, discarding any best-effort value on error.
    pub fn into_result(self) -> Result<Value, CaptureError> {
        match self {
            ParseResult {
                error: Some(err), ..
            } => Err(err),
            ParseResult {
                value: Some(value), ..
            } => Ok(value),
            ParseResult {
                value: None,
                error: None,
            } => Err(CaptureError::InvalidValues {
                reason: "coercion produced neither a value nor an error".to_string(),
            }),
        }
    }
}

/// The value used when a schema has neither input nor default.
pub fn fallback_value(kind: &ValueKind) -> Value {
    match kind {
        ValueKind::Boolean => Value::Boolean(false),
        ValueKind::Number => Value::Number(0.0),
        ValueKind::String | ValueKind::Enum(_) => Value::String(String::new()),
    }
}

/// Coerce `raw` (or the schema default, or the kind fallback) per the schema kind.
pub fn coerce(schema: &ValueSchema, raw: Option<&Value>) -> ParseResult {
    let label = schema.display_label();

    if schema.is_required() && raw.is_none() && schema.default().is_none() {
        return ParseResult::failed(
            None,
            CaptureError::MissingRequiredValue {
                label: label.to_string(),
            },
        );
    }

    let effective = raw
        .or(schema.default())
        .cloned()
        .unwrap_or_else(|| fallback_value(schema.kind()));

    match schema.kind() {
        ValueKind::String => ParseResult::ok(Value::String(effective.to_string())),
        ValueKind::Enum(allowed) => coerce_enum(label, allowed, effective),
        ValueKind::Number => coerce_number(label, effective),
        ValueKind::Boolean => coerce_boolean(label, effective),
    }
}

fn coerce_enum(label: &str, allowed: &[String], effective: Value) -> ParseResult {
    let text = effective.to_string();
    let is_member = matches!(&effective, Value::String(s) if allowed.contains(s));
    let value = Value::String(text.clone());
    if is_member {
        return ParseResult::ok(value);
    }
    ParseResult::failed(
        Some(value),
        CaptureError::InvalidEnum {
            label: label.to_string(),
            input: text,
            allowed: allowed.to_vec(),
        },
    )
}

fn coerce_number(label: &str, effective: Value) -> ParseResult {
    let parsed = match &effective {
        Value::Number(n) => *n,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        Value::Boolean(_) => f64::NAN,
    };
    if !parsed.is_finite() {
        let input = effective.to_string();
        return ParseResult::failed(
            Some(effective),
            CaptureError::InvalidNumber {
                label: label.to_string(),
                input,
            },
        );
    }
    ParseResult::ok(Value::Number(parsed))
}

fn coerce_boolean(label: &str, effective: Value) -> ParseResult {
    match effective {
        Value::Boolean(b) => ParseResult::ok(Value::Boolean(b)),
        Value::String(s) => {
            let lower = s.to_lowercase();
            if TRUTHY.contains(&lower.as_str()) {
                ParseResult::ok(Value::Boolean(true))
            } else if FALSY.contains(&lower.as_str()) {
                ParseResult::ok(Value::Boolean(false))
            } else {
                ParseResult::failed(
                    None,
                    CaptureError::InvalidBoolean {
                        label: label.to_string(),
                        input: s,
                    },
                )
            }
        }
        number @ Value::Number(_) => ParseResult::ok(Value::Boolean(number.is_truthy())),
    }
}

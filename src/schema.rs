//! Value schemas: the typed description of one configurable value.
//!
//! A [`ValueSchema`] is defined once by the caller and shared by both
//! resolution paths (argv and prompt). The primitive kind is a closed sum type,
//! so an enum schema always carries its allowed values and no other kind can.

use std::fmt;

use crate::error::CaptureError;
use crate::value::Value;

/// The primitive kind of a value, with only the data that kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    /// A closed set of allowed strings, in display order.
    Enum(Vec<String>),
}

impl ValueKind {
    /// Build an enum kind, dropping repeated values but keeping first-seen order.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !allowed.contains(&value) {
                allowed.push(value);
            }
        }
        ValueKind::Enum(allowed)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Enum(_) => "enum",
        }
    }

    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            ValueKind::Enum(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes one configurable value.
///
/// ```ignore
/// let env = ValueSchema::new("NODE_ENV", "Environment", ValueKind::one_of(["development", "production"]))
///     .flags(["--environment", "--env", "-e"])
///     .default_value("development");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSchema {
    key: String,
    label: String,
    kind: ValueKind,
    required: bool,
    default: Option<Value>,
    masked: bool,
    flags: Vec<String>,
}

impl ValueSchema {
    pub fn new(key: &str, label: &str, kind: ValueKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            default: None,
            masked: false,
            flags: Vec::new(),
        }
    }

    pub fn string(key: &str, label: &str) -> Self {
        Self::new(key, label, ValueKind::String)
    }

    pub fn number(key: &str, label: &str) -> Self {
        Self::new(key, label, ValueKind::Number)
    }

    pub fn boolean(key: &str, label: &str) -> Self {
        Self::new(key, label, ValueKind::Boolean)
    }

    pub fn one_of<I, S>(key: &str, label: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, label, ValueKind::one_of(values))
    }

    /// Require a value when no default exists.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value<V: Into<Value>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Treat the value as a secret: never echoed, default shown as `*`.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Add command-line flag spellings. Repeats of the same spelling collapse.
    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for flag in flags {
            let flag = flag.into();
            if !self.flags.contains(&flag) {
                self.flags.push(flag);
            }
        }
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn flag_spellings(&self) -> &[String] {
        &self.flags
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Replace the default between resolution attempts.
    pub fn set_default(&mut self, value: Option<Value>) {
        self.default = value;
    }

    /// Replace the allowed values of an enum schema.
    ///
    /// Has no effect on other kinds.
    pub fn set_enum_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let ValueKind::Enum(_) = self.kind {
            self.kind = ValueKind::one_of(values);
        }
    }

    /// The label used in messages: the label, or the key when the label is blank.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }

    /// Check the schema is usable on its own.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if let ValueKind::Enum(values) = &self.kind
            && values.is_empty()
        {
            return Err(CaptureError::EmptyEnum {
                key: self.key.clone(),
            });
        }
        Ok(())
    }
}

/// Validate a schema set: each schema individually, then key uniqueness.
pub fn validate_all(schemas: &[ValueSchema]) -> Result<(), CaptureError> {
    let mut seen: Vec<&str> = Vec::with_capacity(schemas.len());
    for schema in schemas {
        schema.validate()?;
        if seen.contains(&schema.key()) {
            return Err(CaptureError::DuplicateKey {
                key: schema.key.clone(),
            });
        }
        seen.push(schema.key());
    }
    Ok(())
}

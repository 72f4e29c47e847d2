use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum CaptureError {
    #[error("Argument config has no flags: {label}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::no_flags)))]
    NoFlags { label: String },

    #[error("Duplicate flag configurations detected:{}", format_duplicates(.0))]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(promptfig::duplicate_flags),
            help("each flag spelling may belong to one value config only")
        )
    )]
    DuplicateFlags(Vec<(String, Vec<String>)>),

    #[error("Duplicate value key: {key}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::duplicate_key)))]
    DuplicateKey { key: String },

    #[error("Enum value config has no allowed values: {key}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::empty_enum)))]
    EmptyEnum { key: String },

    #[error("Missing required value for {label}.")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::missing_value)))]
    MissingRequiredValue { label: String },

    #[error("Invalid number provided for {label}: {input}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::invalid_number)))]
    InvalidNumber { label: String, input: String },

    #[error("Invalid boolean provided for {label}: {input}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(promptfig::invalid_boolean),
            help("use one of: true, y, yes, false, n, no")
        )
    )]
    InvalidBoolean { label: String, input: String },

    #[error("Invalid value provided for {label}: {input}. Allowed values: [{}]", .allowed.join(","))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::invalid_enum)))]
    InvalidEnum {
        label: String,
        input: String,
        allowed: Vec<String>,
    },

    #[error("Invalid argument: {flag}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::unknown_flag)))]
    UnknownFlag { flag: String },

    #[error("No value was provided for {label}. {expected}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::no_value)))]
    NoValueProvided { label: String, expected: String },

    /// Every problem found in one argv pass, one per line.
    #[error("{}", format_lines(.0))]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::invalid_arguments)))]
    Invalid(#[cfg_attr(feature = "rich-errors", related)] Vec<CaptureError>),

    #[error("Resolved values do not fit the target type: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::invalid_values)))]
    InvalidValues { reason: String },

    #[error("Terminal I/O failed: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(promptfig::io)))]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    /// True for errors in the schema set itself rather than in user input.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CaptureError::NoFlags { .. }
                | CaptureError::DuplicateFlags(_)
                | CaptureError::DuplicateKey { .. }
                | CaptureError::EmptyEnum { .. }
        )
    }

    /// Replace user input carried by the error with `*`, for secret values.
    pub fn redacted(self) -> Self {
        match self {
            CaptureError::InvalidNumber { label, input } => CaptureError::InvalidNumber {
                label,
                input: mask(&input),
            },
            CaptureError::InvalidBoolean { label, input } => CaptureError::InvalidBoolean {
                label,
                input: mask(&input),
            },
            CaptureError::InvalidEnum {
                label,
                input,
                allowed,
            } => CaptureError::InvalidEnum {
                label,
                input: mask(&input),
                allowed,
            },
            other => other,
        }
    }

    /// The individual problems: the aggregated list, or just `self`.
    pub fn problems(&self) -> Vec<&CaptureError> {
        match self {
            CaptureError::Invalid(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }
}

fn mask(input: &str) -> String {
    "*".repeat(input.chars().count())
}

fn format_duplicates(duplicates: &[(String, Vec<String>)]) -> String {
    duplicates
        .iter()
        .map(|(flag, keys)| format!(" ([{flag}]=>{})", keys.join(",")))
        .collect()
}

fn format_lines(errors: &[CaptureError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_flags_lists_every_owner() {
        let err = CaptureError::DuplicateFlags(vec![
            ("--env".into(), vec!["NODE_ENV".into(), "ENVIRONMENT".into()]),
            ("-e".into(), vec!["NODE_ENV".into(), "EDITOR".into()]),
        ]);
        assert_eq!(
            err.to_string(),
            "Duplicate flag configurations detected: ([--env]=>NODE_ENV,ENVIRONMENT) ([-e]=>NODE_ENV,EDITOR)"
        );
    }

    #[test]
    fn invalid_enum_lists_allowed_values_in_order() {
        let err = CaptureError::InvalidEnum {
            label: "Environment".into(),
            input: "prod".into(),
            allowed: vec!["development".into(), "staging".into(), "production".into()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid value provided for Environment: prod. Allowed values: [development,staging,production]"
        );
    }

    #[test]
    fn aggregated_errors_join_with_newlines() {
        let err = CaptureError::Invalid(vec![
            CaptureError::UnknownFlag {
                flag: "--nope".into(),
            },
            CaptureError::InvalidNumber {
                label: "Port".into(),
                input: "abc".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid argument: --nope\nInvalid number provided for Port: abc"
        );
        assert_eq!(err.problems().len(), 2);
    }

    #[test]
    fn redacted_hides_input() {
        let err = CaptureError::InvalidBoolean {
            label: "Save Password".into(),
            input: "secret".into(),
        }
        .redacted();
        assert_eq!(err.to_string(), "Invalid boolean provided for Save Password: ******");
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(CaptureError::EmptyEnum { key: "k".into() }.is_configuration());
        assert!(
            !CaptureError::MissingRequiredValue {
                label: "Name".into()
            }
            .is_configuration()
        );
    }
}

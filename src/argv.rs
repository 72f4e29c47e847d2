//! Command-line resolution: match flag tokens against value schemas.
//!
//! The resolver is built in two phases. Construction indexes every flag
//! spelling and rejects structural problems (a schema without flags, a flag
//! claimed by more than one schema) before any argument is looked at. Scanning
//! then walks the tokens, collecting every problem instead of stopping at the
//! first, and reports them together as one [`CaptureError::Invalid`].
//!
//! Token forms:
//!
//! | Tokens | Captured |
//! |--------|----------|
//! | `--host=example.org` | `"example.org"` |
//! | `--host example.org` | `"example.org"` |
//! | `--verbose` (boolean, last or before another flag) | `true` |
//! | `--host` (non-boolean, last or before another flag) | error |

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::coerce::coerce;
use crate::error::CaptureError;
use crate::resolved::ResolvedValues;
use crate::schema::{self, ValueKind, ValueSchema};
use crate::value::Value;

/// Leading `std::env::args()` entries that are never flags (the program path).
pub const RESERVED_ARGS: usize = 1;

/// A validated flag index over a schema set.
#[derive(Debug)]
pub struct ArgvResolver<'a> {
    schemas: &'a [ValueSchema],
    index: HashMap<&'a str, usize>,
}

impl<'a> ArgvResolver<'a> {
    /// Index the flags of `schemas`.
    ///
    /// Fails if any schema is malformed, has no flags, or shares a flag with
    /// another schema. Duplicate errors name every schema claiming the flag.
    pub fn new(schemas: &'a [ValueSchema]) -> Result<Self, CaptureError> {
        schema::validate_all(schemas)?;

        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut duplicates: Vec<(String, Vec<String>)> = Vec::new();

        for (position, schema) in schemas.iter().enumerate() {
            if schema.flag_spellings().is_empty() {
                return Err(CaptureError::NoFlags {
                    label: schema.display_label().to_string(),
                });
            }
            for flag in schema.flag_spellings() {
                let Some(&owner) = index.get(flag.as_str()) else {
                    index.insert(flag.as_str(), position);
                    continue;
                };
                match duplicates.iter_mut().find(|(f, _)| f == flag) {
                    Some((_, keys)) => keys.push(schema.key().to_string()),
                    None => duplicates.push((
                        flag.clone(),
                        vec![schemas[owner].key().to_string(), schema.key().to_string()],
                    )),
                }
            }
        }

        if !duplicates.is_empty() {
            return Err(CaptureError::DuplicateFlags(duplicates));
        }

        debug!(schemas = schemas.len(), flags = index.len(), "built flag index");
        Ok(Self { schemas, index })
    }

    /// Resolve the current process arguments, skipping [`RESERVED_ARGS`].
    pub fn resolve_env(&self) -> Result<ResolvedValues, CaptureError> {
        self.resolve(std::env::args().skip(RESERVED_ARGS))
    }

    /// Scan `args` and return the coerced value of every flag supplied.
    ///
    /// Schemas whose flags do not appear are absent from the result.
    pub fn resolve<I, S>(&self, args: I) -> Result<ResolvedValues, CaptureError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut values = ResolvedValues::default();
        let mut errors: Vec<CaptureError> = Vec::new();

        let mut i = 0;
        while i < args.len() {
            let (flag, inline) = split_token(&args[i]);
            i += 1;

            let Some(&position) = self.index.get(flag) else {
                errors.push(CaptureError::UnknownFlag {
                    flag: flag.to_string(),
                });
                continue;
            };
            let schema = &self.schemas[position];

            let raw = match inline.filter(|v| !v.is_empty()) {
                Some(value) => Value::from(value),
                None => match args.get(i) {
                    Some(next) if !self.is_flag(next) => {
                        i += 1;
                        Value::from(next.as_str())
                    }
                    _ if matches!(schema.kind(), ValueKind::Boolean) => Value::Boolean(true),
                    _ => {
                        errors.push(no_value_error(schema, flag));
                        continue;
                    }
                },
            };

            match coerce(schema, Some(&raw)).into_result() {
                Ok(value) => {
                    if schema.is_masked() {
                        trace!(key = schema.key(), flag, "captured masked argv value");
                    } else {
                        trace!(key = schema.key(), flag, %value, "captured argv value");
                    }
                    values.insert(schema.key(), value);
                }
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "argv resolution failed");
            return Err(CaptureError::Invalid(errors));
        }
        Ok(values)
    }

    /// True if the flag part of `token` names a known flag.
    fn is_flag(&self, token: &str) -> bool {
        self.index.contains_key(split_token(token).0)
    }
}

/// Resolve `args` against `schemas` in one call.
pub fn resolve<I, S>(schemas: &[ValueSchema], args: I) -> Result<ResolvedValues, CaptureError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ArgvResolver::new(schemas)?.resolve(args)
}

/// Split on the first `=`: `--a=b=c` is flag `--a` with value `b=c`.
fn split_token(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((flag, value)) => (flag, Some(value)),
        None => (token, None),
    }
}

fn no_value_error(schema: &ValueSchema, flag: &str) -> CaptureError {
    let expected = match schema.kind() {
        ValueKind::Enum(allowed) => format!(
            "One of the following values must be provided: [{}]",
            allowed.join(",")
        ),
        ValueKind::Number => "A number must be provided.".to_string(),
        ValueKind::String | ValueKind::Boolean => "A string must be provided.".to_string(),
    };
    CaptureError::NoValueProvided {
        label: format!("{} [{flag}]", schema.display_label()),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{
        environment, hostname, log_level, mysql_password, name, port, setup_schemas, verbose,
    };

    fn errors_of(err: CaptureError) -> Vec<String> {
        match err {
            CaptureError::Invalid(errors) => errors.iter().map(ToString::to_string).collect(),
            other => panic!("Expected Invalid, got: {other:?}"),
        }
    }

    #[test]
    fn inline_value_and_bare_boolean() {
        let schemas = vec![ValueSchema::string("name", "Name").flags(["--name"]), verbose()];
        let values = resolve(&schemas, ["--name=Alice", "--verbose"]).unwrap();
        assert_eq!(values.get("name"), Some(&Value::from("Alice")));
        assert_eq!(values.get("verbose"), Some(&Value::Boolean(true)));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn separate_token_value_is_consumed() {
        let values = resolve(&setup_schemas(), ["--hostname", "example.org", "-p", "8080"]).unwrap();
        assert_eq!(values.get("SERVER_HOSTNAME"), Some(&Value::from("example.org")));
        assert_eq!(values.get("port"), Some(&Value::Number(8080.0)));
    }

    #[test]
    fn value_may_contain_equals() {
        let values = resolve(&[mysql_password()], ["--mysql-password=a=b=c"]).unwrap();
        assert_eq!(values.get("MYSQL_PASSWORD"), Some(&Value::from("a=b=c")));
    }

    #[test]
    fn boolean_before_another_flag_is_true() {
        let values = resolve(&setup_schemas(), ["-v", "--env", "staging"]).unwrap();
        assert_eq!(values.get("verbose"), Some(&Value::Boolean(true)));
        assert_eq!(values.get("NODE_ENV"), Some(&Value::from("staging")));
    }

    #[test]
    fn next_token_with_inline_value_counts_as_flag() {
        let values = resolve(&setup_schemas(), ["--verbose", "--env=production"]).unwrap();
        assert_eq!(values.get("verbose"), Some(&Value::Boolean(true)));
        assert_eq!(values.get("NODE_ENV"), Some(&Value::from("production")));
    }

    #[test]
    fn infinite_number_is_rejected() {
        let errors = errors_of(resolve(&[port()], ["--port=inf"]).unwrap_err());
        assert_eq!(errors, vec!["Invalid number provided for Port: inf"]);
    }

    #[test]
    fn explicit_boolean_false() {
        let values = resolve(&[verbose()], ["--verbose=no"]).unwrap();
        assert_eq!(values.get("verbose"), Some(&Value::Boolean(false)));
    }

    #[test]
    fn missing_string_value_names_field_and_shape() {
        let errors = errors_of(resolve(&[name()], ["--name"]).unwrap_err());
        assert_eq!(
            errors,
            vec!["No value was provided for Name [--name]. A string must be provided."]
        );
    }

    #[test]
    fn missing_number_and_enum_values_have_hints() {
        let errors =
            errors_of(resolve(&[port(), log_level()], ["--port", "--log-level"]).unwrap_err());
        assert_eq!(
            errors,
            vec![
                "No value was provided for Port [--port]. A number must be provided.",
                "No value was provided for Log Level [--log-level]. One of the following values must be provided: [debug,info,warn]",
            ]
        );
    }

    #[test]
    fn unknown_flags_accumulate_with_other_errors() {
        let err = resolve(&setup_schemas(), ["--nope", "--port=abc", "-x", "--env", "prod"]).unwrap_err();
        let errors = errors_of(err);
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], "Invalid argument: --nope");
        assert_eq!(errors[1], "Invalid number provided for Port: abc");
        assert_eq!(errors[2], "Invalid argument: -x");
        assert!(errors[3].starts_with("Invalid value provided for Environment: prod."));
    }

    #[test]
    fn aggregated_message_is_newline_joined() {
        let err = resolve(&setup_schemas(), ["--a", "--b"]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: --a\nInvalid argument: --b");
    }

    #[test]
    fn invalid_enum_value_is_not_captured() {
        let result = resolve(&[environment()], ["--env=prod"]);
        assert!(result.is_err());
    }

    #[test]
    fn absent_flags_leave_keys_missing() {
        let values = resolve(&setup_schemas(), ["-v"]).unwrap();
        assert!(!values.contains("SERVER_HOSTNAME"));
        assert!(!values.contains("NODE_ENV"));
    }

    #[test]
    fn empty_args_yield_empty_values() {
        let values = resolve(&setup_schemas(), Vec::<String>::new()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn duplicate_flags_fail_before_scanning() {
        let schemas = vec![
            environment(),
            ValueSchema::string("DEPLOY_ENV", "Deploy Env").flags(["--env"]),
        ];
        let err = ArgvResolver::new(&schemas).unwrap_err();
        assert!(err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("NODE_ENV"));
        assert!(msg.contains("DEPLOY_ENV"));
        assert_eq!(
            msg,
            "Duplicate flag configurations detected: ([--env]=>NODE_ENV,DEPLOY_ENV)"
        );

        // Even arguments that would be invalid are never looked at.
        let err = resolve(&schemas, ["--bogus"]).unwrap_err();
        assert!(matches!(err, CaptureError::DuplicateFlags(_)));
    }

    #[test]
    fn flag_claimed_three_times_lists_all_keys() {
        let schemas = vec![
            ValueSchema::string("a", "A").flags(["-x"]),
            ValueSchema::string("b", "B").flags(["-x"]),
            ValueSchema::string("c", "C").flags(["-x"]),
        ];
        match ArgvResolver::new(&schemas).unwrap_err() {
            CaptureError::DuplicateFlags(dups) => {
                assert_eq!(dups, vec![(
                        "-x".to_string(),
                        vec!["a".to_string(), "b".to_string(), "c".to_string()]
                    )]);
            }
            other => panic!("Expected DuplicateFlags, got: {other:?}"),
        }
    }

    #[test]
    fn schema_without_flags_is_configuration_error() {
        let schemas = vec![hostname(), ValueSchema::string("token", "API Token")];
        match ArgvResolver::new(&schemas).unwrap_err() {
            CaptureError::NoFlags { label } => assert_eq!(label, "API Token"),
            other => panic!("Expected NoFlags, got: {other:?}"),
        }
    }

    #[test]
    fn repeated_flag_last_wins() {
        let values = resolve(&[hostname()], ["-h", "a", "--hostname=b"]).unwrap();
        assert_eq!(values.get("SERVER_HOSTNAME"), Some(&Value::from("b")));
    }

    #[test]
    fn split_token_on_first_equals() {
        assert_eq!(split_token("--a=b=c"), ("--a", Some("b=c")));
        assert_eq!(split_token("--a"), ("--a", None));
        assert_eq!(split_token("--a="), ("--a", Some("")));
    }
}

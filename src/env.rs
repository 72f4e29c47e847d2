use crate::resolved::ResolvedValues;
use crate::schema::ValueSchema;
use crate::value::Value;

/// The environment variable that supplies a default for `key`.
///
/// `{PREFIX}_{KEY}` with the key uppercased, or just `{KEY}` for an empty prefix.
pub fn env_var_name(prefix: &str, key: &str) -> String {
    let key = key.to_uppercase();
    if prefix.is_empty() {
        key
    } else {
        format!("{prefix}_{key}")
    }
}

/// Collect defaults for `schemas` from environment variables.
///
/// Empty variables are ignored. Values stay strings; coercion happens when
/// the default is used, so a bad value is reported like any other input.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_defaults(
    prefix: &str,
    schemas: &[ValueSchema],
    vars: impl IntoIterator<Item = (String, String)>,
) -> ResolvedValues {
    let wanted: Vec<(String, &str)> = schemas
        .iter()
        .map(|schema| (env_var_name(prefix, schema.key()), schema.key()))
        .collect();

    let mut defaults = ResolvedValues::new();
    for (name, value) in vars {
        if value.is_empty() {
            continue;
        }
        if let Some((_, key)) = wanted.iter().find(|(wanted_name, _)| *wanted_name == name) {
            defaults.insert(key, Value::String(value));
        }
    }
    defaults
}

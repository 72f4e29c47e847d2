//! Per-run state owned by the calling workflow.
//!
//! A [`Session`] holds what would otherwise be process-global: defaults and
//! enum values discovered at runtime, and every value resolved so far
//! (including secrets, so a password is asked for once per session). Schemas
//! themselves stay immutable; [`Session::apply`] produces the effective copy
//! used for one resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::coerce::coerce;
use crate::error::CaptureError;
use crate::prompt::Ask;
use crate::resolved::ResolvedValues;
use crate::schema::ValueSchema;
use crate::value::Value;

#[derive(Debug, Default)]
pub struct Session {
    defaults: HashMap<String, Value>,
    enum_values: HashMap<String, Vec<String>>,
    values: ResolvedValues,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the default of the schema with `key`.
    pub fn set_default<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.defaults.insert(key.to_string(), value.into());
    }

    /// Override defaults from a set of values (e.g. a previously saved configuration).
    pub fn set_defaults(&mut self, values: ResolvedValues) {
        for (key, value) in values {
            self.defaults.insert(key, value);
        }
    }

    /// Replace the allowed values of the enum schema with `key`.
    pub fn set_enum_values<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values
            .insert(key.to_string(), values.into_iter().map(Into::into).collect());
    }

    /// The schema with this session's overrides applied.
    pub fn apply(&self, schema: &ValueSchema) -> ValueSchema {
        let mut effective = schema.clone();
        if let Some(default) = self.defaults.get(schema.key()) {
            effective.set_default(Some(default.clone()));
        }
        if let Some(values) = self.enum_values.get(schema.key()) {
            effective.set_enum_values(values.iter().cloned());
        }
        effective
    }

    /// A value already resolved in this session.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remember(&mut self, key: &str, value: Value) {
        self.values.insert(key, value);
    }

    /// The cached value for `schema`, checked against the schema with this
    /// session's overrides applied. A value that no longer coerces (e.g. an
    /// enum member removed by [`set_enum_values`](Self::set_enum_values)) is
    /// dropped from the cache.
    pub fn revalidate(&mut self, schema: &ValueSchema) -> Option<Value> {
        let cached = self.values.get(schema.key())?.clone();
        let effective = self.apply(schema);
        match coerce(&effective, Some(&cached)).into_result() {
            Ok(value) => {
                self.values.insert(schema.key(), value.clone());
                Some(value)
            }
            Err(_) => {
                debug!(key = schema.key(), "dropping stale cached value");
                self.values.remove(schema.key());
                None
            }
        }
    }

    /// Drop a cached value so the next resolution asks again.
    pub fn forget(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn values(&self) -> &ResolvedValues {
        &self.values
    }

    /// The cached value for `schema`, or ask for it and cache the answer.
    pub fn ask(
        &mut self,
        schema: &ValueSchema,
        asker: &mut dyn Ask,
    ) -> Result<Value, CaptureError> {
        if let Some(value) = self.revalidate(schema) {
            debug!(key = schema.key(), "using cached value");
            return Ok(value);
        }
        let effective = self.apply(schema);
        let value = asker.ask(&effective)?;
        self.remember(schema.key(), value.clone());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{environment, mysql_password};
    use crate::prompt::Prompter;
    use crate::schema::ValueKind;
    use crate::terminal::ScriptedKeys;

    #[test]
    fn apply_overrides_default_without_touching_schema() {
        let schema = environment();
        let mut session = Session::new();
        session.set_default("NODE_ENV", "staging");
        assert_eq!(session.apply(&schema).default(), Some(&Value::from("staging")));
        assert_eq!(schema.default(), Some(&Value::from("development")));
    }

    #[test]
    fn apply_fills_runtime_enum_values() {
        let schema = ValueSchema::one_of("JWT_CURVE", "Curve", Vec::<String>::new());
        let mut session = Session::new();
        session.set_enum_values("JWT_CURVE", ["prime256v1", "secp384r1"]);
        let effective = session.apply(&schema);
        assert_eq!(
            effective.kind(),
            &ValueKind::Enum(vec!["prime256v1".into(), "secp384r1".into()])
        );
    }

    #[test]
    fn set_defaults_from_saved_values() {
        let mut saved = ResolvedValues::new();
        saved.insert("NODE_ENV", Value::from("production"));
        let mut session = Session::new();
        session.set_defaults(saved);
        assert_eq!(
            session.apply(&environment()).default(),
            Some(&Value::from("production"))
        );
    }

    #[test]
    fn ask_caches_secret_until_forgotten() {
        let mut session = Session::new();
        let mut prompter = Prompter::new(
            ScriptedKeys::lines(["first", "second"]),
            Vec::new(),
            Vec::new(),
        );

        let schema = mysql_password();
        assert_eq!(session.ask(&schema, &mut prompter).unwrap(), Value::from("first"));
        // Cached: no second prompt.
        assert_eq!(session.ask(&schema, &mut prompter).unwrap(), Value::from("first"));

        assert_eq!(session.forget("MYSQL_PASSWORD"), Some(Value::from("first")));
        assert_eq!(session.ask(&schema, &mut prompter).unwrap(), Value::from("second"));
    }

    #[test]
    fn stale_enum_value_is_asked_again() {
        let schema = ValueSchema::one_of("JWT_CURVE", "Curve", ["a", "b"]).flags(["--curve"]);
        let mut session = Session::new();
        session.remember("JWT_CURVE", Value::from("a"));
        session.set_enum_values("JWT_CURVE", ["b", "c"]);

        let mut prompter = Prompter::new(ScriptedKeys::lines(["c"]), Vec::new(), Vec::new());
        assert_eq!(session.ask(&schema, &mut prompter).unwrap(), Value::from("c"));
        assert_eq!(session.get("JWT_CURVE"), Some(&Value::from("c")));
    }

    #[test]
    fn revalidate_keeps_valid_and_drops_stale() {
        let schema = ValueSchema::one_of("JWT_CURVE", "Curve", ["a", "b"]).flags(["--curve"]);
        let mut session = Session::new();
        session.remember("JWT_CURVE", Value::from("b"));
        assert_eq!(session.revalidate(&schema), Some(Value::from("b")));

        session.set_enum_values("JWT_CURVE", ["c"]);
        assert_eq!(session.revalidate(&schema), None);
        assert!(session.get("JWT_CURVE").is_none());
    }

    #[test]
    fn ask_uses_session_default() {
        let mut session = Session::new();
        session.set_default("NODE_ENV", "staging");
        let mut prompter = Prompter::new(ScriptedKeys::lines([""]), Vec::new(), Vec::new());
        assert_eq!(
            session.ask(&environment(), &mut prompter).unwrap(),
            Value::from("staging")
        );
    }
}

//! Core resolution pipeline: combine every value source and produce a
//! complete set of values.
//!
//! Operates on pre-loaded data (`ResolveInput`) so the whole pipeline is
//! testable with synthetic arguments and environment. Steps:
//!
//! 1. Apply environment defaults, then session overrides, to each schema
//! 2. Validate the effective schema set
//! 3. Resolve command-line arguments (if any) and cache the results
//! 4. Drop cached values the effective schema no longer accepts, then for
//!    every schema still missing: ask interactively, or fill from the
//!    default / kind fallback when prompting is off. An optional value whose
//!    fill does not coerce (an enum with no default) stays unset
//! 5. Return the values in schema order

use tracing::debug;

use crate::argv;
use crate::coerce::coerce;
use crate::env;
use crate::error::CaptureError;
use crate::prompt::Ask;
use crate::resolved::ResolvedValues;
use crate::schema::{self, ValueSchema};
use crate::session::Session;

/// All pre-loaded data needed for one resolution. No process I/O happens here.
pub struct ResolveInput {
    /// Schemas in resolution (and prompt) order.
    pub schemas: Vec<ValueSchema>,
    /// Command-line arguments without the program path. `None` skips argv.
    pub args: Option<Vec<String>>,
    /// Raw environment variable pairs.
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix. `None` means env defaults are disabled.
    pub env_prefix: Option<String>,
    /// Ask for missing values; otherwise fill them non-interactively.
    pub interactive: bool,
}

/// Resolve every schema in `input`, caching results in `session`.
pub fn resolve(
    input: ResolveInput,
    session: &mut Session,
    asker: &mut dyn Ask,
) -> Result<ResolvedValues, CaptureError> {
    // 1: Env defaults under session overrides
    let env_defaults = match &input.env_prefix {
        Some(prefix) => env::env_defaults(prefix, &input.schemas, input.env_vars),
        None => ResolvedValues::new(),
    };
    let schemas: Vec<ValueSchema> = input
        .schemas
        .iter()
        .map(|schema| {
            let mut schema = schema.clone();
            if let Some(default) = env_defaults.get(schema.key()) {
                schema.set_default(Some(default.clone()));
            }
            session.apply(&schema)
        })
        .collect();

    // 2: Structural problems fail before any input is read
    schema::validate_all(&schemas)?;

    // 3: Argv wins over anything cached
    if let Some(args) = input.args {
        let from_args = argv::resolve(&schemas, args)?;
        debug!(values = from_args.len(), "resolved values from arguments");
        for (key, value) in from_args {
            session.remember(&key, value);
        }
    }

    // 4: Fill what is still missing
    let mut errors: Vec<CaptureError> = Vec::new();
    for schema in &schemas {
        if session.revalidate(schema).is_some() {
            continue;
        }
        if input.interactive {
            session.ask(schema, asker)?;
            continue;
        }
        match coerce(schema, None).into_result() {
            Ok(value) => session.remember(schema.key(), value),
            Err(_) if !schema.is_required() && schema.default().is_none() => {
                debug!(key = schema.key(), "optional value left unset");
            }
            Err(err) => errors.push(err),
        }
    }
    if !errors.is_empty() {
        return Err(CaptureError::Invalid(errors));
    }

    // 5: Only the keys asked for, in schema order
    let mut values = ResolvedValues::new();
    for schema in &schemas {
        if let Some(value) = session.get(schema.key()) {
            values.insert(schema.key(), value.clone());
        }
    }
    Ok(values)
}

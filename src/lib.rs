//! Capture typed values for interactive command-line workflows. Describe each
//! value once, then resolve it from flags, the environment, or a prompt.
//!
//! Promptfig is built for setup scripts and provisioning wizards: tools that
//! need a handful of settings (a hostname, an environment name, a database
//! password) and should accept them on the command line when given, and ask
//! for them otherwise.
//!
//! ```ignore
//! let mut session = Session::new();
//! let values = Capture::builder()
//!     .schemas([
//!         ValueSchema::one_of("NODE_ENV", "Environment", ["development", "production"])
//!             .flags(["--environment", "-e"])
//!             .default_value("development"),
//!         ValueSchema::string("MYSQL_PASSWORD", "MySQL Password")
//!             .flags(["--mysql-password"])
//!             .masked(),
//!     ])
//!     .args_from_env()
//!     .run(&mut session)?;
//! ```
//!
//! `--environment=production` on the command line fills `NODE_ENV`; the
//! password is asked for with every keystroke echoed as `*`.
//!
//! # Schemas as source of truth
//!
//! A [`ValueSchema`] names a key, a human label, a [`ValueKind`] (string,
//! number, boolean or one of a fixed set), an optional default, whether the
//! value is required, whether it is secret, and the flag spellings that set
//! it. Argument parsing, prompt text, coercion, help output and the masked
//! listing all derive from that one description.
//!
//! # Layer precedence
//!
//! ```text
//! Schema defaults       ValueSchema::default_value()
//!        ↑ overridden by
//! Environment vars      PREFIX_KEY (opt-in with .env_prefix())
//!        ↑ overridden by
//! Session defaults      Session::set_default()
//!        ↑ overridden by
//! Command-line flags    --flag value, --flag=value, bare boolean flags
//! ```
//!
//! Lower layers only supply defaults; a value from them is still confirmed
//! through the prompt unless prompting is off. Anything the flags did not set
//! is asked for in schema order. With [`no_prompt()`](CaptureBuilder::no_prompt)
//! the defaults are taken as-is and every missing required value is reported.
//!
//! # Argument parsing
//!
//! [`ArgvResolver`] scans arguments once and accumulates every problem
//! (unknown flags, missing values, invalid numbers) before failing, so a user
//! sees the whole list in one run. Configuration mistakes (a schema without
//! flags, two schemas claiming one flag, an empty enum) are reported as
//! distinct errors; see [`CaptureError::is_configuration`].
//!
//! # Prompting and secrets
//!
//! [`Prompter`] asks until an answer coerces cleanly, printing each error
//! and asking again. For masked schemas the terminal is put in raw mode and
//! keystrokes are echoed through a [`MaskingWriter`]; defaults, error
//! messages and [`ResolvedValues::listing`] show secrets as `*` as well.
//! Secret values are never logged.
//!
//! The keystroke source is a trait ([`KeystrokeSource`]), so prompts can be
//! scripted in tests with [`ScriptedKeys`] and any sink implementing
//! [`std::io::Write`].
//!
//! # Sessions
//!
//! A [`Session`] carries state across captures in one run: cached answers
//! (a password is asked for once), default overrides, and enum values only
//! known at runtime. It is owned by the caller and passed explicitly.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` Cargo feature, on by default) renders
//! a schema set as a [`clap::Command`] for `--help` output. To use promptfig
//! without clap:
//!
//! ```toml
//! promptfig = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`CaptureError`]. See the [`error`] module
//! for the full set. With the `rich-errors` feature, errors also implement
//! `miette::Diagnostic`.

pub mod error;
pub mod terminal;

mod argv;
mod builder;
#[cfg(feature = "clap")]
pub mod cli;
mod coerce;
mod env;
mod mask;
mod prompt;
mod resolve;
mod resolved;
mod schema;
mod session;
mod value;

#[cfg(test)]
mod fixtures;

pub use argv::{ArgvResolver, RESERVED_ARGS, resolve as resolve_args};
pub use builder::{Capture, CaptureBuilder};
pub use coerce::{ParseResult, coerce, fallback_value};
pub use env::env_var_name;
pub use error::CaptureError;
pub use mask::MaskingWriter;
pub use prompt::{Ask, Prompter, prompt_text};
pub use resolved::{Listing, ResolvedValues};
pub use schema::{ValueKind, ValueSchema, validate_all};
pub use session::Session;
pub use terminal::{KeystrokeSource, ScriptedKeys, StdinKeys};
pub use value::Value;

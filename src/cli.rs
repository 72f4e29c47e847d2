//! Clap adapter for promptfig.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Value
//! schemas already describe every flag, so this module turns a schema set
//! into a [`clap::Command`] purely to render usage and `--help` text. Parsing
//! stays with [`ArgvResolver`](crate::ArgvResolver), which keeps the
//! accumulate-every-error behavior that clap does not offer.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command};

use crate::schema::{ValueKind, ValueSchema};

/// Build a help-only `Command` describing `schemas`.
///
/// The automatic `-h/--help` flag is disabled since `-h` is a common
/// spelling for a host flag.
pub fn command(name: &str, schemas: &[ValueSchema]) -> Command {
    schemas.iter().fold(
        Command::new(name.to_string())
            .disable_help_flag(true)
            .disable_version_flag(true),
        |cmd, schema| cmd.arg(schema_arg(schema)),
    )
}

/// Render the help text for `schemas`.
pub fn render_help(name: &str, schemas: &[ValueSchema]) -> String {
    command(name, schemas).render_help().to_string()
}

fn schema_arg(schema: &ValueSchema) -> Arg {
    let mut arg = Arg::new(schema.key().to_string()).help(help_text(schema));

    let mut has_long = false;
    let mut has_short = false;
    for flag in schema.flag_spellings() {
        if let Some(long) = flag.strip_prefix("--") {
            arg = if has_long {
                arg.visible_alias(long.to_string())
            } else {
                arg.long(long.to_string())
            };
            has_long = true;
        } else if let Some(short) = single_char(flag.strip_prefix('-')) {
            arg = if has_short {
                arg.visible_short_alias(short)
            } else {
                arg.short(short)
            };
            has_short = true;
        }
    }

    match schema.kind() {
        ValueKind::Boolean => arg.action(ArgAction::SetTrue),
        ValueKind::Enum(allowed) => arg
            .action(ArgAction::Set)
            .value_parser(PossibleValuesParser::new(allowed.clone())),
        ValueKind::Number => arg.action(ArgAction::Set).value_name("NUMBER"),
        ValueKind::String => arg.action(ArgAction::Set).value_name("STRING"),
    }
}

fn single_char(rest: Option<&str>) -> Option<char> {
    let mut chars = rest?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn help_text(schema: &ValueSchema) -> String {
    let mut help = schema.display_label().to_string();
    if let Some(default) = schema.default() {
        let shown = if schema.is_masked() {
            default.masked()
        } else {
            default.to_string()
        };
        help.push_str(&format!(" [default: {shown}]"));
    }
    if schema.is_required() {
        help.push_str(" (required)");
    }
    help
}

use crate::argv::RESERVED_ARGS;
use crate::error::CaptureError;
use crate::prompt::{Ask, Prompter};
use crate::resolve::{self, ResolveInput};
use crate::resolved::ResolvedValues;
use crate::schema::ValueSchema;
use crate::session::Session;

/// Entry point for building a capture.
pub struct Capture;

impl Capture {
    pub fn builder() -> CaptureBuilder {
        CaptureBuilder::new()
    }
}

/// Builder for resolving a set of values from arguments, environment and prompts.
///
/// Sources, lowest priority first:
///
/// - schema defaults
/// - environment variables ([`env_prefix()`](Self::env_prefix))
/// - session defaults ([`Session::set_default`])
/// - command-line arguments ([`args()`](Self::args) / [`args_from_env()`](Self::args_from_env))
///
/// Anything still missing is prompted for, unless [`no_prompt()`](Self::no_prompt)
/// is set.
pub struct CaptureBuilder {
    schemas: Vec<ValueSchema>,
    args: Option<Vec<String>>,
    env_prefix: Option<String>,
    interactive: bool,
}

impl CaptureBuilder {
    fn new() -> Self {
        Self {
            schemas: Vec::new(),
            args: None,
            env_prefix: None,
            interactive: true,
        }
    }

    /// Append one schema. Resolution and prompt order follow insertion order.
    pub fn schema(mut self, schema: ValueSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Append several schemas.
    pub fn schemas<I: IntoIterator<Item = ValueSchema>>(mut self, schemas: I) -> Self {
        self.schemas.extend(schemas);
        self
    }

    /// Resolve these arguments (without the program path).
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Resolve the process arguments.
    pub fn args_from_env(self) -> Self {
        self.args(std::env::args().skip(RESERVED_ARGS))
    }

    /// Read defaults from `{PREFIX}_{KEY}` variables; an empty prefix reads `{KEY}`.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Never prompt: fill missing values from defaults and fail on missing required ones.
    pub fn no_prompt(mut self) -> Self {
        self.interactive = false;
        self
    }

    fn build_input(self) -> ResolveInput {
        let env_vars = match self.env_prefix {
            Some(_) => std::env::vars().collect(),
            None => Vec::new(),
        };
        ResolveInput {
            schemas: self.schemas,
            args: self.args,
            env_vars,
            env_prefix: self.env_prefix,
            interactive: self.interactive,
        }
    }

    /// Resolve, prompting on the process terminal.
    pub fn run(self, session: &mut Session) -> Result<ResolvedValues, CaptureError> {
        let mut prompter = Prompter::stdio();
        self.run_with(session, &mut prompter)
    }

    /// Resolve, prompting through `asker`.
    pub fn run_with(
        self,
        session: &mut Session,
        asker: &mut dyn Ask,
    ) -> Result<ResolvedValues, CaptureError> {
        let input = self.build_input();
        resolve::resolve(input, session, asker)
    }
}

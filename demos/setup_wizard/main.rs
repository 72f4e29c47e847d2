//! # promptfig setup wizard
//!
//! A sample provisioning script that showcases how to capture settings with
//! promptfig. It does not provision anything; it exists to demonstrate and
//! manually verify the library's behavior.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example setup_wizard
//! cargo run --example setup_wizard -- --env=production -h db.internal
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                  | How to exercise it                                              |
//! |--------------------------|-----------------------------------------------------------------|
//! | Prompt for everything    | `cargo run --example setup_wizard`                              |
//! | Flags skip prompts       | `cargo run --example setup_wizard -- --port 3307 --verbose`     |
//! | Accumulated errors       | `cargo run --example setup_wizard -- --port=abc --bogus`        |
//! | Env defaults             | `SETUP_SERVER_HOSTNAME=db cargo run --example setup_wizard`     |
//! | Non-interactive          | `cargo run --example setup_wizard -- --yes`                     |
//! | Masked password          | Type at the `MySQL Password` prompt                             |
//! | Password retry           | Enter `wrong` as the admin password                             |
//! | Help from schemas        | `cargo run --example setup_wizard -- --help`                    |
//! | Logging                  | `RUST_LOG=promptfig=debug cargo run --example setup_wizard`      |

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use promptfig::{Capture, CaptureError, Session, ValueSchema};

const ADMIN_PASSWORD_ATTEMPTS: u32 = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Settings {
    node_env: String,
    server_hostname: String,
    #[serde(rename = "port")]
    port: u16,
    #[serde(rename = "verbose")]
    verbose: bool,
}

fn schemas() -> Vec<ValueSchema> {
    vec![
        ValueSchema::one_of("NODE_ENV", "Environment", ["development", "staging", "production"])
            .flags(["--environment", "--env", "-e"])
            .default_value("development"),
        ValueSchema::string("SERVER_HOSTNAME", "Server Hostname")
            .flags(["--hostname", "-h"])
            .default_value("localhost"),
        ValueSchema::string("MYSQL_PASSWORD", "MySQL Password")
            .flags(["--mysql-password"])
            .masked()
            .required(),
        ValueSchema::number("port", "Port")
            .flags(["--port", "-p"])
            .default_value(3306),
        ValueSchema::boolean("verbose", "Verbose").flags(["--verbose", "-v"]),
    ]
}

fn admin_password() -> ValueSchema {
    ValueSchema::string("MARIADB_ROOT_PASSWORD", "MariaDB Root Password")
        .flags(["--root-password"])
        .masked()
        .required()
}

/// Stand-in for connecting to the database server as root.
fn check_admin_password(password: &str) -> bool {
    password != "wrong"
}

/// Ask for the admin password until it checks out, re-asking on failure.
fn confirm_admin_password(session: &mut Session) -> Result<(), CaptureError> {
    for attempt in 1..=ADMIN_PASSWORD_ATTEMPTS {
        let values = Capture::builder().schema(admin_password()).run(session)?;
        let password = values
            .get("MARIADB_ROOT_PASSWORD")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        if check_admin_password(password) {
            return Ok(());
        }
        eprintln!("Access denied (attempt {attempt} of {ADMIN_PASSWORD_ATTEMPTS}).");
        session.forget("MARIADB_ROOT_PASSWORD");
    }
    Err(CaptureError::InvalidValues {
        reason: "could not authenticate as the database administrator".into(),
    })
}

fn run() -> Result<(), CaptureError> {
    let args: Vec<String> = std::env::args().skip(promptfig::RESERVED_ARGS).collect();
    let schemas = schemas();

    if args.iter().any(|a| a == "--help") {
        print!("{}", promptfig::cli::render_help("setup-wizard", &schemas));
        return Ok(());
    }

    let non_interactive = args.iter().any(|a| a == "--yes");
    let args: Vec<String> = args.into_iter().filter(|a| a != "--yes").collect();

    let mut session = Session::new();
    let mut builder = Capture::builder()
        .schemas(schemas.clone())
        .args(args)
        .env_prefix("SETUP");
    if non_interactive {
        builder = builder.no_prompt();
    }
    let values = builder.run(&mut session)?;

    println!("\nResolved settings:\n{}", values.listing(&schemas));

    let settings: Settings = values.deserialize()?;
    if settings.verbose {
        println!("{settings:#?}");
    }

    if !non_interactive && settings.node_env == "production" {
        confirm_admin_password(&mut session)?;
        println!(
            "Provisioning {} database on {}:{}",
            settings.node_env, settings.server_hostname, settings.port
        );
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(if err.is_configuration() { 2 } else { 1 });
    }
}

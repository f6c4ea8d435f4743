//! ShiftCheck - a terminal front end for laboratory shift handovers.
//!
//! Log in as a technician, review samples awaiting release and hand a
//! selection of them over to the next shift.

mod commands;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shiftcheck_core::api::{build_http_client, ApiClient};
use shiftcheck_core::auth::{KeyringStore, SessionManager};
use shiftcheck_core::config::Config;
use shiftcheck_core::selection::SelectionCoordinator;

/// Directory for rolling log files; stderr only when unset
const LOG_DIR_ENV: &str = "SHIFTCHECK_LOG_DIR";

const USAGE: &str = "\
Usage: shiftcheck <command> [options]

Commands:
  login [username]                       Log in and store the session
  logout                                 Remove the stored session
  whoami                                 Show the logged-in technician
  samples                                List samples awaiting release
  shifts                                 List shifts
  users                                  List active technicians
  handovers [--from DATE] [--to DATE]    List handovers (DATE is YYYY-MM-DD)
  handover --samples ID,ID [--shift ID] [--notes TEXT]
                                         Hand pending samples over to a shift";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: Option<String> },
    Logout,
    WhoAmI,
    Samples,
    Shifts,
    Users,
    Handovers {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Handover {
        sample_ids: Vec<i64>,
        shift_id: Option<i64>,
        notes: String,
    },
    Help,
}

/// Everything a command needs, wired once at startup
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub api: ApiClient,
    pub selection: Arc<SelectionCoordinator>,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match std::env::var_os(LOG_DIR_ENV).map(PathBuf::from) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "shiftcheck.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

fn build_context() -> Result<AppContext> {
    let config = Config::load_with_env();
    let base_url = config.base_url()?;
    let http = build_http_client(config.request_timeout())
        .context("Failed to build HTTP client")?;

    let session = Arc::new(SessionManager::new(
        Arc::new(KeyringStore::new()),
        http.clone(),
        &base_url,
    ));
    let api = ApiClient::new(http, &base_url, session.clone());

    Ok(AppContext {
        config,
        session,
        api,
        selection: Arc::new(SelectionCoordinator::new()),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

fn parse_ids(value: &str) -> Result<Vec<i64>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("Invalid sample id '{}'", s))
        })
        .collect()
}

fn option_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing value for {}", flag))
}

pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(command) = args.first() else {
        return Ok(Command::Help);
    };
    let rest = &args[1..];

    match command.as_str() {
        "login" => Ok(Command::Login {
            username: rest.first().cloned(),
        }),
        "logout" => Ok(Command::Logout),
        "whoami" => Ok(Command::WhoAmI),
        "samples" => Ok(Command::Samples),
        "shifts" => Ok(Command::Shifts),
        "users" => Ok(Command::Users),
        "handovers" => {
            let (mut from, mut to) = (None, None);
            let mut i = 0;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--from" => from = Some(parse_date(option_value(rest, i, "--from")?)?),
                    "--to" => to = Some(parse_date(option_value(rest, i, "--to")?)?),
                    other => bail!("Unknown option '{}'", other),
                }
                i += 2;
            }
            Ok(Command::Handovers { from, to })
        }
        "handover" => {
            let mut sample_ids = Vec::new();
            let mut shift_id = None;
            let mut notes = String::new();
            let mut i = 0;
            while i < rest.len() {
                let value = option_value(rest, i, &rest[i])?;
                match rest[i].as_str() {
                    "--samples" => sample_ids = parse_ids(value)?,
                    "--shift" => {
                        shift_id = Some(
                            value
                                .parse::<i64>()
                                .with_context(|| format!("Invalid shift id '{}'", value))?,
                        )
                    }
                    "--notes" => notes = value.to_string(),
                    other => bail!("Unknown option '{}'", other),
                }
                i += 2;
            }
            Ok(Command::Handover {
                sample_ids,
                shift_id,
                notes,
            })
        }
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    info!(?command, "ShiftCheck starting");
    let mut ctx = build_context()?;
    commands::run(&mut ctx, command).await
}

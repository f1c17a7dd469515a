#![forbid(unsafe_code)]

mod config;
mod error;
mod render;
mod server;

use clap::{Args, Parser, Subcommand};
use config::{DashboardConfig, Overrides};
use cv_core::{NavRequest, Page, sidebar};
use cv_storage::{PlannedQuery, SqliteStore};
use error::DashboardError;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Read-only crime analytics dashboard over a SQLite incident database.
#[derive(Debug, Parser)]
#[command(name = "crimeview", author, version, about, long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true, env = "CRIMEVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite incident database
    #[arg(long, global = true, env = "CRIMEVIEW_DB")]
    db: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the sidebar navigation model
    Pages,
    /// Render one page and print it as JSON
    Render(PageArgs),
    /// Print the queries a page render would run
    Plan(PageArgs),
    /// Serve the JSON API over HTTP
    Serve {
        /// Listen address (host:port)
        #[arg(long, env = "CRIMEVIEW_LISTEN")]
        listen: Option<String>,
    },
}

#[derive(Debug, Args)]
struct PageArgs {
    /// Page slug or sidebar title
    #[arg(long, default_value = "overview")]
    page: String,
    #[arg(long)]
    district: Option<String>,
    #[arg(long)]
    location: Option<String>,
    /// FAQ question text or its 1-based number
    #[arg(long)]
    question: Option<String>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl PageArgs {
    fn nav_request(&self) -> Result<NavRequest, DashboardError> {
        Ok(NavRequest {
            page: Page::parse(&self.page)?,
            district: self.district.clone(),
            location: self.location.clone(),
            question: self.question.clone(),
        })
    }
}

pub(crate) fn request_json(request: &NavRequest) -> Value {
    json!({
        "page": request.page.slug(),
        "district": request.district,
        "location": request.location,
        "question": request.question,
    })
}

pub(crate) fn planned_json(planned: &PlannedQuery) -> Value {
    json!({
        "name": planned.name,
        "sql": planned.sql.trim(),
        "params": planned.params,
    })
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("crimeview={level},cv_storage={level},cv_core={level}").into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json(value: &impl serde::Serialize, pretty: bool) -> Result<(), DashboardError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn run(cli: Cli) -> Result<(), DashboardError> {
    let listen = match &cli.command {
        Command::Serve { listen } => listen.clone(),
        _ => None,
    };
    let config = DashboardConfig::load(
        cli.config.as_deref(),
        Overrides {
            database: cli.db,
            listen,
        },
    )?;

    match cli.command {
        Command::Pages => print_json(&sidebar(), false),
        Command::Render(args) => {
            let view = render::render_request(&config, &args.nav_request()?)?;
            print_json(&view, args.pretty)
        }
        Command::Plan(args) => {
            let request = args.nav_request()?;
            let planned = render::explain_request(&config, &request)?;
            let out = json!({
                "request": request_json(&request),
                "queries": planned.iter().map(planned_json).collect::<Vec<_>>(),
            });
            print_json(&out, args.pretty)
        }
        Command::Serve { .. } => {
            let store = SqliteStore::open(config.database()?)?;
            info!(database = %store.path().display(), "store preflight passed");
            drop(store);
            server::serve(&config)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(code = err.code(), "{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

//! Command-line front end for dynacall.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dynacall_config::DynacallConfig;
use dynacall_core::Value;
use dynacall_engine::{Request, RpcServer, ServerLimits, builtins, serve};

#[derive(Parser, Debug)]
#[command(name = "dynacall", version)]
#[command(about = "Invoke methods on built-in endpoints by name")]
struct Cli {
    /// Config file (default: ~/.dynacall/config.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call a method and print its results as a JSON array.
    Call {
        method: String,
        /// Arguments as JSON; anything that does not parse is passed as a string.
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the JSON request for a call without running it.
    Request {
        method: String,
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Serve newline-delimited JSON requests on stdin/stdout.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config);

    match cli.command {
        Command::Call { method, args } => {
            let server = build_server(&config)?;
            let request = Request::new(method, parse_args(&args));
            match server.dispatch(&request) {
                Ok(results) => {
                    println!("{}", serde_json::to_string(&results)?);
                    Ok(())
                }
                Err(err) => bail!("{}: {err}", request.method),
            }
        }
        Command::Request { method, args } => {
            let request = Request::new(method, parse_args(&args));
            println!("{}", request.to_json()?);
            Ok(())
        }
        Command::Serve => {
            let server = Arc::new(build_server(&config)?);
            let stats = serve(
                server,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
                config.max_in_flight(),
            )
            .await
            .context("serve loop failed")?;
            tracing::debug!(?stats, "Exiting");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DynacallConfig> {
    match path {
        Some(path) => DynacallConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(DynacallConfig::load()?.unwrap_or_default()),
    }
}

/// Install the subscriber. Logs go to the configured file, or stderr; stdout
/// carries results only.
fn init_tracing(config: &DynacallConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let mut warning = None;
    if let Some(path) = config.log_file() {
        match open_log_file(&path) {
            Ok(file) => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                    .with(env_filter)
                    .init();
                tracing::info!(path = %path.display(), "Logging initialized");
                return;
            }
            Err(err) => warning = Some(format!("{err:#}")),
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log dir {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

fn build_server(config: &DynacallConfig) -> Result<RpcServer> {
    let mut server = RpcServer::default().with_limits(ServerLimits {
        max_request_bytes: config.max_request_bytes(),
    });
    for name in config.endpoints() {
        let endpoint = builtins::by_name(&name).with_context(|| {
            format!(
                "unknown endpoint `{name}` (expected one of: {})",
                builtins::BUILTIN_ENDPOINTS.join(", ")
            )
        })?;
        server = server.with_endpoint(endpoint);
    }
    Ok(server)
}

fn parse_args(raw: &[String]) -> Vec<Value> {
    raw.iter().map(|arg| parse_arg(arg)).collect()
}

fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::Str(raw.to_string()))
}

//! Command-line entry point: reads one JSON `PricingRequest` and prints the JSON response.
//!
//! ```text
//! openvanilla [REQUEST.json] [--config CONFIG.json]
//! ```
//!
//! The request is read from stdin when no path is given. Pricing failures are printed as
//! `{"error": {"kind": ..., "message": ...}}` with exit status 1. Log verbosity follows
//! `RUST_LOG` (default `info`); logs go to stderr.

use std::error::Error;
use std::io::Read;
use std::process::ExitCode;

use openvanilla::core::{PricingError, from_json, to_json_pretty};
use openvanilla::pricing::{EngineConfig, PricingRequest, handle_request};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a PricingError,
}

struct Args {
    request: Option<String>,
    config: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut request = None;
    let mut config = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(it.next().ok_or("--config needs a path")?);
            }
            "-h" | "--help" => {
                return Err("usage: openvanilla [REQUEST.json] [--config CONFIG.json]".to_string());
            }
            _ if request.is_none() => request = Some(arg),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }
    Ok(Args { request, config })
}

fn run(args: &Args) -> Result<bool, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    let payload = match &args.request {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let request: PricingRequest = from_json(&payload)?;
    tracing::debug!(?request, "request parsed");

    match handle_request(&config, &request) {
        Ok(response) => {
            println!("{}", to_json_pretty(&response)?);
            Ok(true)
        }
        Err(error) => {
            tracing::warn!(%error, "pricing request failed");
            println!("{}", to_json_pretty(&ErrorBody { error: &error })?);
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %err, "openvanilla failed");
            ExitCode::from(2)
        }
    }
}

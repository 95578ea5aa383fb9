//! defaultbackend binary.
//!
//! A webserver that only serves a 404 page. Used as a default backend
//! behind a load balancer or ingress, with `/healthz` liveness and
//! `/metrics` exposition on the side.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use defaultbackend::{config::Config, server};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::parse();

    match server::run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("could not start http server: {err}");
            ExitCode::FAILURE
        }
    }
}

//! tcp-health-check: TCP reachability probe run by the consul agent

use std::process::ExitCode;

use clap::Parser;
use consul_client_cli::commands::probe::{self, ProbeArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    consul_client_cli::logging::init();
    let args = ProbeArgs::parse();
    match probe::run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

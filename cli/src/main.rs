//! consul-client: manages a consul client agent on a machine

use std::process::ExitCode;

use clap::Parser;
use consul_client_cli::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    consul_client_cli::logging::init();
    let cli = Cli::parse();
    cli.run().await
}

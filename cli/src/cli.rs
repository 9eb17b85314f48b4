//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags, UnitFlags};
use crate::application::services::lifecycle::Trigger;
use crate::commands;
use crate::output::{OutputContext, json};

/// Manage a consul client agent joined to a remote cluster
#[derive(Parser)]
#[command(
    name = "consul-client",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Unit name the agent package instance key is derived from
    #[arg(long, global = true, env = "JUJU_UNIT_NAME")]
    pub unit_name: Option<String>,

    /// Toggle file [default: ~/.consul-client/config.yaml]
    #[arg(long, global = true, env = "CONSUL_CLIENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding relation databags [default: ~/.consul-client/relations]
    #[arg(long, global = true, env = "CONSUL_CLIENT_RELATION_DIR")]
    pub relation_dir: Option<PathBuf>,

    /// Address bound on the cluster network
    #[arg(long, global = true, env = "CONSUL_CLIENT_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Root of per-package data directories [default: /var/snap]
    #[arg(long, global = true)]
    pub snap_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Command {
    /// Install the agent package
    Install,

    /// Reconcile configuration on start
    Start,

    /// Reconcile configuration on stop
    Stop,

    /// Disconnect and remove the agent package
    Remove,

    /// Ensure the agent package is present and reconcile
    Upgrade,

    /// Toggles changed; ensure the package is present and reconcile
    ConfigChanged,

    /// Cluster membership data changed
    ClusterChanged,

    /// Notify socket data changed
    NotifyChanged,

    /// Show version
    Version,
}

impl Command {
    fn trigger(self) -> Option<Trigger> {
        match self {
            Self::Install => Some(Trigger::Install),
            Self::Start => Some(Trigger::Start),
            Self::Stop => Some(Trigger::Stop),
            Self::Remove => Some(Trigger::Remove),
            Self::Upgrade => Some(Trigger::Upgrade),
            Self::ConfigChanged => Some(Trigger::ConfigChanged),
            Self::ClusterChanged => Some(Trigger::ClusterChanged),
            Self::NotifyChanged => Some(Trigger::NotifyChanged),
            Self::Version => None,
        }
    }
}

impl Cli {
    /// Execute the CLI command, mapping failures to exit code 1.
    pub async fn run(self) -> ExitCode {
        let Some(trigger) = self.command.trigger() else {
            commands::version::run(self.json);
            return ExitCode::SUCCESS;
        };

        let (json, no_color, quiet) = (self.json, self.no_color, self.quiet);
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            unit: UnitFlags {
                unit_name: self.unit_name,
                config: self.config,
                relation_dir: self.relation_dir,
                bind_address: self.bind_address,
                snap_root: self.snap_root,
            },
        };

        let result = match AppContext::new(flags) {
            Ok(app) => commands::hook::run(&app, trigger).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report_error(&e, json, no_color, quiet);
                ExitCode::FAILURE
            }
        }
    }
}

fn report_error(e: &anyhow::Error, json: bool, no_color: bool, quiet: bool) {
    let message = format!("{e:#}");
    if json {
        match json::format_error(&message, "TRIGGER_FAILED") {
            Ok(out) => println!("{out}"),
            Err(_) => eprintln!("Error: {message}"),
        }
    } else {
        OutputContext::new(no_color, quiet, false).error(&message);
    }
}

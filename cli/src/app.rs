//! Application context — unified state passed to every trigger handler.
//!
//! `AppContext` gathers the unit identity, operator toggles and filesystem
//! locations once, so the trigger command only has to wire infrastructure
//! to the `AgentManager`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::ClientConfig;
use crate::domain::snap::{DEFAULT_SNAP_ROOT, SnapName, SnapPaths};
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Unit identity and location flags.
pub struct UnitFlags {
    /// Unit name the parallel-instance key is derived from.
    pub unit_name: Option<String>,
    /// Toggle file; defaults to `~/.consul-client/config.yaml`.
    pub config: Option<PathBuf>,
    /// Relation data directory; defaults to `~/.consul-client/relations`.
    pub relation_dir: Option<PathBuf>,
    /// Address bound on the cluster network, if any.
    pub bind_address: Option<String>,
    /// Root the agent package's data directory lives under.
    pub snap_root: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub unit: UnitFlags,
}

/// Unified context for one trigger.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode, JSON).
    pub output: OutputContext,
    /// Operator toggles.
    pub settings: ClientConfig,
    /// Agent package name, including the instance key.
    pub snap: SnapName,
    /// Files inside the agent package's data directory.
    pub paths: SnapPaths,
    /// Directory the relation databags are read from.
    pub relation_dir: PathBuf,
    pub bind_address: Option<String>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit name is missing, the home directory
    /// cannot be determined, or the toggle file cannot be parsed.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let output = OutputContext::new(flags.output.no_color, flags.output.quiet, flags.output.json);
        let unit = flags.unit;

        let unit_name = unit
            .unit_name
            .filter(|n| !n.is_empty())
            .context("unit name is required (--unit-name or JUJU_UNIT_NAME)")?;

        let config_path = match unit.config {
            Some(path) => path,
            None => YamlConfigStore::default_path()?,
        };
        let settings = YamlConfigStore::new(config_path).load()?;

        let relation_dir = match unit.relation_dir {
            Some(dir) => dir,
            None => default_relation_dir()?,
        };

        let snap = SnapName::for_unit(&unit_name)?;
        let snap_root = unit
            .snap_root
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAP_ROOT));
        let paths = SnapPaths::new(&snap_root, &snap);

        Ok(Self {
            output,
            settings,
            snap,
            paths,
            relation_dir,
            bind_address: unit.bind_address.filter(|a| !a.is_empty()),
        })
    }
}

/// `~/.consul-client/relations`
fn default_relation_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".consul-client").join("relations"))
}

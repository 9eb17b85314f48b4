//! Trigger commands, one agent manager cycle per invocation.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lifecycle::{AgentManager, Trigger};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::LocalFs;
use crate::infra::host::SystemHost;
use crate::infra::relation::JsonRelationSource;
use crate::infra::snap::SnapCtl;
use crate::output::TerminalReporter;

/// Run the handler for `trigger` against the real host.
///
/// # Errors
///
/// Returns an error if the cycle could not complete. Blocked statuses are
/// reported, not returned.
pub async fn run(app: &AppContext, trigger: Trigger) -> Result<()> {
    let snap = SnapCtl::new(TokioCommandRunner::default(), app.snap.clone());
    let files = LocalFs::with_sibling_probe()?;
    let relations = JsonRelationSource::new(app.relation_dir.clone());
    let reporter = TerminalReporter::new(&app.output);

    let manager = AgentManager {
        snap: &snap,
        files: &files,
        relations: &relations,
        host: &SystemHost,
        reporter: &reporter,
        settings: &app.settings,
        paths: &app.paths,
        bind_address: app.bind_address.as_deref(),
    };
    manager.handle(trigger).await
}

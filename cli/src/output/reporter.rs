//! `TerminalReporter` — Presentation-layer implementation of `StatusReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::StatusReporter`
//! trait so application services can publish unit status without depending on
//! any presentation type directly.

use crate::application::ports::StatusReporter;
use crate::domain::status::UnitStatus;
use crate::output::{OutputContext, json};

/// Terminal status reporter that wraps an `OutputContext`.
///
/// - human mode prints a styled status line (suppressed when `ctx.quiet`,
///   unless blocked)
/// - JSON mode prints one status object per line
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl StatusReporter for TerminalReporter<'_> {
    fn set_status(&self, status: &UnitStatus) {
        tracing::debug!(%status, "unit status");
        if self.ctx.json {
            match json::format_status(status) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("cannot render status: {e:#}"),
            }
        } else if let Some(line) = self.ctx.status_line(status) {
            println!("{line}");
        }
    }
}

//! Output formatting module

pub mod json;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::domain::status::UnitStatus;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print machine-readable JSON instead of styled text.
    pub json: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool, json: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && !json && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
            json,
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Render a unit status line.
    ///
    /// Blocked statuses are never suppressed; everything else honours `quiet`.
    #[must_use]
    pub fn status_line(&self, status: &UnitStatus) -> Option<String> {
        if self.quiet && !status.is_blocked() {
            return None;
        }
        let line = match status {
            UnitStatus::Active => format!("  {} active", "✓".style(self.styles.success)),
            UnitStatus::Maintenance(msg) => format!(
                "  {} {} {msg}",
                "→".style(self.styles.info),
                "maintenance:".style(self.styles.dim)
            ),
            UnitStatus::Blocked(msg) => format!(
                "  {} {} {msg}",
                "✗".style(self.styles.error),
                "blocked:".style(self.styles.bold)
            ),
        };
        Some(line)
    }
}

//! Diagnostic logging setup shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` overrides the default `info` filter. Calling this twice is
/// harmless: the second install is ignored.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

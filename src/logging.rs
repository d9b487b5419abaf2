//! Logging bootstrap.
//!
//! Installs a `tracing` fmt subscriber once per process. Later calls are
//! no-ops, so tests and the binary can both call [`init`].

use std::sync::OnceLock;
use tracing::Level;

static INITIALIZED: OnceLock<Level> = OnceLock::new();

/// Install the global subscriber at `level` ("error" .. "trace").
pub fn init(level: &str) -> Result<(), String> {
    let level: Level = level
        .trim()
        .parse()
        .map_err(|_| format!("unsupported log level `{level}`"))?;

    INITIALIZED.get_or_init(|| {
        // Another subscriber may already be installed (e.g. by a test harness).
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .try_init();
        tracing::info!(
            %level,
            version = env!("CARGO_PKG_VERSION"),
            "logging initialized"
        );
        level
    });
    Ok(())
}

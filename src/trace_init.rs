//! Optional JSON trace log for host apps, written to a daily rolling file.
//!
//! Filter comes from `NUDI_LOG`, falling back to debug for this crate and
//! `nudi_core`. Without the `trace` feature nothing is installed.

use std::io;
use std::path::Path;

#[cfg(feature = "trace")]
mod subscriber {
    use std::fs;
    use std::io;
    use std::path::Path;
    use std::sync::OnceLock;

    use tracing_appender::non_blocking::WorkerGuard;
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    const FILTER_ENV: &str = "NUDI_LOG";
    const DEFAULT_FILTER: &str = "nudi_engine=debug,nudi_core=debug";

    /// Flushes the writer thread when the process exits.
    static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

    pub fn install(log_dir: &Path) -> io::Result<()> {
        if GUARD.get().is_some() {
            return Ok(());
        }
        fs::create_dir_all(log_dir)?;
        let appender = tracing_appender::rolling::daily(log_dir, "nudi-trace.jsonl");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let filter = EnvFilter::try_from_env(FILTER_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let layer = fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE);

        // A host that installed its own subscriber keeps it.
        if tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .is_ok()
        {
            let _ = GUARD.set(guard);
        }
        Ok(())
    }
}

#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) -> io::Result<()> {
    subscriber::install(log_dir)
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &Path) -> io::Result<()> {
    Ok(())
}

//! Global tracing setup for the binary.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, fmt};

/// RFC3339 UTC timer implemented via `chrono` (no extra features).
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        // Keep timestamps compact: no fractional seconds, Z-suffix
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Installs the global subscriber: `RUST_LOG` filter with an `info`
/// fallback, compact single-line output, ANSI only on a terminal.
///
/// # Errors
/// Fails when a global subscriber was already installed.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_ansi = io::stdout().is_terminal();

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_timer(ChronoRfc3339Utc)
            .with_target(false)
            .with_ansi(use_ansi),
    );

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

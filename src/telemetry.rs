//! Tracing initialisation for the `podcheck` binary.
//!
//! The subscriber receives the run's diagnostics, all on **stderr** so that stdout only
//! carries the comparison report:
//!
//! - `INFO`: resolved report paths, the per-report record counts, and the RMS pass being
//!   skipped under `--fail-fast`,
//! - `WARN`: each pair whose difference is not below the error margin (logged before the
//!   violation is recorded), identifier mismatches, unpaired records, and the number of
//!   extra records skipped under positional pairing,
//! - `DEBUG` (`-v`): per-file extraction results.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber for the podcheck events above.
///
/// * `json` – `--json-logs`: one JSON object per event, with the `report`, `identifier`
///   and `tolerance` fields kept structured.
/// * `level` – `DEBUG` with `-v`, `INFO` otherwise; `RUST_LOG` takes precedence.
///
/// Only the first call takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}

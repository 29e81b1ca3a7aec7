//! Logging bootstrap for binaries and tests embedding the run state

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Build the filter used by [`init`]
///
/// `RUST_LOG` wins when set; otherwise `debug` when verbose, `info` when not.
pub fn env_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Install a global fmt subscriber
///
/// Returns an error if a global subscriber is already set.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(verbose))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install a subscriber that writes through the test harness, ignoring repeats
pub fn init_for_tests() {
    let _ = FmtSubscriber::builder()
        .with_env_filter(env_filter(true))
        .with_test_writer()
        .try_init();
}

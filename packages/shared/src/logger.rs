//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when it is set. Otherwise everything logs at `info` and the
/// crate named `crate_name` logs at `default_level`.
///
/// Calling this twice is harmless: the second call logs a warning and keeps the
/// first subscriber.
pub fn setup_logger(crate_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(crate_name, default_level)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .try_init();

    if let Err(e) = result {
        tracing::warn!("Logger already initialized: {}", e);
    }
}

/// `info` for everything, `default_level` for `crate_name`.
///
/// Cargo names with dashes are turned into their `snake_case` target form.
fn default_directives(crate_name: &str, default_level: &str) -> String {
    let target = crate_name.replace('-', "_");
    format!("info,{target}={default_level}")
}

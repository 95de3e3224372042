//! Logging setup
//!
//! Logs go to stderr so that `--json` output on stdout stays machine
//! readable. `RUST_LOG` takes precedence over the `-v` count.

use tracing_subscriber::{fmt, EnvFilter};

/// Default directive for a given `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info,unit_converter_lib=debug",
        _ => "debug",
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbosity)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

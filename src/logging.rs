//! Logging initialization.
//!
//! Verbosity flags map to a tracing level filter; the `WEFT_LOG`
//! environment variable takes precedence when set, using the usual
//! `EnvFilter` directive syntax. Diagnostics go to stderr so stdout
//! stays clean for command output and `--json`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive string.
pub const ENV_FILTER_VAR: &str = "WEFT_LOG";

/// Install the global tracing subscriber.
///
/// `verbose` counts `-v` occurrences (0 = warn, 1 = info, 2 = debug,
/// 3+ = trace); `quiet` wins over `verbose` and shows errors only.
/// An explicit `filter` overrides both, as does `WEFT_LOG`.
///
/// # Errors
///
/// Returns an error string if a subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool, filter: Option<&str>) -> Result<(), String> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let env_filter = match filter {
        Some(directives) => EnvFilter::try_new(directives).map_err(|e| e.to_string())?,
        None => EnvFilter::try_from_env(ENV_FILTER_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| e.to_string())
}

//! Diagnostic logging to standard error.
//!
//! Standard output belongs to the deployment pipeline, so every log record
//! goes to standard error. `RUST_LOG` selects the filter; without it only
//! warnings and errors are shown, and `--verbose` enables debug records for
//! this crate.

use env_logger::{Builder, Env, Target};
use log::{LevelFilter, SetLoggerError};

/// Installs the global logger.
///
/// # Errors
///
/// Returns [`SetLoggerError`] when a logger has already been installed.
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_module("slguest", LevelFilter::Debug);
    }
    builder.target(Target::Stderr).format_timestamp(None).try_init()
}

//! Environment isolation for binary-level tests.

use assert_cmd::Command;

const INHERITED: &[&str] = &[
    "SL_USERNAME",
    "SL_API_KEY",
    "SL_ENDPOINT_URL",
    "SL_POLL_INTERVAL_SECS",
    "SL_REQUEST_TIMEOUT_SECS",
    "SLGUEST_CONFIG_PATH",
    "RUST_LOG",
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
];

/// Clears inherited settings and points the command at `endpoint` with no
/// pause between status checks.
pub fn isolate(cmd: &mut Command, endpoint: &str) {
    for name in INHERITED {
        cmd.env_remove(name);
    }
    cmd.env("SL_ENDPOINT_URL", endpoint)
        .env("SL_POLL_INTERVAL_SECS", "0")
        .env("SL_REQUEST_TIMEOUT_SECS", "5");
}

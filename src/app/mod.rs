//! Program flows behind `slguest-create` and `slguest-cancel`.
//!
//! Each flow returns the process exit code and writes to caller-supplied
//! streams so the binaries stay thin and the flows can be exercised with
//! in-memory buffers.

use std::io::Write;

use clap::CommandFactory;
use log::debug;

use crate::backend::{Backend, InstanceHandle, InstanceRequest, ProviderFault};
use crate::cancel::cancel_instance;
use crate::cli::{CancelCli, CreateCli};
use crate::config::SoftLayerConfig;
use crate::provision::ProvisionOrchestrator;
use crate::softlayer::{Credentials, SoftLayerBackend};

/// Exit code used when a required flag is missing or unusable.
pub const USAGE_EXIT_CODE: i32 = -1;

/// Exit code used for local failures such as unusable configuration.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// A required flag that was absent or blank.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MissingFlag {
    /// Label used in the error line (for example `API key`).
    pub label: &'static str,
}

/// Returns the trimmed flag value, or the flag label when it is absent or
/// blank.
///
/// # Errors
///
/// Returns [`MissingFlag`] when `value` is `None` or whitespace only.
pub fn require(value: Option<&str>, label: &'static str) -> Result<String, MissingFlag> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(MissingFlag { label }),
    }
}

/// Writes the usage failure for `message` followed by the program help.
pub fn write_usage_error(mut out: impl Write, message: &str, help: &str) {
    writeln!(out, "ERROR: {message}").ok();
    writeln!(out, "{help}").ok();
}

/// Writes the two-line fault report for a failed remote call.
pub fn write_fault(mut out: impl Write, fault: &dyn ProviderFault) {
    writeln!(out, "Received exception: {}", fault.fault_code()).ok();
    writeln!(out, "Exception details: {}", fault.fault_string()).ok();
}

fn write_connecting(mut out: impl Write, username: &str) {
    writeln!(out, "Connecting to SoftLayer as {username}").ok();
}

fn write_local_error(mut err: impl Write, error: &dyn std::fmt::Display) {
    writeln!(err, "{error}").ok();
}

struct CreateArgs {
    credentials: Credentials,
    hostname: String,
    domain: String,
}

fn create_args(cli: &CreateCli) -> Result<CreateArgs, MissingFlag> {
    let username = require(cli.username.as_deref(), "Username")?;
    let api_key = require(cli.api_key.as_deref(), "API key")?;
    let hostname = require(cli.hostname.as_deref(), "Hostname")?;
    let domain = require(cli.domainname.as_deref(), "Domain name")?;
    Ok(CreateArgs {
        credentials: Credentials { username, api_key },
        hostname,
        domain,
    })
}

fn connect(
    credentials: Credentials,
    err: &mut impl Write,
) -> Option<(SoftLayerBackend, SoftLayerConfig)> {
    let config = match SoftLayerConfig::load_without_cli_args() {
        Ok(config) => config,
        Err(error) => {
            write_local_error(&mut *err, &error);
            return None;
        }
    };
    debug!("using SoftLayer endpoint {}", config.endpoint_url);
    match SoftLayerBackend::new(&config, credentials) {
        Ok(backend) => Some((backend, config)),
        Err(error) => {
            write_local_error(&mut *err, &error);
            None
        }
    }
}

/// Runs `slguest-create`.
pub async fn run_create(cli: CreateCli, out: &mut impl Write, err: &mut impl Write) -> i32 {
    let args = match create_args(&cli) {
        Ok(args) => args,
        Err(missing) => {
            let help = CreateCli::command().render_help().to_string();
            write_usage_error(&mut *out, &format!("{} is required", missing.label), &help);
            return USAGE_EXIT_CODE;
        }
    };

    write_connecting(&mut *out, &args.credentials.username);
    let Some((backend, config)) = connect(args.credentials, &mut *err) else {
        return FAILURE_EXIT_CODE;
    };

    let request = match InstanceRequest::builder()
        .hostname(args.hostname)
        .domain(args.domain)
        .cpus(cli.cpus)
        .memory_mb(cli.memory)
        .hourly_billing(cli.billing)
        .os_code(cli.os_code)
        .build()
    {
        Ok(request) => request,
        Err(error) => {
            write_local_error(&mut *err, &error);
            return FAILURE_EXIT_CODE;
        }
    };

    let orchestrator =
        ProvisionOrchestrator::new(backend).with_poll_interval(config.poll_interval());
    provision_and_report(&orchestrator, &request, out, err).await
}

/// Provisions `request` and publishes the result.
///
/// On success the `KEY=VALUE` lines are written to `out`. Remote faults are
/// reported on `out` and still exit with status 0; local write failures go
/// to `err` with status 1.
pub async fn provision_and_report<B: Backend>(
    orchestrator: &ProvisionOrchestrator<B>,
    request: &InstanceRequest,
    out: &mut impl Write,
    err: &mut impl Write,
) -> i32 {
    match orchestrator.execute(request, &mut *out).await {
        Ok(instance) => match instance.write_properties(&mut *out) {
            Ok(()) => 0,
            Err(error) => {
                write_local_error(&mut *err, &error);
                FAILURE_EXIT_CODE
            }
        },
        Err(error) => match error.fault() {
            Some(fault) => {
                debug!("provisioning failed: {error}");
                write_fault(&mut *out, fault);
                0
            }
            None => {
                write_local_error(&mut *err, &error);
                FAILURE_EXIT_CODE
            }
        },
    }
}

/// Runs `slguest-cancel`.
pub async fn run_cancel(cli: CancelCli, out: &mut impl Write, err: &mut impl Write) -> i32 {
    let help = || CancelCli::command().render_help().to_string();
    let checked = require(cli.username.as_deref(), "Username").and_then(|username| {
        let api_key = require(cli.api_key.as_deref(), "API key")?;
        let id = require(cli.id.as_deref(), "ID")?;
        Ok((Credentials { username, api_key }, id))
    });
    let (credentials, raw_id) = match checked {
        Ok(values) => values,
        Err(missing) => {
            write_usage_error(&mut *out, &format!("{} is required", missing.label), &help());
            return USAGE_EXIT_CODE;
        }
    };
    let Ok(id) = raw_id.parse::<u64>() else {
        write_usage_error(
            &mut *out,
            &format!("ID must be a numeric instance identifier, got '{raw_id}'"),
            &help(),
        );
        return USAGE_EXIT_CODE;
    };

    write_connecting(&mut *out, &credentials.username);
    let Some((backend, _)) = connect(credentials, &mut *err) else {
        return FAILURE_EXIT_CODE;
    };
    cancel_and_report(&backend, InstanceHandle { id }, out, err).await
}

/// Cancels `handle` and reports the outcome.
///
/// Both verdicts and remote faults exit with status 0; local write failures
/// exit with status 1.
pub async fn cancel_and_report<B: Backend>(
    backend: &B,
    handle: InstanceHandle,
    out: &mut impl Write,
    err: &mut impl Write,
) -> i32 {
    match cancel_instance(backend, handle, &mut *out).await {
        Ok(_) => 0,
        Err(error) => match error.fault() {
            Some(fault) => {
                write_fault(&mut *out, fault);
                0
            }
            None => {
                write_local_error(&mut *err, &error);
                FAILURE_EXIT_CODE
            }
        },
    }
}

//! Command-line interface definitions for the `slguest` programs.
//!
//! This module holds only the clap parser structures so the build script can
//! reuse them when generating the manual pages.
//!
//! Required flags are declared as optional here and checked by the programs
//! themselves, which report the first missing one and exit with status -1.

use clap::Parser;

/// Arguments for `slguest-create`.
#[derive(Clone, Debug, Parser)]
#[command(
    name = "slguest-create",
    version,
    about = "Order a SoftLayer virtual guest and wait until it is provisioned",
    long_about = "Order a SoftLayer virtual guest, poll until its provisioning \
                  transaction completes, and print ID=, USERNAME=, PASSWORD= and \
                  IPADDRESS= lines for the deployment pipeline."
)]
pub struct CreateCli {
    /// Username of the SoftLayer account (required)
    #[arg(short = 'u', long = "username", env = "SL_USERNAME", value_name = "USERNAME")]
    pub username: Option<String>,
    /// API key of the SoftLayer account (required)
    #[arg(
        short = 'k',
        long = "api_key",
        env = "SL_API_KEY",
        hide_env_values = true,
        value_name = "API_KEY"
    )]
    pub api_key: Option<String>,
    /// Hostname to be provided to the new instance (required)
    #[arg(short = 'n', long = "hostname", value_name = "HOSTNAME")]
    pub hostname: Option<String>,
    /// Domain name to be provided to the new instance (required)
    #[arg(short = 'd', long = "domainname", value_name = "DOMAIN")]
    pub domainname: Option<String>,
    /// Number of CPUs requested for the new instance
    #[arg(short = 'c', long = "cpus", default_value_t = 1, value_name = "COUNT")]
    pub cpus: u32,
    /// Memory requested for the new instance, in megabytes
    #[arg(short = 'm', long = "memory", default_value_t = 1024, value_name = "MB")]
    pub memory: u32,
    /// Hourly billing: true or false (hourly and monthly are also accepted)
    #[arg(
        short = 'b',
        long = "billing",
        default_value = "true",
        value_name = "BOOL",
        action = clap::ArgAction::Set,
        value_parser = parse_billing
    )]
    pub billing: bool,
    /// Operating system code of the instance (REDHAT, UBUNTU, CENTOS)
    #[arg(short = 'o', long = "os_code", default_value = "CENTOS", value_name = "CODE")]
    pub os_code: String,
    /// Log HTTP requests and polling progress to standard error
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Arguments for `slguest-cancel`.
#[derive(Clone, Debug, Parser)]
#[command(
    name = "slguest-cancel",
    version,
    about = "Cancel a SoftLayer virtual guest"
)]
pub struct CancelCli {
    /// Username of the SoftLayer account (required)
    #[arg(short = 'u', long = "username", env = "SL_USERNAME", value_name = "USERNAME")]
    pub username: Option<String>,
    /// API key of the SoftLayer account (required)
    #[arg(
        short = 'k',
        long = "api_key",
        env = "SL_API_KEY",
        hide_env_values = true,
        value_name = "API_KEY"
    )]
    pub api_key: Option<String>,
    /// Numeric ID of the SoftLayer instance to be canceled (required); other
    /// values are rejected with status -1 before contacting SoftLayer
    #[arg(short = 'i', long = "id", value_name = "ID")]
    pub id: Option<String>,
    /// Log HTTP requests and polling progress to standard error
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parses the billing flag into "bill hourly?".
///
/// # Errors
///
/// Returns a message for clap when the value is not a recognised flag.
pub fn parse_billing(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "hourly" => Ok(true),
        "false" | "monthly" => Ok(false),
        other => Err(format!(
            "expected true, false, hourly or monthly, got '{other}'"
        )),
    }
}

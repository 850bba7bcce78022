//! Orchestrates ordering a guest and waiting for it to be provisioned.
//!
//! The workflow orders a guest via a backend, polls its latest transaction on
//! a fixed interval until the provider reports `COMPLETE`, then reads the
//! connection details and hands back the values the deployment pipeline
//! consumes. Progress is written line by line to the supplied writer.

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio::time::sleep;

use crate::backend::{Backend, ConnectionDetails, InstanceHandle, InstanceRequest, ProviderFault};

/// Status assumed before the first poll.
pub const INITIAL_STATUS: &str = "PENDING";

/// Transaction status that ends the polling loop.
pub const TERMINAL_STATUS: &str = "COMPLETE";

const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Errors surfaced while provisioning a guest.
#[derive(Debug, Error)]
pub enum ProvisionError<BackendError>
where
    BackendError: std::error::Error + 'static,
{
    /// Raised when the order is rejected.
    #[error("failed to order instance: {0}")]
    Create(#[source] BackendError),
    /// Raised when a status check fails.
    #[error("failed to check status of instance {id}: {source}")]
    Status {
        /// Guest being polled.
        id: u64,
        /// Provider-specific error.
        #[source]
        source: BackendError,
    },
    /// Raised when the connection details cannot be read.
    #[error("failed to read connection details of instance {id}: {source}")]
    Details {
        /// Guest being inspected.
        id: u64,
        /// Provider-specific error.
        #[source]
        source: BackendError,
    },
    /// Raised when progress cannot be written.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl<E> ProvisionError<E>
where
    E: std::error::Error + ProviderFault + 'static,
{
    /// Returns the provider fault behind this error, if the failure came from
    /// a remote call.
    #[must_use]
    pub const fn fault(&self) -> Option<&E> {
        match self {
            Self::Create(source) | Self::Status { source, .. } | Self::Details { source, .. } => {
                Some(source)
            }
            Self::Output(_) => None,
        }
    }
}

/// Warning emitted when the provider omits a connection detail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DetailWarning {
    /// No primary IP address was reported.
    MissingIpAddress,
    /// The first credential carried no username.
    MissingUsername,
    /// The first credential carried no password.
    MissingPassword,
}

impl fmt::Display for DetailWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingIpAddress => "No primary IP address returned by SoftLayer",
            Self::MissingUsername => "No username provided by SoftLayer",
            Self::MissingPassword => "No password provided by SoftLayer",
        };
        write!(f, "WARNING: {text}")
    }
}

/// Values published for a provisioned guest.
///
/// Absent details are represented by empty strings so the published property
/// set always has the same shape.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProvisionedInstance {
    /// Provider identifier.
    pub id: u64,
    /// Operating system login name.
    pub username: String,
    /// Operating system password.
    pub password: String,
    /// Primary IP address.
    pub ip_address: String,
}

impl ProvisionedInstance {
    /// Builds the published values from raw connection details, returning
    /// the warnings for every detail the provider left out.
    ///
    /// Missing username and password are only reported when a credential
    /// entry exists; a guest with no credentials yields empty values
    /// silently.
    #[must_use]
    pub fn from_details(id: u64, details: ConnectionDetails) -> (Self, Vec<DetailWarning>) {
        let mut warnings = Vec::new();

        let ip_address = details.primary_ip.unwrap_or_else(|| {
            warnings.push(DetailWarning::MissingIpAddress);
            String::new()
        });

        let first = details
            .credentials
            .and_then(|credentials| credentials.into_iter().next());
        let (username, password) = match first {
            Some(credential) => {
                let username = credential.username.unwrap_or_else(|| {
                    warnings.push(DetailWarning::MissingUsername);
                    String::new()
                });
                let password = credential.password.unwrap_or_else(|| {
                    warnings.push(DetailWarning::MissingPassword);
                    String::new()
                });
                (username, password)
            }
            None => (String::new(), String::new()),
        };

        (
            Self {
                id,
                username,
                password,
                ip_address,
            },
            warnings,
        )
    }

    /// Returns the `KEY=VALUE` lines consumed by the deployment pipeline, in
    /// publication order.
    #[must_use]
    pub fn properties(&self) -> [String; 4] {
        [
            format!("ID={}", self.id),
            format!("USERNAME={}", self.username),
            format!("PASSWORD={}", self.password),
            format!("IPADDRESS={}", self.ip_address),
        ]
    }

    /// Writes the `KEY=VALUE` lines to `out`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when writing fails.
    pub fn write_properties(&self, mut out: impl Write) -> io::Result<()> {
        for line in self.properties() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/// Executes the provisioning flow using the provided backend.
#[derive(Debug)]
pub struct ProvisionOrchestrator<B> {
    backend: B,
    poll_interval: Duration,
}

impl<B> ProvisionOrchestrator<B>
where
    B: Backend,
{
    /// Creates a new orchestrator polling every 30 seconds.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Overrides the pause between status checks.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Orders the guest, waits for provisioning to complete and returns the
    /// values to publish. Progress and warnings are written to `out`; the
    /// `KEY=VALUE` lines are left to the caller.
    ///
    /// Polling has no ceiling: it continues until the terminal status is
    /// observed or a status check fails.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError`] when any remote call fails or `out` cannot
    /// be written.
    pub async fn execute<W: Write>(
        &self,
        request: &InstanceRequest,
        out: &mut W,
    ) -> Result<ProvisionedInstance, ProvisionError<B::Error>> {
        emit(
            out,
            format_args!(
                "Requesting {} VM, FQDN:{}, CPU:{}, Memory:{}, Hourly Billing:{}",
                request.os_reference_code(),
                request.fqdn(),
                request.cpus,
                request.memory_mb,
                request.hourly_billing
            ),
        )?;
        let handle = self
            .backend
            .create(request)
            .await
            .map_err(ProvisionError::Create)?;
        emit(out, format_args!("VM requested with ID: {handle}"))?;

        self.wait_until_complete(handle, out).await?;

        let details = self
            .backend
            .connection_details(handle)
            .await
            .map_err(|source| ProvisionError::Details {
                id: handle.id,
                source,
            })?;
        let (instance, warnings) = ProvisionedInstance::from_details(handle.id, details);
        for warning in warnings {
            emit(out, format_args!("{warning}"))?;
        }
        Ok(instance)
    }

    async fn wait_until_complete<W: Write>(
        &self,
        handle: InstanceHandle,
        out: &mut W,
    ) -> Result<(), ProvisionError<B::Error>> {
        let mut status = String::from(INITIAL_STATUS);
        let mut polls: u64 = 0;

        while status != TERMINAL_STATUS {
            emit(
                out,
                format_args!(
                    "Pausing execution for {} seconds...",
                    self.poll_interval.as_secs()
                ),
            )?;
            sleep(self.poll_interval).await;
            emit(out, format_args!("Checking status of the requested VM"))?;

            polls += 1;
            let observed = self
                .backend
                .status(handle)
                .await
                .map_err(|source| ProvisionError::Status {
                    id: handle.id,
                    source,
                })?;
            debug!("poll {polls} for instance {handle}: {observed:?}");

            match observed.last_transaction {
                Some(name) => {
                    emit(out, format_args!("Recent transaction status: {name}"))?;
                    status = name;
                }
                None => emit(
                    out,
                    format_args!("WARNING: No transaction information provided by SoftLayer"),
                )?,
            }
        }

        Ok(())
    }
}

fn emit<W: Write, E>(out: &mut W, line: fmt::Arguments<'_>) -> Result<(), ProvisionError<E>>
where
    E: std::error::Error + 'static,
{
    writeln!(out, "{line}").map_err(ProvisionError::Output)
}

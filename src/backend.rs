//! Backend abstraction for provisioning and cancelling virtual guests.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Default number of CPUs requested for a new guest.
pub const DEFAULT_CPUS: u32 = 1;

/// Default memory, in megabytes, requested for a new guest.
pub const DEFAULT_MEMORY_MB: u32 = 1024;

/// Default operating system reference code.
pub const DEFAULT_OS_CODE: &str = "CENTOS";

/// Parameters required to order a new virtual guest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceRequest {
    /// Short hostname for the guest.
    pub hostname: String,
    /// Domain appended to the hostname to form the FQDN.
    pub domain: String,
    /// Number of CPUs to allocate.
    pub cpus: u32,
    /// Memory to allocate, in megabytes.
    pub memory_mb: u32,
    /// Whether the guest is billed hourly rather than monthly.
    pub hourly_billing: bool,
    /// Operating system code without the `_LATEST` suffix (for example
    /// `CENTOS`).
    pub os_code: String,
}

impl InstanceRequest {
    /// Starts a builder for an [`InstanceRequest`].
    #[must_use]
    pub fn builder() -> InstanceRequestBuilder {
        InstanceRequestBuilder::new()
    }

    /// Validates the request, returning a descriptive error when a required
    /// field is missing.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] when a string field is empty or a
    /// sizing field is zero.
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.hostname.is_empty() {
            return Err(BackendError::Validation("hostname".to_owned()));
        }
        if self.domain.is_empty() {
            return Err(BackendError::Validation("domain".to_owned()));
        }
        if self.cpus == 0 {
            return Err(BackendError::Validation("cpus".to_owned()));
        }
        if self.memory_mb == 0 {
            return Err(BackendError::Validation("memory_mb".to_owned()));
        }
        if self.os_code.is_empty() {
            return Err(BackendError::Validation("os_code".to_owned()));
        }
        Ok(())
    }

    /// Returns the fully qualified domain name requested for the guest.
    #[must_use]
    pub fn fqdn(&self) -> String {
        format!("{}.{}", self.hostname, self.domain)
    }

    /// Returns the provider reference code for the latest image of the
    /// requested operating system.
    #[must_use]
    pub fn os_reference_code(&self) -> String {
        format!("{}_LATEST", self.os_code)
    }
}

/// Builder for [`InstanceRequest`] applying the documented defaults and
/// deferring trimming and validation to construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceRequestBuilder {
    hostname: String,
    domain: String,
    cpus: u32,
    memory_mb: u32,
    hourly_billing: bool,
    os_code: String,
}

impl Default for InstanceRequestBuilder {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            domain: String::new(),
            cpus: DEFAULT_CPUS,
            memory_mb: DEFAULT_MEMORY_MB,
            hourly_billing: true,
            os_code: DEFAULT_OS_CODE.to_owned(),
        }
    }
}

impl InstanceRequestBuilder {
    /// Creates a builder pre-populated with the default sizing, billing and
    /// operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hostname.
    #[must_use]
    pub fn hostname(mut self, value: impl Into<String>) -> Self {
        self.hostname = value.into();
        self
    }

    /// Sets the domain.
    #[must_use]
    pub fn domain(mut self, value: impl Into<String>) -> Self {
        self.domain = value.into();
        self
    }

    /// Sets the CPU count.
    #[must_use]
    pub const fn cpus(mut self, value: u32) -> Self {
        self.cpus = value;
        self
    }

    /// Sets the memory size in megabytes.
    #[must_use]
    pub const fn memory_mb(mut self, value: u32) -> Self {
        self.memory_mb = value;
        self
    }

    /// Sets the hourly billing flag.
    #[must_use]
    pub const fn hourly_billing(mut self, value: bool) -> Self {
        self.hourly_billing = value;
        self
    }

    /// Sets the operating system code.
    #[must_use]
    pub fn os_code(mut self, value: impl Into<String>) -> Self {
        self.os_code = value.into();
        self
    }

    /// Builds and validates the [`InstanceRequest`], trimming string inputs.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Validation`] when any required field is empty.
    pub fn build(self) -> Result<InstanceRequest, BackendError> {
        let request = InstanceRequest {
            hostname: self.hostname.trim().to_owned(),
            domain: self.domain.trim().to_owned(),
            cpus: self.cpus,
            memory_mb: self.memory_mb,
            hourly_billing: self.hourly_billing,
            os_code: self.os_code.trim().to_owned(),
        };
        request.validate()?;
        Ok(request)
    }
}

/// Handle identifying a guest on the provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct InstanceHandle {
    /// Provider identifier for the guest.
    pub id: u64,
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Provisioning status observed while polling a guest.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstanceStatus {
    /// Name of the most recent transaction status (for example `COMPLETE`),
    /// or `None` when the provider returned no transaction information.
    pub last_transaction: Option<String>,
}

/// Operating system credential reported for a provisioned guest.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OsCredential {
    /// Login name, when reported.
    pub username: Option<String>,
    /// Generated password, when reported.
    pub password: Option<String>,
}

/// Connection details reported for a provisioned guest.
///
/// Every field is optional because the provider omits values it has not yet
/// assigned.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConnectionDetails {
    /// Primary public IP address.
    pub primary_ip: Option<String>,
    /// Credentials listed on the operating system, or `None` when the guest
    /// carried no operating system record.
    pub credentials: Option<Vec<OsCredential>>,
}

/// Errors raised by backends.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum BackendError {
    /// Raised when a request is missing a required field.
    #[error("missing or empty field: {0}")]
    Validation(String),
}

/// Fault description surfaced to the operator when a remote call fails.
///
/// Implemented by backend errors so the command-line programs can print the
/// provider's fault code and message.
pub trait ProviderFault {
    /// Provider fault code (for example `SoftLayer_Exception_NotFound`).
    fn fault_code(&self) -> String;

    /// Human readable fault message.
    fn fault_string(&self) -> String;
}

/// Future returned by backend operations.
pub type BackendFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface implemented by cloud backends.
pub trait Backend {
    /// Provider specific error type returned by the backend.
    type Error: std::error::Error + ProviderFault + Send + Sync + 'static;

    /// Orders a new guest and returns a handle used for subsequent calls.
    fn create<'a>(
        &'a self,
        request: &'a InstanceRequest,
    ) -> BackendFuture<'a, InstanceHandle, Self::Error>;

    /// Reads the latest provisioning transaction of a guest.
    fn status(&self, handle: InstanceHandle) -> BackendFuture<'_, InstanceStatus, Self::Error>;

    /// Reads the IP address and operating system credentials of a guest.
    fn connection_details(
        &self,
        handle: InstanceHandle,
    ) -> BackendFuture<'_, ConnectionDetails, Self::Error>;

    /// Requests cancellation of a guest, returning the provider's verdict.
    fn cancel(&self, handle: InstanceHandle) -> BackendFuture<'_, bool, Self::Error>;
}

//! Core library for the `slguest` provisioning tools.
//!
//! The crate exposes a backend abstraction for ordering, polling and
//! cancelling virtual guests, a SoftLayer implementation that speaks the
//! REST gateway, and the program flows behind `slguest-create` and
//! `slguest-cancel`.

pub mod app;
pub mod backend;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod logging;
pub mod provision;
pub mod softlayer;
pub mod test_support;

pub use backend::{
    Backend, ConnectionDetails, InstanceHandle, InstanceRequest, InstanceRequestBuilder,
    InstanceStatus, OsCredential, ProviderFault,
};
pub use cancel::{CancelError, cancel_instance};
pub use config::{ConfigError, SoftLayerConfig};
pub use provision::{DetailWarning, ProvisionError, ProvisionOrchestrator, ProvisionedInstance};
pub use softlayer::{Credentials, SoftLayerBackend, SoftLayerBackendError};

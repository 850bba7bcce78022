//! Wire representations of `SoftLayer_Virtual_Guest` payloads.

use serde::{Deserialize, Serialize};

use crate::backend::{ConnectionDetails, InstanceRequest, InstanceStatus, OsCredential};

/// Object mask used while polling provisioning progress.
pub(super) const STATUS_MASK: &str = "mask[id,lastTransaction[transactionStatus]]";

/// Object mask used to read connection details once provisioning finishes.
pub(super) const DETAILS_MASK: &str = "mask[id,primaryIpAddress,operatingSystem[passwords]]";

/// Envelope for positional method parameters.
#[derive(Debug, Serialize)]
pub(super) struct Parameters<T> {
    pub(super) parameters: [T; 1],
}

/// Template accepted by `createObject`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(super) struct GuestTemplate {
    pub(super) hostname: String,
    pub(super) domain: String,
    pub(super) start_cpus: u32,
    pub(super) max_memory: u32,
    pub(super) hourly_billing_flag: bool,
    pub(super) operating_system_reference_code: String,
    pub(super) local_disk_flag: bool,
}

impl From<&InstanceRequest> for GuestTemplate {
    fn from(request: &InstanceRequest) -> Self {
        Self {
            hostname: request.hostname.clone(),
            domain: request.domain.clone(),
            start_cpus: request.cpus,
            max_memory: request.memory_mb,
            hourly_billing_flag: request.hourly_billing,
            operating_system_reference_code: request.os_reference_code(),
            local_disk_flag: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedGuest {
    pub(super) id: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GuestStatusView {
    #[serde(default)]
    last_transaction: Option<Transaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Transaction {
    #[serde(default)]
    transaction_status: Option<TransactionStatus>,
}

#[derive(Debug, Deserialize)]
struct TransactionStatus {
    #[serde(default)]
    name: Option<String>,
}

impl From<GuestStatusView> for InstanceStatus {
    fn from(view: GuestStatusView) -> Self {
        Self {
            last_transaction: view
                .last_transaction
                .and_then(|transaction| transaction.transaction_status)
                .and_then(|status| status.name),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GuestDetailsView {
    #[serde(default)]
    primary_ip_address: Option<String>,
    #[serde(default)]
    operating_system: Option<OperatingSystem>,
}

#[derive(Debug, Deserialize)]
struct OperatingSystem {
    #[serde(default)]
    passwords: Option<Vec<Password>>,
}

#[derive(Debug, Deserialize)]
struct Password {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl From<GuestDetailsView> for ConnectionDetails {
    fn from(view: GuestDetailsView) -> Self {
        Self {
            primary_ip: view.primary_ip_address,
            credentials: view.operating_system.map(|os| {
                os.passwords
                    .unwrap_or_default()
                    .into_iter()
                    .map(|entry| OsCredential {
                        username: entry.username,
                        password: entry.password,
                    })
                    .collect()
            }),
        }
    }
}

/// Error body returned with non-success responses.
#[derive(Debug, Deserialize)]
pub(super) struct ApiFault {
    pub(super) error: String,
    #[serde(default)]
    pub(super) code: Option<String>,
}

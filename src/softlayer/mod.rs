//! SoftLayer backend implementation of the virtual guest lifecycle.
//!
//! Calls go to the `SoftLayer_Virtual_Guest` service of the REST gateway
//! using HTTP basic authentication with the account username and API key.

mod error;
mod types;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::backend::{
    Backend, BackendFuture, ConnectionDetails, InstanceHandle, InstanceRequest, InstanceStatus,
};
use crate::config::SoftLayerConfig;
use types::{
    ApiFault, CreatedGuest, DETAILS_MASK, GuestDetailsView, GuestStatusView, GuestTemplate,
    Parameters, STATUS_MASK,
};

pub use error::{LOCAL_FAULT_CODE, SoftLayerBackendError};

const GUEST_SERVICE: &str = "SoftLayer_Virtual_Guest";

/// Account credentials used to authenticate against the API.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// API key issued for the username.
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Backend that provisions guests through the SoftLayer REST API.
#[derive(Clone, Debug)]
pub struct SoftLayerBackend {
    client: Client,
    endpoint: Url,
    credentials: Credentials,
}

impl SoftLayerBackend {
    /// Constructs a new backend from configuration and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SoftLayerBackendError::Config`] when the configuration fails
    /// validation or the HTTP client cannot be built.
    pub fn new(
        config: &SoftLayerConfig,
        credentials: Credentials,
    ) -> Result<Self, SoftLayerBackendError> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| SoftLayerBackendError::Config(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }

    fn guest_url(&self, suffix: &str) -> String {
        format!(
            "{}/{GUEST_SERVICE}/{suffix}",
            self.endpoint.as_str().trim_end_matches('/')
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{method} {url}");
        self.client
            .request(method, url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.api_key))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, SoftLayerBackendError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("{operation} returned {status}");

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|err| SoftLayerBackendError::Decode {
                operation: operation.to_owned(),
                message: err.to_string(),
            });
        }

        Err(fault_from_body(status, &body))
    }

    async fn get_guest<T: DeserializeOwned>(
        &self,
        handle: InstanceHandle,
        mask: &str,
    ) -> Result<T, SoftLayerBackendError> {
        let url = self.guest_url(&format!("{}/getObject.json", handle.id));
        let request = self
            .request(Method::GET, &url)
            .query(&[("objectMask", mask)]);
        self.call("getObject", request).await
    }
}

/// Converts a non-success response into a fault, preferring the structured
/// SoftLayer error body and falling back to the HTTP status.
fn fault_from_body(status: reqwest::StatusCode, body: &[u8]) -> SoftLayerBackendError {
    match serde_json::from_slice::<ApiFault>(body) {
        Ok(fault) => SoftLayerBackendError::Fault {
            code: fault.code.unwrap_or_else(|| status.as_u16().to_string()),
            message: fault.error,
        },
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_owned();
            SoftLayerBackendError::Fault {
                code: status.as_u16().to_string(),
                message: if text.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected response")
                        .to_owned()
                } else {
                    text
                },
            }
        }
    }
}

impl Backend for SoftLayerBackend {
    type Error = SoftLayerBackendError;

    fn create<'a>(
        &'a self,
        request: &'a InstanceRequest,
    ) -> BackendFuture<'a, InstanceHandle, Self::Error> {
        Box::pin(async move {
            request.validate()?;
            let url = self.guest_url("createObject.json");
            let payload = Parameters {
                parameters: [GuestTemplate::from(request)],
            };
            let created: CreatedGuest = self
                .call("createObject", self.request(Method::POST, &url).json(&payload))
                .await?;
            Ok(InstanceHandle { id: created.id })
        })
    }

    fn status(&self, handle: InstanceHandle) -> BackendFuture<'_, InstanceStatus, Self::Error> {
        Box::pin(async move {
            let view: GuestStatusView = self.get_guest(handle, STATUS_MASK).await?;
            Ok(view.into())
        })
    }

    fn connection_details(
        &self,
        handle: InstanceHandle,
    ) -> BackendFuture<'_, ConnectionDetails, Self::Error> {
        Box::pin(async move {
            let view: GuestDetailsView = self.get_guest(handle, DETAILS_MASK).await?;
            Ok(view.into())
        })
    }

    fn cancel(&self, handle: InstanceHandle) -> BackendFuture<'_, bool, Self::Error> {
        Box::pin(async move {
            let url = self.guest_url(&format!("{}.json", handle.id));
            let removed: serde_json::Value = self
                .call("deleteObject", self.request(Method::DELETE, &url))
                .await?;
            Ok(is_truthy(&removed))
        })
    }
}

/// Interprets a method result the way the gateway's scripting clients do:
/// `false`, `null`, zero, and empty values are failures.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(text) => !text.is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
    }
}

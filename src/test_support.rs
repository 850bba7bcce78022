//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::backend::{
    Backend, BackendFuture, ConnectionDetails, InstanceHandle, InstanceRequest, InstanceStatus,
    OsCredential, ProviderFault,
};

/// Fault returned by [`ScriptedBackend`] when a call is scripted to fail.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{code}: {message}")]
pub struct ScriptedFault {
    /// Fault code to report.
    pub code: String,
    /// Fault message to report.
    pub message: String,
}

impl ScriptedFault {
    /// Creates a fault with the given code and message.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl ProviderFault for ScriptedFault {
    fn fault_code(&self) -> String {
        self.code.clone()
    }

    fn fault_string(&self) -> String {
        self.message.clone()
    }
}

/// Record of a call made through [`ScriptedBackend`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BackendCall {
    /// `create` with the submitted request.
    Create(InstanceRequest),
    /// `status` for the given guest.
    Status(u64),
    /// `connection_details` for the given guest.
    ConnectionDetails(u64),
    /// `cancel` for the given guest.
    Cancel(u64),
}

/// Scripted reply for a backend call.
///
/// Holds no `Result`, so BDD step contexts can carry the scripted state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Scripted<T> {
    /// The call succeeds with this value.
    Value(T),
    /// The call fails with this fault.
    Fault(ScriptedFault),
}

impl<T> Scripted<T> {
    /// Converts the scripted reply into the backend call's result.
    ///
    /// # Errors
    ///
    /// Returns the scripted fault for [`Scripted::Fault`].
    pub fn into_result(self) -> Result<T, ScriptedFault> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Fault(fault) => Err(fault),
        }
    }
}

#[derive(Debug)]
struct State {
    next_id: u64,
    create_fault: Option<ScriptedFault>,
    statuses: VecDeque<Scripted<InstanceStatus>>,
    details: Scripted<ConnectionDetails>,
    cancel: Scripted<bool>,
    calls: Vec<BackendCall>,
}

/// Backend double that replays scripted responses in FIFO order and records
/// every call.
///
/// Once the scripted statuses run out, further status checks report
/// `COMPLETE`.
#[derive(Clone, Debug)]
pub struct ScriptedBackend {
    state: Arc<Mutex<State>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    /// Creates a backend that assigns guest ID 1001, completes on the first
    /// poll, and reports full connection details.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 1001,
                create_fault: None,
                statuses: VecDeque::new(),
                details: Scripted::Value(ConnectionDetails {
                    primary_ip: Some(String::from("169.45.10.20")),
                    credentials: Some(vec![OsCredential {
                        username: Some(String::from("root")),
                        password: Some(String::from("Xy7hQ2pa")),
                    }]),
                }),
                cancel: Scripted::Value(true),
                calls: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|err| panic!("scripted backend lock poisoned: {err}"))
    }

    /// Sets the identifier assigned to the next created guest.
    pub fn assign_id(&self, id: u64) {
        self.lock().next_id = id;
    }

    /// Makes `create` fail with the given fault.
    pub fn fail_on_create(&self, fault: ScriptedFault) {
        self.lock().create_fault = Some(fault);
    }

    /// Queues a transaction status; `None` scripts a response without
    /// transaction information.
    pub fn push_status(&self, status: Option<&str>) {
        self.lock().statuses.push_back(Scripted::Value(InstanceStatus {
            last_transaction: status.map(str::to_owned),
        }));
    }

    /// Queues a failing status check.
    pub fn push_status_fault(&self, fault: ScriptedFault) {
        self.lock().statuses.push_back(Scripted::Fault(fault));
    }

    /// Replaces the connection details returned after provisioning.
    pub fn set_details(&self, details: ConnectionDetails) {
        self.lock().details = Scripted::Value(details);
    }

    /// Makes `connection_details` fail with the given fault.
    pub fn fail_on_details(&self, fault: ScriptedFault) {
        self.lock().details = Scripted::Fault(fault);
    }

    /// Sets the verdict returned by `cancel`.
    pub fn set_cancel_result(&self, removed: bool) {
        self.lock().cancel = Scripted::Value(removed);
    }

    /// Makes `cancel` fail with the given fault.
    pub fn fail_on_cancel(&self, fault: ScriptedFault) {
        self.lock().cancel = Scripted::Fault(fault);
    }

    /// Returns every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Counts recorded status checks.
    #[must_use]
    pub fn status_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, BackendCall::Status(_)))
            .count()
    }
}

impl Backend for ScriptedBackend {
    type Error = ScriptedFault;

    fn create<'a>(
        &'a self,
        request: &'a InstanceRequest,
    ) -> BackendFuture<'a, InstanceHandle, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(BackendCall::Create(request.clone()));
            match state.create_fault.clone() {
                Some(fault) => Err(fault),
                None => Ok(InstanceHandle { id: state.next_id }),
            }
        })
    }

    fn status(&self, handle: InstanceHandle) -> BackendFuture<'_, InstanceStatus, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(BackendCall::Status(handle.id));
            state
                .statuses
                .pop_front()
                .unwrap_or_else(|| {
                    Scripted::Value(InstanceStatus {
                        last_transaction: Some(String::from("COMPLETE")),
                    })
                })
                .into_result()
        })
    }

    fn connection_details(
        &self,
        handle: InstanceHandle,
    ) -> BackendFuture<'_, ConnectionDetails, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(BackendCall::ConnectionDetails(handle.id));
            state.details.clone().into_result()
        })
    }

    fn cancel(&self, handle: InstanceHandle) -> BackendFuture<'_, bool, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(BackendCall::Cancel(handle.id));
            state.cancel.clone().into_result()
        })
    }
}

//! Cancels an existing guest.

use std::io::{self, Write};

use thiserror::Error;

use crate::backend::{Backend, InstanceHandle, ProviderFault};

/// Errors surfaced while cancelling a guest.
#[derive(Debug, Error)]
pub enum CancelError<BackendError>
where
    BackendError: std::error::Error + 'static,
{
    /// Raised when the cancellation request fails.
    #[error("failed to cancel instance {id}: {source}")]
    Cancel {
        /// Guest being cancelled.
        id: u64,
        /// Provider-specific error.
        #[source]
        source: BackendError,
    },
    /// Raised when progress cannot be written.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl<E> CancelError<E>
where
    E: std::error::Error + ProviderFault + 'static,
{
    /// Returns the provider fault behind this error, if any.
    #[must_use]
    pub const fn fault(&self) -> Option<&E> {
        match self {
            Self::Cancel { source, .. } => Some(source),
            Self::Output(_) => None,
        }
    }
}

impl<E> From<io::Error> for CancelError<E>
where
    E: std::error::Error + 'static,
{
    fn from(value: io::Error) -> Self {
        Self::Output(value)
    }
}

/// Requests cancellation of `handle` and reports the verdict on `out`.
///
/// Returns whether the provider accepted the cancellation. A rejected
/// cancellation is not an error; it is reported and returned as `false`.
///
/// # Errors
///
/// Returns [`CancelError`] when the remote call fails or `out` cannot be
/// written.
pub async fn cancel_instance<B, W>(
    backend: &B,
    handle: InstanceHandle,
    out: &mut W,
) -> Result<bool, CancelError<B::Error>>
where
    B: Backend,
    W: Write,
{
    writeln!(out, "Requesting cancelation of VM with ID: {handle}")?;
    let removed = backend
        .cancel(handle)
        .await
        .map_err(|source| CancelError::Cancel {
            id: handle.id,
            source,
        })?;

    if removed {
        writeln!(out, "Instance with ID: {handle} removed successfully")?;
    } else {
        writeln!(out, "Instance with ID: {handle} not removed successfully")?;
    }
    Ok(removed)
}

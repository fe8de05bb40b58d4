use thiserror::Error;

/// Errors surfaced to the view. Nothing here is fatal; every variant is
/// scoped to the view or operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    /// Request failed, timed out or returned a non-2xx status.
    #[error("network error: {0}")]
    Network(String),
    /// The server sent a payload that does not fit the model.
    #[error("malformed server data: {0}")]
    DataIntegrity(String),
    /// User input rejected before submission.
    #[error("{0}")]
    Validation(String),
}

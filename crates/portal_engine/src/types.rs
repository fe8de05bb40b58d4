use std::fmt;

use portal_core::{ListItem, Msg, PortalError, TabId, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Fetched {
        ticket: Ticket,
        tab: TabId,
        result: Result<Vec<ListItem>, RemoteError>,
    },
    Confirmed {
        ticket: Ticket,
        confirmed: bool,
    },
    Deleted {
        ticket: Ticket,
        result: Result<(), RemoteError>,
    },
    Upserted {
        ticket: Ticket,
        result: Result<ListItem, RemoteError>,
    },
}

impl EngineEvent {
    /// The message that reports this event to the state machine.
    pub fn into_msg(self) -> Msg {
        match self {
            EngineEvent::Fetched {
                ticket,
                tab,
                result,
            } => Msg::FetchCompleted {
                ticket,
                tab,
                result: result.map_err(PortalError::from),
            },
            EngineEvent::Confirmed { ticket, confirmed } => {
                Msg::ConfirmResolved { ticket, confirmed }
            }
            EngineEvent::Deleted { ticket, result } => Msg::DeleteCompleted {
                ticket,
                result: result.map_err(PortalError::from),
            },
            EngineEvent::Upserted { ticket, result } => Msg::UpsertCompleted {
                ticket,
                result: result.map_err(PortalError::from),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub kind: FailureKind,
    pub message: String,
}

impl RemoteError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} ({})", self.kind, self.message)
        }
    }
}

impl std::error::Error for RemoteError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    /// Body is not the JSON shape the resource expects.
    Decode,
    MissingId,
    DuplicateId { id: String },
}

impl FailureKind {
    /// Malformed payloads, as opposed to transport failures.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            FailureKind::Decode | FailureKind::MissingId | FailureKind::DuplicateId { .. }
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected payload"),
            FailureKind::MissingId => write!(f, "record without id"),
            FailureKind::DuplicateId { id } => write!(f, "duplicate id {id}"),
        }
    }
}

impl From<RemoteError> for PortalError {
    fn from(err: RemoteError) -> Self {
        if err.kind.is_data_integrity() {
            PortalError::DataIntegrity(err.to_string())
        } else {
            PortalError::Network(err.to_string())
        }
    }
}

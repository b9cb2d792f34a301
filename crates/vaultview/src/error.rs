use crate::types::ViewId;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    pub(crate) fn view_not_found(id: ViewId) -> Self {
        Self::new(
            ErrorKind::NotFound,
            ErrorOrigin::View,
            format!("view {id} not found"),
        )
    }

    /// Wrap a port failure, tagged with the layer that issued the round-trip.
    pub(crate) fn store(origin: ErrorOrigin, err: PortError) -> Self {
        Self::new(ErrorKind::Store, origin, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// The requested view does not exist.
    NotFound,

    /// A collaborator store round-trip failed; not retried internally.
    Store,
}

///
/// ErrorOrigin
/// Which engine layer surfaced the failure.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    View,
    Database,
    Acl,
}

///
/// PortError
///
/// Failure surfaced by a collaborator port (view store, database). Any port
/// failure is fatal for the execution that issued it.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PortError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query execution failed: {0}")]
    Query(String),
}

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No session token; nothing was sent.
    Unauthenticated,
    /// The backend answered 401.
    Unauthorized,
    /// A mutation was attempted without a target id; nothing was sent.
    InvalidSelection,
    NotFound,
    Network,
    ServerError(u16),
    /// The response could not be unwrapped or decoded.
    Decode,
    /// A filter value was rejected before any request was built.
    InvalidFilter,
    EmptyExport,
}

impl FailureKind {
    /// Maps a non-success HTTP status onto the taxonomy.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => FailureKind::Unauthorized,
            404 => FailureKind::NotFound,
            other => FailureKind::ServerError(other),
        }
    }

    pub fn requires_sign_in(self) -> bool {
        matches!(
            self,
            FailureKind::Unauthenticated | FailureKind::Unauthorized
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Unauthenticated => write!(f, "not authenticated"),
            FailureKind::Unauthorized => write!(f, "unauthorized"),
            FailureKind::InvalidSelection => write!(f, "invalid selection"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::ServerError(code) => write!(f, "server error {code}"),
            FailureKind::Decode => write!(f, "unexpected response"),
            FailureKind::InvalidFilter => write!(f, "invalid filter"),
            FailureKind::EmptyExport => write!(f, "nothing to export"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::new(
            FailureKind::Unauthenticated,
            "User not authenticated. Please log in.",
        )
    }
}

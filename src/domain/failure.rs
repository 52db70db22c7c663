use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport or connectivity problem; no response was received.
    Network,
    /// Non-2xx response.
    Server { status: u16 },
    /// Response body did not have the expected shape.
    Parse,
    /// 401 from the server.
    Unauthenticated,
}

/// Normalized outcome of any failed API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Server { status }, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Parse, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unauthenticated, message)
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.kind == FailureKind::Unauthenticated
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::Server { status } => Some(status),
            FailureKind::Unauthenticated => Some(401),
            _ => None,
        }
    }
}

//! Lifecycle of a single network operation.

/// Phase of a [`RequestState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The call is outstanding.
    Pending,
    /// The call completed with a success status and a decodable body.
    Succeeded,
    /// The call failed in transport, on the server, or while decoding.
    Failed,
}

/// The result holder for one network operation.
///
/// Data is only present after success and a message only after failure;
/// the two never coexist.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    /// Waiting for the response.
    Pending,
    /// Decoded response payload.
    Succeeded(T),
    /// Human-readable failure message.
    Failed(String),
}

impl<T> RequestState<T> {
    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Pending => Phase::Pending,
            Self::Succeeded(_) => Phase::Succeeded,
            Self::Failed(_) => Phase::Failed,
        }
    }

    /// Returns whether the call is still outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns the response payload, if the call succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Succeeded(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the failure message, if the call failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Consumes the state, returning the payload on success.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Succeeded(data) => Some(data),
            _ => None,
        }
    }

    /// Maps the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RequestState<U> {
        match self {
            Self::Pending => RequestState::Pending,
            Self::Succeeded(data) => RequestState::Succeeded(f(data)),
            Self::Failed(message) => RequestState::Failed(message),
        }
    }
}

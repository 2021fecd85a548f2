//! Error handling.

use std::fmt;

/// Possible errors when talking to a chat platform or collecting messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A collector was requested with neither a time nor a count bound.
    ///
    /// Such a collector would never finish, so it is rejected before it is
    /// registered anywhere.
    UnboundedCollector,

    /// The chat client failed to perform an operation.
    ///
    /// The string is the client's own description of what went wrong.
    Client(String),

    /// Tried to edit or delete the last sent message, but no message has been
    /// sent yet.
    NoMessage,
}

impl Error {
    /// Convenience constructor for [`Self::Client`].
    pub fn client(reason: impl ToString) -> Self {
        Self::Client(reason.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedCollector => write!(
                f,
                "can not collect indefinitely if neither a duration nor an amount is supplied"
            ),
            Self::Client(reason) => write!(f, "chat client error: {reason}"),
            Self::NoMessage => write!(f, "tried to use a message that does not exist"),
        }
    }
}

impl std::error::Error for Error {}

/// An alias of [`Result`](std::result::Result) for [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

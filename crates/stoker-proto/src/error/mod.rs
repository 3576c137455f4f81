//! Error taxonomy for protocol operations.
//!
//! Failures fall into three disjoint kinds: transport errors ([`NetError`]),
//! framing violations ([`FrameError`]), and server-signalled errors
//! ([`ResponseError`]). The kinds are united under [`ClientError`] with
//! transparent display so callers can match on the kind or compare against a
//! canonical rendering. Equality is by kind, and additionally by code and
//! text for response errors.

use std::fmt;
use std::io;

use thiserror::Error;

/// A transport failure while reading or writing bytes.
///
/// End-of-stream conditions carry the canonical message `EOF`; other I/O
/// failures carry the underlying error text. Unexpected EOF mid-reply is a
/// transport error, not a framing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NetError {
    message: String,
}

impl NetError {
    /// Canonical message reported for end-of-stream failures.
    const EOF_MESSAGE: &'static str = "EOF";

    /// Builds a transport error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Builds the canonical end-of-stream error.
    #[must_use]
    pub fn eof() -> Self {
        Self::new(Self::EOF_MESSAGE)
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns whether this error reports end-of-stream.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.message == Self::EOF_MESSAGE
    }
}

impl From<io::Error> for NetError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            Self::eof()
        } else {
            Self::new(error.to_string())
        }
    }
}

/// A violation of the reply grammar.
///
/// The received bytes were read successfully but do not conform to the shape
/// the issued command expects. Both variants render a fixed canonical string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The reply does not match the expected grammar.
    #[error("malformed response")]
    Malformed,
    /// An inspect record carried the `payload` key anywhere other than
    /// immediately after `payload-size`.
    #[error("payload must follow payload-size")]
    PayloadOutOfOrder,
}

/// An error reply (`-CODE [text]`) signalled by the server.
///
/// The server's classification is authoritative: a coded reply is never
/// reinterpreted as a framing error, even when the triggering request was
/// malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    code: String,
    text: String,
}

impl ResponseError {
    /// Builds a response error from a code and optional trailing text.
    #[must_use]
    pub fn new(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
        }
    }

    /// Returns the error code, e.g. `TIMED-OUT` or `NOT-FOUND`.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Returns the trailing text, empty when the server sent none.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(formatter, "{}", self.code)
        } else {
            write!(formatter, "{} {}", self.code, self.text)
        }
    }
}

impl std::error::Error for ResponseError {}

/// Union of the three error kinds raised by client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Transport failure.
    #[error(transparent)]
    Net(#[from] NetError),
    /// Framing violation.
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// Server-signalled error reply.
    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl ClientError {
    /// Returns the response error when the server signalled one.
    #[must_use]
    pub fn as_response(&self) -> Option<&ResponseError> {
        match self {
            Self::Response(error) => Some(error),
            Self::Net(_) | Self::Frame(_) => None,
        }
    }

    /// Returns whether this is a framing violation.
    #[must_use]
    pub fn is_frame(&self) -> bool {
        matches!(self, Self::Frame(_))
    }

    /// Returns whether this is a transport failure.
    #[must_use]
    pub fn is_net(&self) -> bool {
        matches!(self, Self::Net(_))
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        Self::Net(NetError::from(error))
    }
}

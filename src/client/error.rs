//! Error types surfaced by the consumer and producer clients.

use hyper::{http::uri::InvalidUri, StatusCode, Uri};
use std::{error::Error as StdError, fmt::Display, time::Duration};

/// Failure to complete a round trip with the broker. No state is ever committed when one of
/// these occurs.
///
/// Only [`TransportError::Http`] and [`TransportError::Timeout`] are transient; the others
/// stem from configuration and fail identically on every attempt.
#[derive(Debug)]
pub enum TransportError {
    Http(hyper::Error),
    Timeout(Duration),
    InvalidUri(InvalidUri),

    /// The broker URI parsed, but is not an absolute `http://` URI.
    UnsupportedUri(Uri),

    Request(hyper::http::Error),
}

impl TransportError {
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Http(_) | TransportError::Timeout(_))
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Http(err) => write!(f, "HTTP error: {}", err),
            TransportError::Timeout(timeout) => {
                write!(f, "Broker did not respond within {:?}.", timeout)
            }
            TransportError::InvalidUri(err) => write!(f, "Invalid broker URI: {}", err),
            TransportError::UnsupportedUri(uri) => {
                write!(f, "Broker URI must be an absolute http:// URI: {}", uri)
            }
            TransportError::Request(err) => write!(f, "Unable to build request: {}", err),
        }
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            TransportError::Http(err) => Some(err),
            TransportError::InvalidUri(err) => Some(err),
            TransportError::Request(err) => Some(err),
            TransportError::Timeout(_) | TransportError::UnsupportedUri(_) => None,
        }
    }
}

/// The broker answered, but with something the client cannot trust.
#[derive(Debug)]
pub enum ProtocolError {
    Encode(serde_json::Error),
    EncodeQuery(serde_urlencoded::ser::Error),
    Decode(serde_json::Error),

    /// A fetched record lies before the offset it was fetched from.
    OffsetBeforeCursor {
        cursor: u64,
        offset: u64,
    },

    /// A fetched batch is not in strictly ascending offset order.
    NonAscendingOffsets {
        previous: u64,
        offset: u64,
    },

    /// A record carries `u64::MAX`, leaving no offset to advance to.
    OffsetOverflow,
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Encode(err) => write!(f, "Unable to encode request body: {}", err),
            ProtocolError::EncodeQuery(err) => {
                write!(f, "Unable to encode request query: {}", err)
            }
            ProtocolError::Decode(err) => write!(f, "Malformed response body: {}", err),
            ProtocolError::OffsetBeforeCursor { cursor, offset } => write!(
                f,
                "Record at offset {} returned for a fetch from offset {}.",
                offset, cursor
            ),
            ProtocolError::NonAscendingOffsets { previous, offset } => write!(
                f,
                "Record at offset {} follows offset {} in the same batch.",
                offset, previous
            ),
            ProtocolError::OffsetOverflow => write!(f, "Record offset overflows the cursor."),
        }
    }
}

impl StdError for ProtocolError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ProtocolError::Encode(err) | ProtocolError::Decode(err) => Some(err),
            ProtocolError::EncodeQuery(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Transport(TransportError),

    /// The broker rejected a FETCH request.
    Fetch {
        status: StatusCode,
        message: String,
    },

    /// The broker rejected a PRODUCE request. Retrying may append a duplicate.
    Produce {
        status: StatusCode,
        message: String,
    },

    Protocol(ProtocolError),

    EmptyTopic,

    /// A polling driver was configured with a zero interval.
    ZeroPollInterval,
}

impl Error {
    /// Returns whether repeating the failed operation unchanged may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(err) => err.is_transient(),
            Error::Fetch { status, .. } | Error::Produce { status, .. } => {
                status.is_server_error()
            }
            Error::Protocol(_) | Error::EmptyTopic | Error::ZeroPollInterval => false,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Transport(err) => write!(f, "Transport error: {}", err),
            Error::Fetch { status, message } => {
                write!(f, "Fetch rejected by broker ({}): {}", status, message)
            }
            Error::Produce { status, message } => {
                write!(f, "Produce rejected by broker ({}): {}", status, message)
            }
            Error::Protocol(err) => write!(f, "Protocol error: {}", err),
            Error::EmptyTopic => write!(f, "Topic name must not be empty."),
            Error::ZeroPollInterval => write!(f, "Poll interval must be greater than zero."),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Transport(err) => Some(err),
            Error::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<ProtocolError> for Error {
    fn from(err: ProtocolError) -> Self {
        Self::Protocol(err)
    }
}

//! Error types for the HTTP server.

use std::io;

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::router::Error as RouteError;
use crate::server::status::StatusCode;

/// Errors that can occur while serving a connection.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(ParserError),

    /// The route table could not serve the request.
    #[error("Routing error: {0}")]
    RouteError(#[from] RouteError),

    /// I/O error on the connection or the file source.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// A file to send does not exist or cannot be read.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A handler asked for a bare protocol error response.
    #[error("HTTP error: {0}")]
    Http(StatusCode),

    /// A response method was called in a state that does not allow it.
    #[error("Invalid response state: {0}")]
    InvalidState(&'static str),

    /// Internal server error.
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// Transport failures seen while parsing stay transport failures.
impl From<ParserError> for Error {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::Io(e) => Error::IoError(e),
            other => Error::ParseError(other),
        }
    }
}

impl Error {
    /// The status to answer with, for errors that map onto a protocol response.
    pub fn protocol_status(&self) -> Option<StatusCode> {
        match self {
            Error::ParseError(ParserError::PayloadTooLarge { .. }) => Some(StatusCode::PAYLOAD_TOO_LARGE),
            Error::ParseError(_) => Some(StatusCode::BAD_REQUEST),
            Error::RouteError(RouteError::NotFound(_)) => Some(StatusCode::NOT_FOUND),
            Error::RouteError(RouteError::MethodNotAllowed(..)) => Some(StatusCode::METHOD_NOT_ALLOWED),
            Error::RouteError(RouteError::NotImplemented(_)) => Some(StatusCode::NOT_IMPLEMENTED),
            Error::RouteError(RouteError::InvalidPattern(_)) => None,
            Error::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Error::Http(status) => Some(*status),
            _ => None,
        }
    }

    /// True for transport errors after which nothing more can be written.
    pub fn is_connection_reset(&self) -> bool {
        matches!(
            self,
            Error::IoError(e) if matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe
            )
        )
    }
}

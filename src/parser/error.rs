//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while reading and parsing an HTTP request.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP method in the request is not supported.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The request target is missing.
    #[error("Invalid HTTP path")]
    InvalidPath,

    /// The request line is malformed (wrong token count or irregular spacing).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The HTTP version is not of the form `HTTP/<major>.<minor>`.
    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// A header line has no `:` separator.
    #[error("Invalid header format")]
    InvalidHeaderFormat,

    /// The request is empty.
    #[error("Empty request")]
    EmptyRequest,

    /// A request or header line exceeded the configured limit.
    #[error("Line exceeds {0} bytes")]
    LineTooLong(usize),

    /// The `Content-Length` header is not a valid length.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The declared body is larger than the route allows.
    #[error("Body of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// The peer closed the connection before the whole body arrived.
    #[error("Request body ended after {received} of {expected} bytes")]
    IncompleteBody { expected: usize, received: usize },

    /// The body could not be decoded according to its content type.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// Error parsing JSON.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The underlying transport failed while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

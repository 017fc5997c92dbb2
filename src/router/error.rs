//! Error types for route registration and resolution.

use thiserror::Error;

use crate::parser::Method;

/// Errors produced while building or consulting the route table.
#[derive(Debug, Error)]
pub enum Error {
    /// No registered pattern matches the path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A pattern matches the path, but not under this method.
    #[error("Method {0} not allowed for path: {1}")]
    MethodNotAllowed(Method, String),

    /// The method is answered with 501 before routes are consulted.
    #[error("Method {0} not implemented")]
    NotImplemented(Method),

    /// A route pattern was rejected at registration.
    #[error("Invalid route pattern: {0:?}")]
    InvalidPattern(String),
}

//! Request handlers and their results.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::parser::HttpRequest;
use crate::server::error::Error;
use crate::server::response::Response;
use crate::server::status::StatusCode;

/// Boxed future returned by a handler.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Reply, Error>> + Send + 'a>>;

/// A request handler.
///
/// Path captures arrive as `args`, positionally in pattern order. Closures of
/// the shape `|req, resp, args| Box::pin(async move { ... })` implement this
/// trait.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(
        &'a self,
        req: &'a mut HttpRequest,
        resp: &'a mut Response,
        args: Vec<String>,
    ) -> HandlerFuture<'a>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut HttpRequest, &'a mut Response, Vec<String>) -> HandlerFuture<'a>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        req: &'a mut HttpRequest,
        resp: &'a mut Response,
        args: Vec<String>,
    ) -> HandlerFuture<'a> {
        (self)(req, resp, args)
    }
}

/// What a handler hands back to the response layer.
pub enum Reply {
    /// The handler wrote (or deliberately left empty) the response itself.
    Done,
    /// A byte or text payload, sent with `Content-Length`.
    Payload(Vec<u8>),
    /// A structured value, sent as `application/json`.
    Json(serde_json::Value),
    /// A structured value sent with an explicit status.
    WithStatus(serde_json::Value, StatusCode),
    /// A one-shot sequence of fragments, sent with chunked framing.
    Stream(Box<dyn Iterator<Item = String> + Send>),
}

impl Reply {
    /// Serialize `value` into a JSON reply.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, Error> {
        Ok(Reply::Json(serde_json::to_value(value)?))
    }

    /// Serialize `value` into a JSON reply with the given status.
    pub fn json_with_status<T: Serialize>(value: &T, status: StatusCode) -> Result<Self, Error> {
        Ok(Reply::WithStatus(serde_json::to_value(value)?, status))
    }

    /// Stream fragments with chunked transfer encoding.
    pub fn stream<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        Reply::Stream(Box::new(fragments.into_iter()))
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Payload(text.into_bytes())
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Payload(text.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Reply {
    fn from(bytes: Vec<u8>) -> Self {
        Reply::Payload(bytes)
    }
}

impl From<serde_json::Value> for Reply {
    fn from(value: serde_json::Value) -> Self {
        Reply::Json(value)
    }
}

impl From<(serde_json::Value, StatusCode)> for Reply {
    fn from((value, status): (serde_json::Value, StatusCode)) -> Self {
        Reply::WithStatus(value, status)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Done => f.write_str("Done"),
            Reply::Payload(bytes) => f.debug_tuple("Payload").field(&bytes.len()).finish(),
            Reply::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Reply::WithStatus(value, status) => {
                f.debug_tuple("WithStatus").field(value).field(status).finish()
            }
            Reply::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

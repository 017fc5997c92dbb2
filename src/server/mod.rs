//! HTTP server implementation for tinyweb-rs.
//!
//! This module provides the response writer, handler plumbing, the
//! per-connection orchestrator and the server lifecycle.

mod config;
mod connection;
mod error;
mod files;
mod handler;
mod http_server;
mod logging;
mod response;
mod status;

// Re-export public items
pub use config::ServerConfig;
pub use error::Error;
pub use files::{FileFuture, FileSource, FileStream, LocalFiles, SendFileOptions};
pub use handler::{Handler, HandlerFuture, Reply};
pub use http_server::{HttpServer, RunningServer};
pub use logging::LogSink;
pub use response::{Response, Transport, WriteState};
pub use status::StatusCode;

//! A minimal HTTP/1.0 server engine for memory-constrained hosts.
//!
//! One request per connection, parsed line by line with only the headers a
//! route asks for kept in memory.
//!
//! # Features
//!
//! - Strict request-line parsing, with blank lines before it tolerated
//! - Ordered route table with `<name>` path captures and a catch-all
//! - A response writer that always puts status line, headers and body on the
//!   wire in that order, whatever order the handler calls it in
//! - Content-Length bounded JSON and urlencoded body decoding
//! - File streaming and per-response chunked streaming
//! - Per-request timeout; protocol errors become well-formed error responses
//!
//! # Examples
//!
//! ## Serving requests
//!
//! ```no_run
//! use tinyweb_rs::{HttpServer, Method, Reply, ServerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), tinyweb_rs::ServerError> {
//!     let mut server = HttpServer::new(ServerConfig::default());
//!
//!     server.add_route(Method::GET, "/hello/<name>", |_req, resp, args| {
//!         Box::pin(async move {
//!             resp.add_header("Content-Type", "text/plain")?;
//!             resp.send(format!("Hello, {}!", args[0])).await?;
//!             Ok(Reply::Done)
//!         })
//!     })?;
//!
//!     server.run().await
//! }
//! ```
//!
//! ## Parsing
//!
//! ```
//! use tinyweb_rs::{parse_request_line, Method, ParserError};
//!
//! let line = parse_request_line(b"GET /index.html HTTP/1.0").unwrap();
//! assert_eq!(line.method, Method::GET);
//!
//! match parse_request_line(b"BREW /pot HTTP/1.0") {
//!     Err(ParserError::InvalidMethod(method)) => assert_eq!(method, "BREW"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

// Export the parser module
pub mod parser;

// Export the router module
pub mod router;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{
    parse_query_string, parse_request_line, urldecode_plus, Error as ParserError, HttpRequest,
    HttpVersion, Method,
};
pub use router::{RouteConfig, RoutePattern, RouteTable};
pub use server::{
    Error as ServerError, HttpServer, Reply, Response, RunningServer, SendFileOptions,
    ServerConfig, StatusCode,
};

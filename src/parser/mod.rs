//! HTTP parser module.
//!
//! Line-oriented parsing of HTTP/1.x requests: the request line, a filtered
//! header block, urlencoded query strings and Content-Length bounded bodies.

mod body;
mod error;
mod headers;
mod line;
mod method;
mod query;
mod request;
mod request_line;
mod version;
mod tests;

// Re-export public items
pub use body::{decode_body, read_body};
pub use error::Error;
pub use headers::{find_header, read_headers, Headers};
pub use method::Method;
pub use query::{parse_query_string, urldecode_plus};
pub use request::{Body, HttpRequest};
pub use request_line::{parse_request_line, read_request_line, RequestLine};
pub use version::HttpVersion;

//! Request line parsing.

use std::str::FromStr;

use tokio::io::AsyncBufRead;

use crate::parser::error::Error;
use crate::parser::line::{is_blank, read_line, strip_terminator};
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// The first line of a request, with the target split into path and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// The HTTP method.
    pub method: Method,
    /// The target up to the first `?`.
    pub path: String,
    /// The raw, undecoded text after the first `?` (empty when absent).
    pub query_string: String,
    /// The protocol version announced by the client.
    pub version: HttpVersion,
}

/// Parse a request line such as `GET /index.html?x=1 HTTP/1.0`.
///
/// Tokens must be separated by exactly one space; a trailing line terminator
/// is ignored.
///
/// ```
/// use tinyweb_rs::parser::{parse_request_line, HttpVersion, Method};
///
/// let line = parse_request_line(b"GET /search?q=rust HTTP/1.1\r\n").unwrap();
/// assert_eq!(line.method, Method::GET);
/// assert_eq!(line.path, "/search");
/// assert_eq!(line.query_string, "q=rust");
/// assert_eq!(line.version, HttpVersion::HTTP_11);
///
/// assert!(parse_request_line(b"GET  / HTTP/1.1").is_err());
/// ```
pub fn parse_request_line(raw: &[u8]) -> Result<RequestLine, Error> {
    let raw = strip_terminator(raw);
    if raw.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let line = std::str::from_utf8(raw)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;

    let parts: Vec<&str> = line.split(' ').collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(line.to_string()));
    }

    let method = Method::from_str(parts[0])?;

    let target = parts[1];
    if target.is_empty() {
        return Err(Error::InvalidPath);
    }

    let version = HttpVersion::from_str(parts[2])?;

    let (path, query_string) = match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    };

    Ok(RequestLine {
        method,
        path: path.to_string(),
        query_string: query_string.to_string(),
        version,
    })
}

/// Read and parse the request line, skipping any blank lines before it.
pub async fn read_request_line<R>(reader: &mut R, max_line_length: usize) -> Result<RequestLine, Error>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let line = read_line(reader, max_line_length).await?;
        if is_blank(&line) {
            continue;
        }
        return parse_request_line(&line);
    }
}

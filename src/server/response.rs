//! The HTTP response writer.
//!
//! A [`Response`] writes straight to the connection. It moves through
//! [`WriteState`] in one direction only, so whatever order a handler calls
//! it in, the wire always carries the status line, then the header block,
//! then the body.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::parser::HttpVersion;
use crate::server::error::Error;
use crate::server::files::{FileSource, SendFileOptions};
use crate::server::handler::Reply;
use crate::server::status::StatusCode;

/// The write half of a connection.
pub type Transport = Box<dyn AsyncWrite + Send + Unpin>;

/// How far a response has progressed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WriteState {
    /// Nothing written yet; status and headers can still change.
    Fresh,
    /// The status line is committed.
    StatusSent,
    /// The header block, including its blank line, is committed.
    HeadersSent,
    /// At least one body write happened.
    BodyOpen,
    /// The response is complete; no further writes are allowed.
    Closed,
}

/// An HTTP/1.0 response bound to one connection.
pub struct Response {
    status: StatusCode,
    reason: Option<String>,
    version: HttpVersion,
    headers: Vec<(String, String)>,
    state: WriteState,
    transport: Transport,
    files: Arc<dyn FileSource>,
}

impl Response {
    /// Create a `200` response writing to `transport`.
    pub fn new(transport: Transport, files: Arc<dyn FileSource>) -> Self {
        Self {
            status: StatusCode::OK,
            reason: None,
            version: HttpVersion::HTTP_10,
            headers: Vec::new(),
            state: WriteState::Fresh,
            transport,
            files,
        }
    }

    pub fn state(&self) -> WriteState {
        self.state
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Get a pending header value, ignoring case.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set the status code. Only allowed before anything is written.
    pub fn set_status(&mut self, status: StatusCode) -> Result<(), Error> {
        if self.state != WriteState::Fresh {
            return Err(Error::InvalidState("status line already sent"));
        }
        self.status = status;
        Ok(())
    }

    /// Replace the standard reason phrase.
    pub fn set_reason_phrase(&mut self, reason: impl Into<String>) -> Result<(), Error> {
        if self.state != WriteState::Fresh {
            return Err(Error::InvalidState("status line already sent"));
        }
        self.reason = Some(reason.into());
        Ok(())
    }

    /// Add a header, replacing any earlier value under the same name.
    ///
    /// Headers keep the order they were first added in.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl ToString) -> Result<(), Error> {
        if self.state >= WriteState::HeadersSent {
            return Err(Error::InvalidState("headers already sent"));
        }
        let name = name.into();
        let value = value.to_string();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
        Ok(())
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.transport.write_all(bytes).await?;
        self.transport.flush().await?;
        Ok(())
    }

    /// Commit the status line and header block if they are still pending.
    ///
    /// Both go out in a single write. Calling this again is a no-op.
    pub async fn send_headers(&mut self) -> Result<(), Error> {
        if self.state >= WriteState::HeadersSent {
            return Ok(());
        }

        let mut head = String::new();
        if self.state == WriteState::Fresh {
            let reason = self.reason.as_deref().unwrap_or(self.status.reason_phrase());
            head.push_str(&format!("{} {} {}\r\n", self.version, self.status.as_u16(), reason));
            self.state = WriteState::StatusSent;
        }
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str("\r\n");
        self.state = WriteState::HeadersSent;

        self.write_raw(head.as_bytes()).await
    }

    async fn write_body(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.state == WriteState::Closed {
            return Err(Error::InvalidState("response already closed"));
        }
        self.send_headers().await?;
        self.state = WriteState::BodyOpen;
        self.write_raw(bytes).await
    }

    /// Write body bytes, flushing status and headers first if needed.
    pub async fn send(&mut self, body: impl AsRef<[u8]>) -> Result<(), Error> {
        self.write_body(body.as_ref()).await
    }

    /// Send `Content-Type: text/html` and the header block.
    pub async fn start_html(&mut self) -> Result<(), Error> {
        self.add_header("Content-Type", "text/html")?;
        self.send_headers().await
    }

    /// Answer with an error status and an optional message body.
    ///
    /// Fails once the status line is on the wire: a response in flight
    /// cannot be turned into an error.
    pub async fn error(&mut self, status: StatusCode, msg: Option<&str>) -> Result<(), Error> {
        self.set_status(status)?;
        self.finish_with(msg).await
    }

    /// Answer with `302 Found` pointing at `location`.
    pub async fn redirect(&mut self, location: &str, msg: Option<&str>) -> Result<(), Error> {
        self.set_status(StatusCode::FOUND)?;
        self.add_header("Location", location)?;
        self.finish_with(msg).await
    }

    async fn finish_with(&mut self, msg: Option<&str>) -> Result<(), Error> {
        if let Some(msg) = msg {
            self.add_header("Content-Length", msg.len())?;
        }
        self.send_headers().await?;
        if let Some(msg) = msg {
            self.write_body(msg.as_bytes()).await?;
        }
        Ok(())
    }

    /// Stream a file from the server's [`FileSource`].
    ///
    /// A missing or unreadable file becomes [`Error::NotFound`] before
    /// anything is written; other I/O failures are returned as they are.
    pub async fn send_file(&mut self, path: &str, options: &SendFileOptions) -> Result<(), Error> {
        let files = Arc::clone(&self.files);
        let size = files.stat(path).await.map_err(|e| file_error(path, e))?;
        let mut file = files.open(path).await.map_err(|e| file_error(path, e))?;

        self.add_header("Content-Length", size)?;
        if let Some(content_type) = &options.content_type {
            self.add_header("Content-Type", content_type)?;
        }
        if let Some(content_encoding) = &options.content_encoding {
            self.add_header("Content-Encoding", content_encoding)?;
        }
        self.add_header("Cache-Control", format!("max-age={}, public", options.max_age))?;
        self.send_headers().await?;

        let buf_size = usize::try_from(size).unwrap_or(usize::MAX).min(options.buf_size).max(1);
        let mut buf = vec![0u8; buf_size];
        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            self.write_body(&buf[..n]).await?;
        }
        Ok(())
    }

    /// Send fragments with chunked transfer encoding.
    ///
    /// Only this response is upgraded to HTTP/1.1, with `Connection: close`.
    /// Empty fragments are skipped since a zero-length chunk ends the body.
    pub async fn send_chunked<I>(&mut self, fragments: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = String>,
    {
        if self.state != WriteState::Fresh {
            return Err(Error::InvalidState("chunked body must start a fresh response"));
        }
        self.version = HttpVersion::HTTP_11;
        self.add_header("Connection", "close")?;
        self.add_header("Transfer-Encoding", "chunked")?;
        self.send_headers().await?;

        for fragment in fragments {
            if fragment.is_empty() {
                continue;
            }
            let chunk = format!("{:x}\r\n{fragment}\r\n", fragment.len());
            self.write_body(chunk.as_bytes()).await?;
        }
        self.write_body(b"0\r\n\r\n").await?;
        self.state = WriteState::Closed;
        Ok(())
    }

    /// Write a handler's result.
    pub async fn send_reply(&mut self, reply: Reply) -> Result<(), Error> {
        match reply {
            Reply::Done => Ok(()),
            Reply::Payload(bytes) => self.send_sized(None, &bytes).await,
            Reply::Json(value) => {
                let bytes = serde_json::to_vec(&value)?;
                self.send_sized(Some("application/json"), &bytes).await
            }
            Reply::WithStatus(value, status) => {
                self.set_status(status)?;
                let bytes = serde_json::to_vec(&value)?;
                self.send_sized(Some("application/json"), &bytes).await
            }
            Reply::Stream(fragments) => self.send_chunked(fragments).await,
        }
    }

    async fn send_sized(&mut self, content_type: Option<&str>, bytes: &[u8]) -> Result<(), Error> {
        if self.state < WriteState::HeadersSent {
            if let Some(content_type) = content_type {
                self.add_header("Content-Type", content_type)?;
            }
            self.add_header("Content-Length", bytes.len())?;
        }
        self.write_body(bytes).await
    }

    /// Make sure at least the status line and header block went out.
    pub(crate) async fn finish(&mut self) -> Result<(), Error> {
        self.send_headers().await?;
        self.state = WriteState::Closed;
        Ok(())
    }

    /// Shut the transport down. Errors are ignored: the peer may be gone.
    pub(crate) async fn close(&mut self) {
        self.state = WriteState::Closed;
        let _ = self.transport.shutdown().await;
    }
}

fn file_error(path: &str, err: std::io::Error) -> Error {
    match err.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            Error::NotFound(path.to_string())
        }
        _ => Error::IoError(err),
    }
}

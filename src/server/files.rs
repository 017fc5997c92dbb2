//! Byte sources for `Response::send_file`.

use std::future::Future;
use std::io;
use std::pin::Pin;

use tokio::io::AsyncRead;

/// A readable stream handed out by a [`FileSource`].
pub type FileStream = Box<dyn AsyncRead + Send + Unpin>;

/// Boxed future returned by [`FileSource`] methods.
pub type FileFuture<'a, T> = Pin<Box<dyn Future<Output = io::Result<T>> + Send + 'a>>;

/// Where `send_file` gets its bytes from.
///
/// Paths are passed through uninterpreted. `stat` and `open` report a missing
/// or unreadable file as `io::ErrorKind::NotFound` or
/// `io::ErrorKind::PermissionDenied`; the server answers those with 404.
pub trait FileSource: Send + Sync {
    /// Size of the file in bytes.
    fn stat<'a>(&'a self, path: &'a str) -> FileFuture<'a, u64>;

    /// Open the file for reading from the start.
    fn open<'a>(&'a self, path: &'a str) -> FileFuture<'a, FileStream>;
}

/// Files on the local filesystem, read through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileSource for LocalFiles {
    fn stat<'a>(&'a self, path: &'a str) -> FileFuture<'a, u64> {
        Box::pin(async move {
            let metadata = tokio::fs::metadata(path).await?;
            if metadata.is_dir() {
                return Err(io::Error::new(io::ErrorKind::NotFound, "is a directory"));
            }
            Ok(metadata.len())
        })
    }

    fn open<'a>(&'a self, path: &'a str) -> FileFuture<'a, FileStream> {
        Box::pin(async move {
            let file = tokio::fs::File::open(path).await?;
            Ok(Box::new(file) as FileStream)
        })
    }
}

/// Options for `Response::send_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFileOptions {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    /// Seconds for `Cache-Control: max-age`; 0 disables caching.
    pub max_age: u64,
    /// Size of the copy buffer.
    pub buf_size: usize,
}

impl Default for SendFileOptions {
    fn default() -> Self {
        Self {
            content_type: None,
            content_encoding: None,
            max_age: 2_592_000,
            buf_size: 128,
        }
    }
}

impl SendFileOptions {
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_content_encoding(mut self, content_encoding: impl Into<String>) -> Self {
        self.content_encoding = Some(content_encoding.into());
        self
    }

    pub fn with_max_age(mut self, max_age: u64) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_buf_size(mut self, buf_size: usize) -> Self {
        self.buf_size = buf_size;
        self
    }
}

//! Route entries and their per-route configuration.

use std::fmt;
use std::sync::Arc;

use crate::parser::Method;
use crate::router::pattern::RoutePattern;
use crate::server::Handler;

/// Per-route request handling options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    /// Header names kept in memory for this route; all others are dropped.
    pub save_headers: Vec<String>,
    /// Largest body accepted when `decode_body` is set.
    pub max_body_size: usize,
    /// Read and decode the request body before calling the handler.
    pub decode_body: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            save_headers: Vec::new(),
            max_body_size: 1024,
            decode_body: false,
        }
    }
}

impl RouteConfig {
    /// Keep the given headers (matched case-insensitively).
    pub fn with_save_headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.save_header(name.into());
        }
        self
    }

    /// Set the body size limit.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Opt into body decoding. `Content-Length` and `Content-Type` are saved
    /// so the decoder can see them.
    pub fn with_body(mut self) -> Self {
        self.decode_body = true;
        self.save_header("Content-Length".to_string());
        self.save_header("Content-Type".to_string());
        self
    }

    fn save_header(&mut self, name: String) {
        if !self.save_headers.iter().any(|h| h.eq_ignore_ascii_case(&name)) {
            self.save_headers.push(name);
        }
    }
}

/// A registered `(method, pattern, handler, config)` entry.
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: RoutePattern,
    pub handler: Arc<dyn Handler>,
    pub config: RouteConfig,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

//! The ordered route table.

use std::fmt;
use std::sync::Arc;

use crate::parser::Method;
use crate::router::error::Error;
use crate::router::pattern::{PathCaptures, RoutePattern};
use crate::router::route::{Route, RouteConfig};
use crate::server::Handler;

/// The outcome of a successful lookup.
pub struct Resolved<'t> {
    /// Registration index of the matched route, `None` for the catch-all.
    pub index: Option<usize>,
    pub handler: &'t dyn Handler,
    pub config: &'t RouteConfig,
    pub captures: PathCaptures,
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("index", &self.index)
            .field("config", self.config)
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

/// Routes in registration order plus an optional catch-all.
///
/// Registration order is the tie-break for overlapping patterns: the table
/// is never re-sorted.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    catch_all: Option<(Arc<dyn Handler>, RouteConfig)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route after all previously registered ones.
    pub fn add(
        &mut self,
        method: Method,
        pattern: &str,
        config: RouteConfig,
        handler: Arc<dyn Handler>,
    ) -> Result<(), Error> {
        let pattern = RoutePattern::parse(pattern)?;
        self.routes.push(Route {
            method,
            pattern,
            handler,
            config,
        });
        Ok(())
    }

    /// Install the fallback handler, replacing any previous one.
    pub fn set_catch_all(&mut self, handler: Arc<dyn Handler>, config: RouteConfig) {
        self.catch_all = Some((handler, config));
    }

    pub fn has_catch_all(&self) -> bool {
        self.catch_all.is_some()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Find the handler for a request.
    ///
    /// `CONNECT`, `OPTIONS` and `TRACE` are refused before the scan. Otherwise
    /// the first route whose pattern and method both match wins; failing that
    /// the catch-all is preferred over 405 and 404.
    pub fn resolve(&self, method: Method, path: &str) -> Result<Resolved<'_>, Error> {
        if method.is_unimplemented() {
            return Err(Error::NotImplemented(method));
        }

        let mut path_matched = false;
        for (index, route) in self.routes.iter().enumerate() {
            if let Some(captures) = route.pattern.match_path(path) {
                if route.method == method {
                    return Ok(Resolved {
                        index: Some(index),
                        handler: route.handler.as_ref(),
                        config: &route.config,
                        captures,
                    });
                }
                path_matched = true;
            }
        }

        if let Some((handler, config)) = &self.catch_all {
            return Ok(Resolved {
                index: None,
                handler: handler.as_ref(),
                config,
                captures: PathCaptures::default(),
            });
        }

        if path_matched {
            Err(Error::MethodNotAllowed(method, path.to_string()))
        } else {
            Err(Error::NotFound(path.to_string()))
        }
    }
}

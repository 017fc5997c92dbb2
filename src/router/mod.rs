//! Request routing.
//!
//! An ordered, append-only table of `(method, pattern)` routes matched by
//! linear scan, with `<name>` path captures and an optional catch-all.

mod error;
mod pattern;
mod route;
mod table;

// Re-export public items
pub use error::Error;
pub use pattern::{PathCaptures, RoutePattern};
pub use route::{Route, RouteConfig};
pub use table::{Resolved, RouteTable};

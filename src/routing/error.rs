//! Registration errors.
//!
//! Everything here is a programmer error raised while the route table is being
//! built. Runtime misses are not errors: they surface as
//! [`DispatchOutcome::NotFound`](super::DispatchOutcome::NotFound).

use thiserror::Error;

/// Errors returned by route registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The HTTP method was the empty string.
    #[error("method not assigned")]
    EmptyMethod,

    /// The path pattern did not begin with `/`.
    #[error("path `{path}` must start with /")]
    MissingLeadingSlash { path: String },

    /// The path pattern produced an empty segment (e.g. `//`).
    #[error("path `{path}` contains an empty segment")]
    EmptySegment { path: String },

    /// A terminal path was registered twice in a group that forbids rewrites.
    #[error("handler for {method} {path} could not be rewritten")]
    NotRewritable { method: String, path: String },
}

/// Result type for route registration.
pub type RouteResult<T> = Result<T, RouteError>;

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path, opaque handle)
//!     → router.rs (first non-paused group whose prefix matches)
//!     → group.rs (strip prefix, pick method branch, short-match policy)
//!     → branch.rs (root "/" handler or segment tree)
//!     → matcher.rs (literal lookup per depth, predicate gate)
//!     → interceptor → handler, or not-found responder
//!
//! Registration (at startup):
//!     group.add_handler(method, path, predicates, handler)
//!     → split & validate pattern
//!     → reuse or create nodes along the path
//!     → router.add_group(group)
//! ```
//!
//! # Design Decisions
//! - Generic over the request handle; the router only reads method and path
//! - Group selection is by plain string prefix, first match wins
//! - Only the first matching group is consulted, even if it cannot serve
//! - Registration failures are returned as errors, never swallowed

pub mod branch;
pub mod error;
pub mod group;
pub mod matcher;
pub mod router;

use std::sync::Arc;

pub use branch::MethodBranch;
pub use error::{RouteError, RouteResult};
pub use group::RouteGroup;
pub use matcher::{any_segment, Predicate, SegmentNode};
pub use router::Router;

/// What the router needs to know about an inbound request.
pub trait RouteRequest {
    /// HTTP method, e.g. `GET`.
    fn method(&self) -> &str;

    /// Request path used for matching. Query strings should not be included.
    fn path(&self) -> &str;
}

/// A registered route handler. Response side effects go through the handle.
pub type Handler<R> = Arc<dyn Fn(&mut R) + Send + Sync>;

/// Per-group hook run after a handler is resolved and before it is invoked.
///
/// Receives the matched node, or `None` when the branch root handler was used.
pub type Interceptor<R> = Arc<dyn Fn(&mut R, Option<&SegmentNode<R>>) -> Intercept + Send + Sync>;

/// Decision returned by an [`Interceptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercept {
    /// Continue and invoke the resolved handler.
    Proceed,
    /// Stop here. The request still counts as handled.
    Suspend,
}

/// Outcome of dispatching one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler was invoked.
    Handled,
    /// The interceptor suspended the request before the handler ran.
    Suspended,
    /// No usable handler; the not-found responder was (or should be) used.
    NotFound,
}

impl DispatchOutcome {
    /// Whether the request was consumed by a group.
    pub fn is_handled(self) -> bool {
        !matches!(self, DispatchOutcome::NotFound)
    }

    /// Label used for metrics and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchOutcome::Handled => "handled",
            DispatchOutcome::Suspended => "suspended",
            DispatchOutcome::NotFound => "not_found",
        }
    }
}

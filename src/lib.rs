//! Prefix-scoped HTTP request router.
//!
//! Routes are registered into [`RouteGroup`]s, each owning one segment tree
//! per HTTP method. A [`Router`] hands every request to the first group whose
//! prefix matches; that group walks its tree, runs its interceptor and
//! invokes the handler.
//!
//! ```
//! use prefix_router::{RouteGroup, RouteRequest, Router};
//!
//! struct Req { method: &'static str, path: &'static str, body: String }
//!
//! impl RouteRequest for Req {
//!     fn method(&self) -> &str { self.method }
//!     fn path(&self) -> &str { self.path }
//! }
//!
//! let router = Router::new(|req: &mut Req| req.body = "404".into());
//! let group = router.add_group(RouteGroup::new("/api"));
//! group.route("GET", "/user/info", |req: &mut Req| req.body = "info".into()).unwrap();
//!
//! let mut req = Req { method: "GET", path: "/api/user/info", body: String::new() };
//! router.serve(&mut req);
//! assert_eq!(req.body, "info");
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::{Exchange, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{
    DispatchOutcome, Intercept, Predicate, RouteError, RouteGroup, RouteRequest, Router, SegmentNode,
};

//! Group registry and dispatch.
//!
//! # Responsibilities
//! - Keep route groups in registration order
//! - Select the first active group whose prefix matches the request path
//! - Fall back to the injected not-found responder
//!
//! # Design Decisions
//! - First prefix match wins; overlapping prefixes resolve by order
//! - Only that first group is consulted: if it cannot serve the request the
//!   result is not-found, even when a later group could have served it
//! - Paused groups are skipped as if they were never added
//! - Groups are append-only for the lifetime of the router

use std::fmt;
use std::sync::{Arc, RwLock};

use super::group::RouteGroup;
use super::{DispatchOutcome, Handler, RouteRequest};
use crate::observability::metrics;

/// Top-level registry of route groups.
pub struct Router<R> {
    groups: RwLock<Vec<Arc<RouteGroup<R>>>>,
    not_found: Handler<R>,
}

impl<R: RouteRequest> Router<R> {
    /// Create an empty router that answers unmatched requests with `not_found`.
    pub fn new<F>(not_found: F) -> Self
    where
        F: Fn(&mut R) + Send + Sync + 'static,
    {
        let not_found: Handler<R> = Arc::new(not_found);
        Self {
            groups: RwLock::new(Vec::new()),
            not_found,
        }
    }

    /// Append a group. Returns a shared handle for later registration,
    /// interceptor changes or pausing.
    pub fn add_group(&self, group: RouteGroup<R>) -> Arc<RouteGroup<R>> {
        let group = Arc::new(group);
        let mut groups = self.groups.write().expect("router lock poisoned");
        groups.push(group.clone());
        tracing::info!(
            prefix = %group.prefix(),
            position = groups.len() - 1,
            routes = group.route_count(),
            "Route group added"
        );
        group
    }

    /// Dispatch `req` to the first matching group or the not-found responder.
    pub fn serve(&self, req: &mut R) -> DispatchOutcome {
        let groups = self.groups.read().expect("router lock poisoned");

        let mut outcome = DispatchOutcome::NotFound;
        for group in groups.iter() {
            if !group.matches_prefix(req.path()) {
                continue;
            }
            match group.dispatch_active(req) {
                None => continue,
                Some(result) => {
                    outcome = result;
                    break;
                }
            }
        }

        if !outcome.is_handled() {
            tracing::debug!(method = req.method(), path = req.path(), "No route matched");
            (self.not_found)(req);
        }
        metrics::record_dispatch(outcome);
        outcome
    }

    pub fn group_count(&self) -> usize {
        self.groups.read().expect("router lock poisoned").len()
    }

    /// Snapshot of the registered groups in dispatch order.
    pub fn groups(&self) -> Vec<Arc<RouteGroup<R>>> {
        self.groups.read().expect("router lock poisoned").clone()
    }
}

impl<R> fmt::Debug for Router<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = self.groups.read().map(|g| g.len()).unwrap_or_default();
        f.debug_struct("Router").field("groups", &groups).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Intercept;

    #[derive(Debug)]
    struct Probe {
        method: &'static str,
        path: &'static str,
        served_by: Option<&'static str>,
        status: u16,
    }

    impl Probe {
        fn new(method: &'static str, path: &'static str) -> Self {
            Self { method, path, served_by: None, status: 200 }
        }
    }

    impl RouteRequest for Probe {
        fn method(&self) -> &str {
            self.method
        }

        fn path(&self) -> &str {
            self.path
        }
    }

    fn router() -> Router<Probe> {
        Router::new(|req: &mut Probe| req.status = 404)
    }

    fn served_by(name: &'static str) -> impl Fn(&mut Probe) + Send + Sync + 'static {
        move |req: &mut Probe| req.served_by = Some(name)
    }

    #[test]
    fn test_empty_router_is_not_found() {
        let router = router();
        let mut req = Probe::new("GET", "/");
        assert_eq!(router.serve(&mut req), DispatchOutcome::NotFound);
        assert_eq!(req.status, 404);
    }

    #[test]
    fn test_first_prefix_match_wins() {
        let router = router();
        let catch_all = router.add_group(RouteGroup::new(""));
        let api = router.add_group(RouteGroup::new("/api"));
        catch_all.route("GET", "/api/x", served_by("catch-all")).unwrap();
        api.route("GET", "/x", served_by("api")).unwrap();

        let mut req = Probe::new("GET", "/api/x");
        assert_eq!(router.serve(&mut req), DispatchOutcome::Handled);
        assert_eq!(req.served_by, Some("catch-all"));
        assert_eq!(router.group_count(), 2);
    }

    #[test]
    fn test_first_group_miss_is_not_found() {
        let router = router();
        router.add_group(RouteGroup::new(""));
        let api = router.add_group(RouteGroup::new("/api"));
        api.route("GET", "/x", served_by("api")).unwrap();

        // The catch-all group matches the prefix first and has nothing to offer.
        let mut req = Probe::new("GET", "/api/x");
        assert_eq!(router.serve(&mut req), DispatchOutcome::NotFound);
        assert_eq!(req.served_by, None);
        assert_eq!(req.status, 404);
    }

    #[test]
    fn test_non_matching_prefixes_are_skipped() {
        let router = router();
        let admin = router.add_group(RouteGroup::new("/admin"));
        let api = router.add_group(RouteGroup::new("/api"));
        admin.route("GET", "/x", served_by("admin")).unwrap();
        api.route("GET", "/x", served_by("api")).unwrap();

        let mut req = Probe::new("GET", "/api/x");
        assert_eq!(router.serve(&mut req), DispatchOutcome::Handled);
        assert_eq!(req.served_by, Some("api"));
    }

    #[test]
    fn test_paused_group_is_skipped() {
        let router = router();
        let first = router.add_group(RouteGroup::new(""));
        let second = router.add_group(RouteGroup::new(""));
        first.route("GET", "/x", served_by("first")).unwrap();
        second.route("GET", "/x", served_by("second")).unwrap();

        first.pause();
        let mut req = Probe::new("GET", "/x");
        router.serve(&mut req);
        assert_eq!(req.served_by, Some("second"));

        first.resume();
        let mut req = Probe::new("GET", "/x");
        router.serve(&mut req);
        assert_eq!(req.served_by, Some("first"));
    }

    #[test]
    fn test_suspended_request_skips_not_found() {
        let router = router();
        let group = router.add_group(RouteGroup::new(""));
        group.route("GET", "/x", served_by("x")).unwrap();
        group.set_interceptor(|req: &mut Probe, _| {
            req.status = 401;
            Intercept::Suspend
        });

        let mut req = Probe::new("GET", "/x");
        assert_eq!(router.serve(&mut req), DispatchOutcome::Suspended);
        assert_eq!(req.served_by, None);
        assert_eq!(req.status, 401);
    }

    #[test]
    fn test_groups_snapshot_keeps_order() {
        let router = router();
        router.add_group(RouteGroup::new("/b"));
        router.add_group(RouteGroup::new("/a"));
        let prefixes: Vec<String> = router.groups().iter().map(|g| g.prefix().to_string()).collect();
        assert_eq!(prefixes, vec!["/b", "/a"]);
    }
}

//! Prefix-scoped route groups.
//!
//! # Responsibilities
//! - Own one [`MethodBranch`] per HTTP method
//! - Enforce the group's overwrite policy on registration
//! - Resolve a handler for a request and apply the short-match policy
//! - Run the group interceptor before the handler
//!
//! # Design Decisions
//! - One `RwLock` per group: registration, interceptor changes and pause
//!   toggles take the write side; dispatch holds the read side until the
//!   handler returns
//! - Nodes are never mutated once a registration call returns, so a reader
//!   can never observe a half-built path
//! - Branches are created only after the first registration for a method
//!   succeeds

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use super::branch::MethodBranch;
use super::error::{RouteError, RouteResult};
use super::matcher::{any_segment, Predicate, SegmentNode};
use super::{DispatchOutcome, Handler, Intercept, Interceptor, RouteRequest};
use crate::observability::metrics;

/// Mutable part of a group, guarded by the group lock.
struct GroupState<R> {
    paused: bool,
    interceptor: Option<Interceptor<R>>,
    branches: HashMap<String, MethodBranch<R>>,
}

/// A prefix-scoped bundle of per-method route trees.
pub struct RouteGroup<R> {
    prefix: String,
    rewritable: bool,
    short_match: bool,
    state: RwLock<GroupState<R>>,
}

impl<R: RouteRequest> RouteGroup<R> {
    /// Create a group serving every path that starts with `prefix`.
    ///
    /// An empty prefix (or `/`) matches every request. A trailing `/` is
    /// dropped so that `/api/` and `/api` behave the same.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if prefix.ends_with('/') {
            prefix.pop();
        }
        Self {
            prefix,
            rewritable: false,
            short_match: false,
            state: RwLock::new(GroupState {
                paused: false,
                interceptor: None,
                branches: HashMap::new(),
            }),
        }
    }

    /// Allow re-registering a terminal path to replace its handler.
    pub fn rewritable(mut self, rewritable: bool) -> Self {
        self.rewritable = rewritable;
        self
    }

    /// Dispatch partial matches to the deepest handler found on the walk.
    pub fn short_match(mut self, short_match: bool) -> Self {
        self.short_match = short_match;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_rewritable(&self) -> bool {
        self.rewritable
    }

    pub fn is_short_match(&self) -> bool {
        self.short_match
    }

    /// Register `handler` for `method` and `path`.
    ///
    /// `predicates` is called with the depth of every newly created node and
    /// may return a validator for the live segment value at that depth.
    pub fn add_handler<F, H>(&self, method: &str, path: &str, predicates: F, handler: H) -> RouteResult<()>
    where
        F: Fn(usize) -> Option<Predicate>,
        H: Fn(&mut R) + Send + Sync + 'static,
    {
        if method.is_empty() {
            return Err(RouteError::EmptyMethod);
        }
        let handler: Handler<R> = Arc::new(handler);

        let mut state = self.state.write().expect("route group lock poisoned");
        match state.branches.get_mut(method) {
            Some(branch) => branch.register(path, &predicates, handler, self.rewritable)?,
            None => {
                let mut branch = MethodBranch::new(method)?;
                branch.register(path, &predicates, handler, self.rewritable)?;
                state.branches.insert(method.to_string(), branch);
            }
        }

        tracing::debug!(prefix = %self.prefix, method, path, "Route registered");
        metrics::record_route_registered(method);
        Ok(())
    }

    /// Register a route without segment predicates.
    pub fn route<H>(&self, method: &str, path: &str, handler: H) -> RouteResult<()>
    where
        H: Fn(&mut R) + Send + Sync + 'static,
    {
        self.add_handler(method, path, any_segment, handler)
    }

    /// Install the group interceptor, replacing any previous one.
    pub fn set_interceptor<F>(&self, interceptor: F)
    where
        F: Fn(&mut R, Option<&SegmentNode<R>>) -> Intercept + Send + Sync + 'static,
    {
        let mut state = self.state.write().expect("route group lock poisoned");
        state.interceptor = Some(Arc::new(interceptor));
    }

    pub fn pause(&self) {
        self.state.write().expect("route group lock poisoned").paused = true;
        tracing::info!(prefix = %self.prefix, "Route group paused");
    }

    pub fn resume(&self) {
        self.state.write().expect("route group lock poisoned").paused = false;
        tracing::info!(prefix = %self.prefix, "Route group resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.state.read().expect("route group lock poisoned").paused
    }

    /// Whether `path` falls under this group's prefix.
    pub fn matches_prefix(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// Methods with at least one registered route, sorted.
    pub fn methods(&self) -> Vec<String> {
        let state = self.state.read().expect("route group lock poisoned");
        let mut methods: Vec<String> = state.branches.keys().cloned().collect();
        methods.sort();
        methods
    }

    /// Total number of registered routes across all methods.
    pub fn route_count(&self) -> usize {
        let state = self.state.read().expect("route group lock poisoned");
        state.branches.values().map(MethodBranch::route_count).sum()
    }

    /// Resolve and run the handler for `req`, ignoring the pause flag.
    pub fn dispatch(&self, req: &mut R) -> DispatchOutcome {
        let state = self.state.read().expect("route group lock poisoned");
        self.dispatch_locked(&state, req)
    }

    /// Like [`dispatch`](Self::dispatch), but returns `None` for a paused
    /// group without touching the request. Pause check and dispatch happen
    /// under one read lock.
    pub(crate) fn dispatch_active(&self, req: &mut R) -> Option<DispatchOutcome> {
        let state = self.state.read().expect("route group lock poisoned");
        if state.paused {
            return None;
        }
        Some(self.dispatch_locked(&state, req))
    }

    fn dispatch_locked(&self, state: &GroupState<R>, req: &mut R) -> DispatchOutcome {
        let Some(branch) = state.branches.get(req.method()) else {
            tracing::trace!(prefix = %self.prefix, method = req.method(), "No branch for method");
            return DispatchOutcome::NotFound;
        };
        let Some(segments) = req
            .path()
            .strip_prefix(self.prefix.as_str())
            .and_then(super::matcher::split_request)
        else {
            return DispatchOutcome::NotFound;
        };

        let found = branch.find(&segments);
        let handler = match found.handler {
            Some(handler) if found.exact || self.short_match => handler,
            _ => {
                tracing::trace!(
                    prefix = %self.prefix,
                    path = req.path(),
                    exact = found.exact,
                    "No usable handler"
                );
                return DispatchOutcome::NotFound;
            }
        };

        if let Some(interceptor) = state.interceptor.as_ref() {
            if interceptor(req, found.node) == Intercept::Suspend {
                tracing::debug!(
                    prefix = %self.prefix,
                    node = found.node.map(SegmentNode::pattern),
                    "Request suspended by interceptor"
                );
                return DispatchOutcome::Suspended;
            }
        }

        tracing::trace!(
            prefix = %self.prefix,
            node = found.node.map(SegmentNode::pattern),
            exact = found.exact,
            "Invoking handler"
        );
        handler(req);
        DispatchOutcome::Handled
    }
}

impl<R> fmt::Debug for RouteGroup<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGroup")
            .field("prefix", &self.prefix)
            .field("rewritable", &self.rewritable)
            .field("short_match", &self.short_match)
            .finish_non_exhaustive()
    }
}

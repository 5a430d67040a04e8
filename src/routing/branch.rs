//! Per-method route tree root.

use std::fmt;

use super::error::{RouteError, RouteResult};
use super::matcher::{self, Predicate, SegmentMap, SegmentNode};
use super::Handler;

/// Root of one method's segment tree inside a group.
pub struct MethodBranch<R> {
    method: String,
    root_handler: Option<Handler<R>>,
    nodes: SegmentMap<R>,
}

/// Result of matching a path against a branch.
pub struct Match<'a, R> {
    /// Handler to use: the terminal node's on an exact match, otherwise the
    /// deepest handler passed on the way down (falling back to the root).
    pub handler: Option<&'a Handler<R>>,
    /// Deepest node reached; `None` if no first segment matched.
    pub node: Option<&'a SegmentNode<R>>,
    /// Every segment was consumed and the final node terminates a route.
    pub exact: bool,
}

impl<R> MethodBranch<R> {
    pub fn new(method: impl Into<String>) -> RouteResult<Self> {
        let method = method.into();
        if method.is_empty() {
            return Err(RouteError::EmptyMethod);
        }
        Ok(Self {
            method,
            root_handler: None,
            nodes: SegmentMap::new(),
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Register `handler` for `path` under this method.
    ///
    /// `/` is stored as the root handler; no tree node is created for it.
    pub fn register<F>(
        &mut self,
        path: &str,
        predicates: &F,
        handler: Handler<R>,
        rewritable: bool,
    ) -> RouteResult<()>
    where
        F: Fn(usize) -> Option<Predicate> + ?Sized,
    {
        let segments = matcher::split_pattern(path)?;
        if segments.is_empty() {
            // The root slot follows the same overwrite policy as tree nodes.
            if self.root_handler.is_some() && !rewritable {
                return Err(RouteError::NotRewritable {
                    method: self.method.clone(),
                    path: "/".to_string(),
                });
            }
            self.root_handler = Some(handler);
            return Ok(());
        }
        matcher::insert(
            &mut self.nodes,
            &self.method,
            &segments,
            predicates,
            handler,
            rewritable,
        )
    }

    /// Match already-split request segments.
    pub fn find<'a>(&'a self, segments: &[&str]) -> Match<'a, R> {
        if segments.is_empty() {
            return Match {
                handler: self.root_handler.as_ref(),
                node: None,
                exact: self.root_handler.is_some(),
            };
        }

        let descent = matcher::descend(&self.nodes, segments);
        let exact = descent.consumed == segments.len()
            && descent.node.is_some_and(SegmentNode::is_terminal);

        Match {
            handler: descent.deepest_handler.or(self.root_handler.as_ref()),
            node: descent.node,
            exact,
        }
    }

    /// Number of routes registered under this method, root included.
    pub fn route_count(&self) -> usize {
        usize::from(self.root_handler.is_some()) + matcher::count_terminals(&self.nodes)
    }
}

impl<R> fmt::Debug for MethodBranch<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodBranch")
            .field("method", &self.method)
            .field("root_handler", &self.root_handler.is_some())
            .field("first_segments", &self.nodes.len())
            .finish()
    }
}

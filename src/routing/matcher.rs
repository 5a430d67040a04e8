//! Segment tree matching.
//!
//! # Responsibilities
//! - Split path patterns and request paths into `/`-delimited segments
//! - Store handlers on the node that terminates a registered pattern
//! - Walk the tree one segment per depth, gated by optional predicates
//!
//! # Design Decisions
//! - Lookup is keyed by the literal segment; a predicate can only reject an
//!   already-matched node, never pick between siblings
//! - Shared prefixes share one node chain; re-registration reuses nodes
//! - No parent pointers: nodes own their children and record their own
//!   pattern for diagnostics

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::{RouteError, RouteResult};
use super::Handler;

/// Segment validator bound to one depth of a route pattern.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate factory that never attaches a validator.
pub fn any_segment(_depth: usize) -> Option<Predicate> {
    None
}

/// One path segment at one depth of a method tree.
pub struct SegmentNode<R> {
    depth: usize,
    pattern: String,
    predicate: Option<Predicate>,
    children: HashMap<String, SegmentNode<R>>,
    handler: Option<Handler<R>>,
}

impl<R> SegmentNode<R> {
    fn new(depth: usize, pattern: String, predicate: Option<Predicate>) -> Self {
        Self {
            depth,
            pattern,
            predicate,
            children: HashMap::new(),
            handler: None,
        }
    }

    /// Zero-based position of this segment in the path.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Route pattern from the group root down to this node, e.g. `/user/info`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The literal segment this node is keyed by.
    pub fn segment(&self) -> &str {
        self.pattern.rsplit('/').next().unwrap_or_default()
    }

    /// Whether a route terminates at this node.
    pub fn is_terminal(&self) -> bool {
        self.handler.is_some()
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Whether the live segment value passes this node's predicate.
    fn accepts(&self, value: &str) -> bool {
        self.predicate.as_ref().map_or(true, |check| check(value))
    }
}

impl<R> fmt::Debug for SegmentNode<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentNode")
            .field("depth", &self.depth)
            .field("pattern", &self.pattern)
            .field("has_predicate", &self.predicate.is_some())
            .field("terminal", &self.handler.is_some())
            .field("children", &self.children.len())
            .finish()
    }
}

/// Map from literal segment to node, one per tree level.
pub(crate) type SegmentMap<R> = HashMap<String, SegmentNode<R>>;

/// Split a registration pattern into segments.
///
/// `/` yields no segments. A single trailing `/` is dropped.
pub(crate) fn split_pattern(path: &str) -> RouteResult<Vec<&str>> {
    if !path.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash {
            path: path.to_string(),
        });
    }
    if path == "/" {
        return Ok(Vec::new());
    }

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    let segments: Vec<&str> = trimmed[1..].split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(RouteError::EmptySegment {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// Split the part of a request path left after the group prefix.
///
/// Returns `None` when the remainder does not begin on a segment boundary.
pub(crate) fn split_request(remainder: &str) -> Option<Vec<&str>> {
    if remainder.is_empty() || remainder == "/" {
        return Some(Vec::new());
    }
    let body = remainder.strip_prefix('/')?;
    let body = body.strip_suffix('/').unwrap_or(body);
    Some(body.split('/').collect())
}

/// Insert `handler` at the end of `segments`, creating missing nodes.
///
/// Existing nodes are reused with their children and predicate intact.
pub(crate) fn insert<R, F>(
    level: &mut SegmentMap<R>,
    method: &str,
    segments: &[&str],
    predicates: &F,
    handler: Handler<R>,
    rewritable: bool,
) -> RouteResult<()>
where
    F: Fn(usize) -> Option<Predicate> + ?Sized,
{
    let last = segments.len().saturating_sub(1);
    let mut level = level;
    let mut pattern = String::new();

    for (depth, segment) in segments.iter().enumerate() {
        pattern.push('/');
        pattern.push_str(segment);

        let node = level
            .entry((*segment).to_string())
            .or_insert_with(|| SegmentNode::new(depth, pattern.clone(), predicates(depth)));

        if depth == last {
            if node.handler.is_some() && !rewritable {
                return Err(RouteError::NotRewritable {
                    method: method.to_string(),
                    path: pattern,
                });
            }
            node.handler = Some(handler);
            return Ok(());
        }
        level = &mut node.children;
    }
    Ok(())
}

/// Result of walking a segment tree.
pub struct Descent<'a, R> {
    /// Deepest node reached, if any segment matched.
    pub node: Option<&'a SegmentNode<R>>,
    /// Handler of the deepest terminal node passed on the way down.
    pub deepest_handler: Option<&'a Handler<R>>,
    /// Number of segments consumed.
    pub consumed: usize,
}

/// Walk `segments` from `level`, stopping at the first miss or rejection.
pub(crate) fn descend<'a, R>(level: &'a SegmentMap<R>, segments: &[&str]) -> Descent<'a, R> {
    let mut level = level;
    let mut descent = Descent {
        node: None,
        deepest_handler: None,
        consumed: 0,
    };

    for segment in segments {
        let Some(next) = level.get(*segment).filter(|n| n.accepts(segment)) else {
            break;
        };
        if let Some(handler) = next.handler.as_ref() {
            descent.deepest_handler = Some(handler);
        }
        descent.node = Some(next);
        descent.consumed += 1;
        level = &next.children;
    }

    descent
}

/// Total number of terminal nodes below `level`.
pub(crate) fn count_terminals<R>(level: &SegmentMap<R>) -> usize {
    level
        .values()
        .map(|n| usize::from(n.is_terminal()) + count_terminals(&n.children))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    type Req = Vec<&'static str>;

    fn tag(name: &'static str) -> Handler<Req> {
        Arc::new(move |req: &mut Req| req.push(name))
    }

    fn numeric(depth: usize) -> Option<Predicate> {
        (depth == 1).then(|| Arc::new(|s: &str| s.chars().all(|c| c.is_ascii_digit())) as Predicate)
    }

    #[test]
    fn test_split_pattern() {
        assert_eq!(split_pattern("/").unwrap(), Vec::<&str>::new());
        assert_eq!(split_pattern("/user/info").unwrap(), vec!["user", "info"]);
        assert_eq!(split_pattern("/user/info/").unwrap(), vec!["user", "info"]);

        assert!(matches!(
            split_pattern("user"),
            Err(RouteError::MissingLeadingSlash { .. })
        ));
        assert!(matches!(
            split_pattern("/user//info"),
            Err(RouteError::EmptySegment { .. })
        ));
        assert!(matches!(split_pattern("//"), Err(RouteError::EmptySegment { .. })));
    }

    #[test]
    fn test_split_request() {
        assert_eq!(split_request("").unwrap(), Vec::<&str>::new());
        assert_eq!(split_request("/").unwrap(), Vec::<&str>::new());
        assert_eq!(split_request("/a/b/").unwrap(), vec!["a", "b"]);
        assert!(split_request("x/y").is_none());
    }

    #[test]
    fn test_shared_prefix_reuses_nodes() {
        let mut tree: SegmentMap<Req> = HashMap::new();
        insert(&mut tree, "GET", &["user", "info"], &any_segment, tag("info"), false).unwrap();
        insert(&mut tree, "GET", &["user", "card"], &any_segment, tag("card"), false).unwrap();
        insert(&mut tree, "GET", &["user"], &any_segment, tag("user"), false).unwrap();

        assert_eq!(tree.len(), 1);
        let user = &tree["user"];
        assert_eq!(user.child_count(), 2);
        assert!(user.is_terminal());
        assert_eq!(user.children["card"].pattern(), "/user/card");
        assert_eq!(user.children["card"].segment(), "card");
        assert_eq!(user.children["card"].depth(), 1);
        assert_eq!(count_terminals(&tree), 3);
    }

    #[test]
    fn test_rewrite_guard() {
        let mut tree: SegmentMap<Req> = HashMap::new();
        insert(&mut tree, "GET", &["a", "b"], &any_segment, tag("first"), false).unwrap();

        // Intermediate node without a handler can still be claimed.
        insert(&mut tree, "GET", &["a"], &any_segment, tag("a"), false).unwrap();

        let err = insert(&mut tree, "GET", &["a", "b"], &any_segment, tag("second"), false).unwrap_err();
        assert!(matches!(err, RouteError::NotRewritable { ref path, .. } if path == "/a/b"));

        insert(&mut tree, "GET", &["a", "b"], &any_segment, tag("second"), true).unwrap();
        let descent = descend(&tree, &["a", "b"]);
        let mut req = Vec::new();
        (descent.deepest_handler.unwrap())(&mut req);
        assert_eq!(req, vec!["second"]);
    }

    #[test]
    fn test_descend_stops_on_miss() {
        let mut tree: SegmentMap<Req> = HashMap::new();
        insert(&mut tree, "GET", &["user"], &any_segment, tag("user"), false).unwrap();
        insert(&mut tree, "GET", &["user", "info", "deep"], &any_segment, tag("deep"), false).unwrap();

        let descent = descend(&tree, &["user", "info", "other"]);
        assert_eq!(descent.consumed, 2);
        assert_eq!(descent.node.unwrap().pattern(), "/user/info");
        assert!(!descent.node.unwrap().is_terminal());

        let mut req = Vec::new();
        (descent.deepest_handler.unwrap())(&mut req);
        assert_eq!(req, vec!["user"]);

        let miss = descend(&tree, &["nobody"]);
        assert!(miss.node.is_none());
        assert!(miss.deepest_handler.is_none());
        assert_eq!(miss.consumed, 0);
    }

    #[test]
    fn test_predicate_gates_literal_match() {
        let mut tree: SegmentMap<Req> = HashMap::new();
        insert(&mut tree, "GET", &["order", "42"], &numeric, tag("order"), false).unwrap();
        insert(&mut tree, "GET", &["order", "abc"], &numeric, tag("abc"), false).unwrap();

        assert!(tree["order"].children["42"].has_predicate());
        assert!(!tree["order"].has_predicate());

        let hit = descend(&tree, &["order", "42"]);
        assert_eq!(hit.consumed, 2);

        // Literal key exists, but the depth-1 predicate rejects it.
        let rejected = descend(&tree, &["order", "abc"]);
        assert_eq!(rejected.consumed, 1);
        assert_eq!(rejected.node.unwrap().pattern(), "/order");
    }

    #[test]
    fn test_reused_node_keeps_first_predicate() {
        let mut tree: SegmentMap<Req> = HashMap::new();
        insert(&mut tree, "GET", &["order", "7"], &numeric, tag("seven"), false).unwrap();
        insert(&mut tree, "GET", &["order", "7", "items"], &any_segment, tag("items"), false).unwrap();

        assert!(tree["order"].children["7"].has_predicate());
        assert!(!tree["order"].children["7"].children["items"].has_predicate());
    }
}

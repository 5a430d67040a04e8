//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn validated group configs into route groups, in order
//! - Build per-depth predicates from segment rules
//! - Install config-driven interceptors
//!
//! # Design Decisions
//! - Fail fast: the first registration error aborts startup
//! - Everything goes through the public registration API, the same one an
//!   embedding application would use

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::header::{HeaderValue, CONTENT_TYPE};
use axum::http::StatusCode;
use thiserror::Error;

use crate::config::{GroupConfig, InterceptorConfig, RouteConfig, RouterConfig, SegmentRule};
use crate::http::exchange::{not_found, Exchange};
use crate::routing::{Intercept, Predicate, RouteError, RouteGroup, Router, SegmentNode};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("group `{prefix}`: {source}")]
    Route {
        prefix: String,
        #[source]
        source: RouteError,
    },

    #[error("route {method} {path}: invalid status {status}")]
    InvalidStatus {
        method: String,
        path: String,
        status: u16,
    },

    #[error("route {method} {path}: invalid content type `{value}`")]
    InvalidContentType {
        method: String,
        path: String,
        value: String,
    },
}

/// Build the route table described by `config`.
pub fn build_router(config: &RouterConfig) -> Result<Router<Exchange>, StartupError> {
    let router = Router::new(not_found);

    for group_config in &config.groups {
        let group = router.add_group(build_group(group_config)?);
        if group_config.paused {
            group.pause();
        }
    }

    tracing::info!(groups = router.group_count(), "Route table built");
    Ok(router)
}

fn build_group(config: &GroupConfig) -> Result<RouteGroup<Exchange>, StartupError> {
    let group = RouteGroup::new(config.prefix.as_str())
        .rewritable(config.rewritable)
        .short_match(config.short_match);

    let rules: HashMap<usize, SegmentRule> = config
        .segment_rules
        .iter()
        .map(|r| (r.depth, r.rule))
        .collect();
    let predicates = |depth: usize| -> Option<Predicate> {
        let rule = *rules.get(&depth)?;
        let check: Predicate = Arc::new(move |value: &str| rule.check(value));
        Some(check)
    };

    for route in &config.routes {
        let handler = static_response(route)?;
        group
            .add_handler(&route.method, &route.path, &predicates, handler)
            .map_err(|source| StartupError::Route {
                prefix: config.prefix.clone(),
                source,
            })?;
    }

    if let Some(interceptor) = &config.interceptor {
        install_interceptor(&group, interceptor);
    }
    Ok(group)
}

/// Handler that answers with the route's configured status, type and body.
fn static_response(
    route: &RouteConfig,
) -> Result<impl Fn(&mut Exchange) + Send + Sync + 'static, StartupError> {
    let status = StatusCode::from_u16(route.status).map_err(|_| StartupError::InvalidStatus {
        method: route.method.clone(),
        path: route.path.clone(),
        status: route.status,
    })?;
    let content_type =
        HeaderValue::from_str(&route.content_type).map_err(|_| StartupError::InvalidContentType {
            method: route.method.clone(),
            path: route.path.clone(),
            value: route.content_type.clone(),
        })?;
    let body = route.body.clone();

    Ok(move |exchange: &mut Exchange| {
        exchange.set_status(status);
        exchange.insert_header(CONTENT_TYPE, content_type.clone());
        exchange.write(body.as_bytes());
    })
}

fn install_interceptor(group: &RouteGroup<Exchange>, config: &InterceptorConfig) {
    let banner = config.banner.clone();
    let suspend_without_node = config.suspend_without_node;

    group.set_interceptor(move |exchange: &mut Exchange, node: Option<&SegmentNode<Exchange>>| {
        if let Some(banner) = &banner {
            exchange.write(banner.as_bytes());
        }
        if suspend_without_node && node.is_none() {
            Intercept::Suspend
        } else {
            Intercept::Proceed
        }
    });
}

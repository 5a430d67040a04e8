//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse, status codes)
//! - Reject route patterns the router would refuse at startup
//! - Detect duplicate routes in groups that forbid rewrites
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::matcher::split_pattern;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    InvalidBindAddress(String),

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),

    #[error("unknown log level `{0}`")]
    InvalidLogLevel(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("group `{group}`: route `{path}` has no method")]
    EmptyMethod { group: String, path: String },

    #[error("group `{group}`: invalid route path `{path}`: {reason}")]
    InvalidPath {
        group: String,
        path: String,
        reason: String,
    },

    #[error("group `{group}`: route {method} {path} has invalid status {status}")]
    InvalidStatus {
        group: String,
        method: String,
        path: String,
        status: u16,
    },

    #[error("group `{group}`: duplicate route {method} {path} in a non-rewritable group")]
    DuplicateRoute {
        group: String,
        method: String,
        path: String,
    },

    #[error("group `{group}`: more than one segment rule for depth {depth}")]
    DuplicateSegmentRule { group: String, depth: usize },
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for group in &config.groups {
        let name = &group.prefix;

        let mut depths = HashSet::new();
        for rule in &group.segment_rules {
            if !depths.insert(rule.depth) {
                errors.push(ValidationError::DuplicateSegmentRule {
                    group: name.clone(),
                    depth: rule.depth,
                });
            }
        }

        let mut seen = HashSet::new();
        for route in &group.routes {
            if route.method.is_empty() {
                errors.push(ValidationError::EmptyMethod {
                    group: name.clone(),
                    path: route.path.clone(),
                });
            }
            if !(100..=999).contains(&route.status) {
                errors.push(ValidationError::InvalidStatus {
                    group: name.clone(),
                    method: route.method.clone(),
                    path: route.path.clone(),
                    status: route.status,
                });
            }

            match split_pattern(&route.path) {
                Ok(segments) => {
                    let key = (route.method.clone(), segments.join("/"));
                    if !seen.insert(key) && !group.rewritable {
                        errors.push(ValidationError::DuplicateRoute {
                            group: name.clone(),
                            method: route.method.clone(),
                            path: route.path.clone(),
                        });
                    }
                }
                Err(e) => errors.push(ValidationError::InvalidPath {
                    group: name.clone(),
                    path: route.path.clone(),
                    reason: e.to_string(),
                }),
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route groups, in dispatch order.
    pub groups: Vec<GroupConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8888").
    pub bind_address: String,

    /// Maximum request body buffered for handlers, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8888".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One prefix-scoped route group.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GroupConfig {
    /// Path prefix; empty matches every request.
    pub prefix: String,

    /// Allow later routes to replace earlier ones at the same path.
    pub rewritable: bool,

    /// Dispatch partial matches to the deepest handler on the walk.
    pub short_match: bool,

    /// Start the group paused.
    pub paused: bool,

    /// Per-depth segment validators.
    pub segment_rules: Vec<SegmentRuleConfig>,

    /// Optional interceptor run before every handler in the group.
    pub interceptor: Option<InterceptorConfig>,

    /// Routes in registration order.
    pub routes: Vec<RouteConfig>,
}

/// Validator applied to the segment at `depth`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentRuleConfig {
    pub depth: usize,
    pub rule: SegmentRule,
}

/// Built-in segment validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentRule {
    /// Accept any value.
    Any,
    /// ASCII digits only.
    Numeric,
    /// ASCII letters only.
    Alpha,
    /// ASCII letters and digits.
    Alphanumeric,
}

impl SegmentRule {
    /// Whether `value` satisfies the rule. Empty values never do, except
    /// under [`SegmentRule::Any`].
    pub fn check(self, value: &str) -> bool {
        match self {
            SegmentRule::Any => true,
            SegmentRule::Numeric => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            SegmentRule::Alpha => !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphabetic()),
            SegmentRule::Alphanumeric => {
                !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric())
            }
        }
    }
}

/// Interceptor behavior for a group.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct InterceptorConfig {
    /// Text written to the response before the handler runs.
    pub banner: Option<String>,

    /// Suspend requests served by the branch root handler (no matched node).
    pub suspend_without_node: bool,
}

/// A static-response route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP method (e.g., "GET").
    pub method: String,

    /// Path pattern relative to the group prefix.
    pub path: String,

    /// Response status code.
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body.
    #[serde(default)]
    pub body: String,

    /// Response content type.
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "text/plain; charset=utf-8".to_string()
}

impl RouterConfig {
    /// Built-in route table used when no config file is given.
    pub fn demo() -> Self {
        let route = |method: &str, path: &str| RouteConfig {
            method: method.to_string(),
            path: path.to_string(),
            status: default_status(),
            body: "hello from handler!".to_string(),
            content_type: default_content_type(),
        };

        Self {
            groups: vec![GroupConfig {
                segment_rules: vec![SegmentRuleConfig {
                    depth: 0,
                    rule: SegmentRule::Any,
                }],
                interceptor: Some(InterceptorConfig {
                    banner: Some("processed in interceptor!\n".to_string()),
                    suspend_without_node: true,
                }),
                routes: vec![
                    route("GET", "/"),
                    route("GET", "/user/info"),
                    route("GET", "/user/card"),
                    route("DELETE", "/user/mod"),
                ],
                ..GroupConfig::default()
            }],
            ..Self::default()
        }
    }
}

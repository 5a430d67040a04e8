//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → lifecycle::startup builds the route table from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; route groups are append-only anyway
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    GroupConfig, InterceptorConfig, ListenerConfig, LogFormat, ObservabilityConfig, RouteConfig,
    RouterConfig, SegmentRule, SegmentRuleConfig, TimeoutConfig,
};

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatch context.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Controller discovery settings.
    pub discovery: DiscoveryConfig,

    /// Route registration and warm-up settings.
    pub routing: RoutingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Controller discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Module path prefix to restrict discovery to (e.g. "shop::controllers").
    /// Dotted prefixes ("shop.controllers") are accepted as well.
    pub scope: Option<String>,
}

/// Routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Verbs a generic route tag with an empty verb list is mapped to.
    pub catch_all_verbs: Vec<String>,

    /// Invoke every route once at startup to resolve its view name.
    pub warm_up_views: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            catch_all_verbs: default_catch_all_verbs(),
            warm_up_views: true,
        }
    }
}

pub(crate) fn default_catch_all_verbs() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "PATCH"]
        .iter()
        .map(|v| v.to_string())
        .collect()
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

    /// Log line format.
    pub log_format: LogFormat,

    /// Record dispatch counters through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}

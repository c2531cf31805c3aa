//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DispatchConfig (validated, immutable)
//!     → handed to DispatchContext::build
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table is never rebuilt from it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{DiscoveryConfig, DispatchConfig, LogFormat, ObservabilityConfig, RoutingConfig};

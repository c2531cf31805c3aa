//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     ControllerType[]
//!     → registry.rs (merge member tags, apply base paths)
//!     → Route[] (declaration order)
//!     → indexed by template in the dispatch context
//!
//! Per request:
//!     path
//!     → matcher.rs (exact template, then pattern scan, then normalized form)
//!     → matched template + extracted path parameters
//! ```
//!
//! # Design Decisions
//! - Templates compiled once, immutable at runtime
//! - Deterministic: same table and path always select the same template
//! - Literal text in templates never acts as a pattern

pub mod matcher;
pub mod registry;
pub mod route;

pub use matcher::{find_best_template, Matcher, TemplateSet};
pub use registry::{build_routes, build_routes_with};
pub use route::{join_template, parse_verb, Route, VerbMap, DEFAULT_CATCH_ALL, PATH_PARAM_PREFIX};

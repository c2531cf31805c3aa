//! Controller discovery subsystem.
//!
//! # Data Flow
//! ```text
//! impl Controller for T + register_controller!(T)
//!     → registry.rs (link-time inventory of registrations)
//!     → scan.rs (dedupe, scope filter, load, sort)
//!     → ControllerType[] handed to the route registry
//! ```
//!
//! # Design Decisions
//! - Registration is explicit; there is no runtime reflection
//! - A controller that fails to load never aborts the scan
//! - Loading twice yields the same controllers in the same order

pub mod controller;
pub mod registry;
pub mod scan;

pub use controller::{Controller, ControllerType, LoadError};
pub use registry::ControllerRegistration;
pub use scan::Discovery;

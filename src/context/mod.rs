//! Dispatch context subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Discovery → build_routes → warm-up → index by template → DispatchContext
//!
//! Per request:
//!     resolve(path, verb)
//!         → exact template or best pattern template
//!         → Resolved { route, member, path params }
//!     invoke(resolved, bag)
//!         → bind arguments → run handler on a fresh controller → Outcome
//! ```
//!
//! # Design Decisions
//! - The context is an explicit value; `LazyContext` gives one-time init
//!   without a hidden global
//! - Route conflicts are logged and kept for inspection; last writer wins

pub mod dispatch;
pub mod error;
pub mod lazy;

pub use dispatch::{DispatchContext, Resolved};
pub use error::{DispatchError, RouteConflict};
pub use lazy::LazyContext;

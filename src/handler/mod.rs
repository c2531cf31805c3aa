//! Handler subsystem.
//!
//! # Responsibilities
//! - Turn typed handler functions into type-erased, shareable invokers
//! - Carry the routing tags and parameter specs of each member
//! - Convert handler return values into dispatch outcomes
//!
//! # Design Decisions
//! - No reflection: parameter binding shapes come from the handler's types
//! - A fresh controller is built for every invocation
//! - Panics inside handlers are caught at the member boundary

pub mod member;
pub mod outcome;
pub mod typed;

pub use member::{HandlerSet, Member, MemberDecl, RouteTag, VerbTag};
pub use outcome::{HandlerError, IntoOutcome, InvokeError, Json, ModelView, Opaque, Outcome};
pub use typed::{Handler, ParamShape};

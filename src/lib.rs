//! Controller discovery, route registry, URL matching and parameter binding.
//!
//! Controllers declare handler members with routing tags; discovery loads
//! them, the registry turns their tags into routes, and the dispatch context
//! resolves request paths to handlers and binds request values to their
//! arguments.
//!
//! ```ignore
//! use controller_dispatch::prelude::*;
//!
//! #[derive(Default)]
//! struct UserController;
//!
//! impl UserController {
//!     fn details(&self, id: i64) -> ModelView {
//!         ModelView::new("user-details").with("userId", id)
//!     }
//! }
//!
//! impl Controller for UserController {
//!     fn routes(h: &mut HandlerSet<Self>) {
//!         h.member("details", Self::details)
//!             .get("/user/{id}")
//!             .param_with("id", RequestParam::new());
//!     }
//! }
//!
//! register_controller!(UserController);
//!
//! let context = DispatchContext::build(&DispatchConfig::default());
//! let outcome = context.dispatch("/user/7", &Method::GET, BindingBag::new())?;
//! ```

pub mod binding;
pub mod config;
pub mod context;
pub mod discovery;
pub mod handler;
pub mod observability;
pub mod routing;

#[doc(hidden)]
pub use inventory;

pub use binding::{BindError, BindingBag, BindingMap, Form, FormModel, RequestParam};
pub use config::DispatchConfig;
pub use context::{DispatchContext, DispatchError, LazyContext, Resolved};
pub use discovery::{Controller, ControllerType, Discovery};
pub use handler::{HandlerSet, Json, ModelView, Opaque, Outcome, RouteTag, VerbTag};
pub use routing::Route;

/// Everything a controller module usually needs.
pub mod prelude {
    pub use crate::binding::{BindingBag, BindingMap, FieldSpec, Form, FormModel, RequestParam, ScalarType};
    pub use crate::config::DispatchConfig;
    pub use crate::context::{DispatchContext, DispatchError, LazyContext};
    pub use crate::discovery::Controller;
    pub use crate::handler::{HandlerError, HandlerSet, Json, ModelView, Opaque, Outcome, RouteTag, VerbTag};
    pub use crate::register_controller;
    pub use http::Method;
}

//! Parameter binding subsystem.
//!
//! # Data Flow
//! ```text
//! Handler registration:
//!     parameter types (FromArgument::kind) + RequestParam tags
//!     → ParameterSpec[] (cached on the member)
//!
//! Per request:
//!     BindingBag (path params + request fields)
//!     → binder.rs (ParameterSpec[] → Arguments)
//!     → extract.rs (Argument → typed handler parameter)
//! ```
//!
//! # Design Decisions
//! - Raw strings stay raw in the bag; inference only shapes the map view
//! - Composites are assembled as JSON objects and deserialized with serde
//! - Binding errors always name the offending parameter or field

pub mod bag;
pub mod binder;
pub mod extract;
pub mod scalar;
pub mod spec;
pub mod validate;

pub use bag::{BindingBag, BindingMap};
pub use binder::{bind, Argument, Arguments, BindError};
pub use extract::{Form, FromArgument};
pub use scalar::{Scalar, ScalarType};
pub use spec::{FieldKind, FieldSpec, FormModel, ParamKind, ParameterSpec, RequestParam};
pub use validate::{validate_controller, ValidationReport};

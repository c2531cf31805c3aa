//! Handler results.
//!
//! A handler may return a view name, a `ModelView`, a structured JSON result,
//! a map to merge into the response model, or an opaque value. The transport
//! layer decides how each kind becomes bytes on the wire.

use std::any::Any;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::binding::{BindError, BindingMap};

/// Error type handlers report failures with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A view name plus the model data to render it with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelView {
    pub view: String,
    pub data: BindingMap,
}

impl ModelView {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            data: BindingMap::new(),
        }
    }

    /// Add one model entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_data(key, value);
        self
    }

    pub fn add_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn set_view(&mut self, view: impl Into<String>) {
        self.view = view.into();
    }
}

/// What a handler invocation produced.
pub enum Outcome {
    /// Render `view` with its model data.
    View(ModelView),
    /// A structured result object.
    Json(Value),
    /// Entries to merge into the response model.
    Merge(BindingMap),
    /// Anything else; the transport may downcast it.
    Opaque(Box<dyn Any + Send>),
}

impl Outcome {
    /// The view name, if this outcome names one.
    pub fn view_name(&self) -> Option<&str> {
        match self {
            Outcome::View(mv) => Some(mv.view.as_str()),
            _ => None,
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::View(mv) => f.debug_tuple("View").field(mv).finish(),
            Outcome::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Outcome::Merge(map) => f.debug_tuple("Merge").field(map).finish(),
            Outcome::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

/// Wraps a serializable handler result.
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

/// Wraps a handler result the dispatcher should pass through untouched.
#[derive(Debug, Clone)]
pub struct Opaque<T>(pub T);

/// Conversion of handler return values.
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<Outcome, HandlerError>;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(self)
    }
}

impl IntoOutcome for ModelView {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(Outcome::View(self))
    }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(Outcome::View(ModelView::new(self)))
    }
}

impl IntoOutcome for &'static str {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(Outcome::View(ModelView::new(self)))
    }
}

impl IntoOutcome for BindingMap {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(Outcome::Merge(self))
    }
}

impl<T: Serialize> IntoOutcome for Json<T> {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(Outcome::Json(serde_json::to_value(self.0)?))
    }
}

impl<T: Any + Send> IntoOutcome for Opaque<T> {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(Outcome::Opaque(Box::new(self.0)))
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<HandlerError>,
{
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        self.map_err(Into::into)?.into_outcome()
    }
}

/// Why a handler call did not produce an outcome.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error(transparent)]
    Binding(#[from] BindError),

    #[error("{0}")]
    Failed(HandlerError),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Status {
        up: bool,
    }

    #[test]
    fn test_string_is_view_name() {
        let outcome = "demo_page".into_outcome().unwrap();
        assert_eq!(outcome.view_name(), Some("demo_page"));
    }

    #[test]
    fn test_json_and_merge() {
        match Json(Status { up: true }).into_outcome().unwrap() {
            Outcome::Json(value) => assert_eq!(value, serde_json::json!({ "up": true })),
            other => panic!("unexpected outcome: {other:?}"),
        }

        let mut map = BindingMap::new();
        map.insert("k".into(), Value::from(1));
        assert!(matches!(map.into_outcome().unwrap(), Outcome::Merge(_)));
    }

    #[test]
    fn test_opaque_downcasts() {
        match Opaque(42u64).into_outcome().unwrap() {
            Outcome::Opaque(any) => assert_eq!(any.downcast_ref::<u64>(), Some(&42)),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_result_error_passes_through() {
        let failed: Result<ModelView, std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let err = failed.into_outcome().unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_model_view_data() {
        let mv = ModelView::new("user-details").with("userId", "7").with("admin", false);
        assert_eq!(mv.data["userId"], Value::from("7"));
        assert_eq!(mv.data["admin"], Value::from(false));
    }
}

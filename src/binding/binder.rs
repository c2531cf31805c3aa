//! Argument binding.
//!
//! # Algorithm
//! ```text
//! for each ParameterSpec, in declaration order:
//!     Map        → whole merged bag (built once per call, shared)
//!     Composite  → fields from "<param>.<field>" or "<field>", nested
//!                  composites only when "<param>.<field>.*" entries exist
//!     Scalar     → path value, else field value, else default / zero / error
//!     Unsupported→ error when a value is present, absent otherwise
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::binding::bag::{BindingBag, BindingMap};
use crate::binding::scalar::{Scalar, ScalarType};
use crate::binding::spec::{FieldKind, FieldSpec, ParamKind, ParameterSpec, SchemaFn};

/// Errors raised while binding request values to handler arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("missing required parameter '{name}'")]
    MissingRequiredParameter { name: String },

    #[error("cannot convert '{value}' to {target} for parameter '{name}'")]
    UnconvertibleParameterValue {
        name: String,
        value: String,
        target: ScalarType,
    },

    #[error("unsupported type {type_name} for parameter '{name}'")]
    UnsupportedParameterType { name: String, type_name: String },

    /// The handler read an argument as a different type than it declared.
    #[error("argument {index} is {actual}, not {expected}")]
    ArgumentMismatch {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    /// A composite's field list does not fit its Rust type.
    #[error("argument {index} cannot be built as {type_name}: {reason}")]
    MalformedComposite {
        index: usize,
        type_name: &'static str,
        reason: String,
    },
}

impl BindError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BindError::MissingRequiredParameter { .. } => "missing",
            BindError::UnconvertibleParameterValue { .. } => "unconvertible",
            BindError::UnsupportedParameterType { .. } => "unsupported",
            BindError::ArgumentMismatch { .. } | BindError::MalformedComposite { .. } => "mismatch",
        }
    }
}

/// One bound handler argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A supplied (or defaulted) scalar.
    Scalar(Scalar),
    /// Nothing was supplied; the parameter takes its type's zero value.
    Absent(ScalarType),
    /// The merged binding bag.
    Map(Arc<BindingMap>),
    /// A composite assembled as a JSON object.
    Composite(Value),
    /// No value for a parameter of a type the binder cannot produce.
    Unbound,
}

impl Argument {
    pub fn describe(&self) -> &'static str {
        match self {
            Argument::Scalar(s) => s.scalar_type().name(),
            Argument::Absent(ty) => ty.name(),
            Argument::Map(_) => "map",
            Argument::Composite(_) => "composite",
            Argument::Unbound => "unbound",
        }
    }
}

/// Ordered arguments for one handler call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Argument>,
}

impl Arguments {
    pub fn new(values: Vec<Argument>) -> Self {
        Self { values }
    }

    /// Zero-valued arguments, as used for warm-up invocations.
    pub fn zeroed(params: &[ParameterSpec]) -> Self {
        let values = params
            .iter()
            .map(|p| match p.kind {
                ParamKind::Scalar(ty) => Argument::Absent(ty),
                ParamKind::Map => Argument::Map(Arc::new(BindingMap::new())),
                ParamKind::Composite(_) => Argument::Composite(Value::Object(Map::new())),
                ParamKind::Unsupported(_) => Argument::Unbound,
            })
            .collect();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.values.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.values.iter()
    }
}

impl IntoIterator for Arguments {
    type Item = Argument;
    type IntoIter = std::vec::IntoIter<Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Bind `bag` to the parameters of one handler.
pub fn bind(params: &[ParameterSpec], bag: &BindingBag) -> Result<Arguments, BindError> {
    let mut merged: Option<Arc<BindingMap>> = None;
    let mut values = Vec::with_capacity(params.len());

    for param in params {
        let argument = match param.kind {
            ParamKind::Map => {
                let map = merged.get_or_insert_with(|| Arc::new(bag.to_map()));
                Argument::Map(Arc::clone(map))
            }
            ParamKind::Composite(schema) => {
                Argument::Composite(Value::Object(bind_composite(&param.declared_name, schema, bag)?))
            }
            ParamKind::Scalar(ty) => bind_scalar(param, ty, bag)?,
            ParamKind::Unsupported(type_name) => bind_unsupported(param, type_name, bag)?,
        };
        values.push(argument);
    }

    Ok(Arguments::new(values))
}

fn lookup<'a>(param: &ParameterSpec, bag: &'a BindingBag) -> Option<&'a str> {
    bag.get(&param.bound_name).filter(|v| !v.trim().is_empty())
}

fn bind_scalar(param: &ParameterSpec, ty: ScalarType, bag: &BindingBag) -> Result<Argument, BindError> {
    let raw = match lookup(param, bag) {
        Some(raw) => raw,
        None => match &param.default_value {
            Some(default) => default.as_str(),
            None if param.required => {
                return Err(BindError::MissingRequiredParameter {
                    name: param.bound_name.clone(),
                })
            }
            None => return Ok(Argument::Absent(ty)),
        },
    };

    ty.convert(raw)
        .map(Argument::Scalar)
        .map_err(|e| BindError::UnconvertibleParameterValue {
            name: param.bound_name.clone(),
            value: e.value,
            target: e.target,
        })
}

fn bind_unsupported(
    param: &ParameterSpec,
    type_name: &'static str,
    bag: &BindingBag,
) -> Result<Argument, BindError> {
    let supplied = lookup(param, bag).is_some() || param.default_value.is_some();
    if supplied {
        return Err(BindError::UnsupportedParameterType {
            name: param.bound_name.clone(),
            type_name: type_name.to_string(),
        });
    }
    if param.required {
        return Err(BindError::MissingRequiredParameter {
            name: param.bound_name.clone(),
        });
    }
    Ok(Argument::Unbound)
}

/// Assemble a composite object for `prefix` from the bag.
fn bind_composite(prefix: &str, schema: SchemaFn, bag: &BindingBag) -> Result<Map<String, Value>, BindError> {
    let mut object = Map::new();

    for FieldSpec { name, kind } in schema() {
        let qualified = format!("{prefix}.{name}");
        match kind {
            FieldKind::Scalar(ty) => {
                let raw = bag
                    .get(&qualified)
                    .or_else(|| bag.get(name))
                    .filter(|v| !v.trim().is_empty());
                if let Some(raw) = raw {
                    let value = ty.convert(raw).map_err(|e| BindError::UnconvertibleParameterValue {
                        name: qualified.clone(),
                        value: e.value,
                        target: e.target,
                    })?;
                    object.insert(name.to_string(), value.into_json());
                }
            }
            FieldKind::Nested(nested) => {
                if bag.has_prefix(&qualified) {
                    let inner = bind_composite(&qualified, nested, bag)?;
                    object.insert(name.to_string(), Value::Object(inner));
                }
            }
            FieldKind::Unsupported(type_name) => {
                tracing::trace!(field = %qualified, type_name, "Skipping field of unsupported type");
            }
        }
    }

    Ok(object)
}

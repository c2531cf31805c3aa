//! Typed access to bound arguments.
//!
//! Every handler parameter type implements [`FromArgument`], which both
//! declares how the parameter is bound (`kind`) and turns the bound
//! [`Argument`] back into a Rust value.

use std::sync::Arc;

use crate::binding::bag::BindingMap;
use crate::binding::binder::{Argument, BindError};
use crate::binding::scalar::{Scalar, ScalarType};
use crate::binding::spec::{FormModel, ParamKind};

/// A handler parameter type.
pub trait FromArgument: Sized {
    /// How the binder should produce this parameter.
    fn kind() -> ParamKind;

    /// Whether a missing value is represented as `None`.
    fn is_optional() -> bool {
        false
    }

    fn from_argument(argument: Argument, index: usize) -> Result<Self, BindError>;
}

fn mismatch(index: usize, expected: &'static str, argument: &Argument) -> BindError {
    BindError::ArgumentMismatch {
        index,
        expected,
        actual: argument.describe(),
    }
}

macro_rules! scalar_argument {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromArgument for $ty {
                fn kind() -> ParamKind {
                    ParamKind::Scalar(ScalarType::$variant)
                }

                fn from_argument(argument: Argument, index: usize) -> Result<Self, BindError> {
                    match argument {
                        Argument::Scalar(Scalar::$variant(v)) => Ok(v),
                        Argument::Absent(ScalarType::$variant) => Ok(<$ty>::default()),
                        other => Err(mismatch(index, ScalarType::$variant.name(), &other)),
                    }
                }
            }

            impl FromArgument for Option<$ty> {
                fn kind() -> ParamKind {
                    ParamKind::Scalar(ScalarType::$variant)
                }

                fn is_optional() -> bool {
                    true
                }

                fn from_argument(argument: Argument, index: usize) -> Result<Self, BindError> {
                    match argument {
                        Argument::Absent(ScalarType::$variant) => Ok(None),
                        other => <$ty>::from_argument(other, index).map(Some),
                    }
                }
            }
        )*
    };
}

scalar_argument! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Bool,
    char => Char,
    String => Str,
}

impl FromArgument for BindingMap {
    fn kind() -> ParamKind {
        ParamKind::Map
    }

    fn from_argument(argument: Argument, index: usize) -> Result<Self, BindError> {
        match argument {
            Argument::Map(map) => Ok(Arc::try_unwrap(map).unwrap_or_else(|shared| (*shared).clone())),
            other => Err(mismatch(index, "map", &other)),
        }
    }
}

impl FromArgument for Arc<BindingMap> {
    fn kind() -> ParamKind {
        ParamKind::Map
    }

    fn from_argument(argument: Argument, index: usize) -> Result<Self, BindError> {
        match argument {
            Argument::Map(map) => Ok(map),
            other => Err(mismatch(index, "map", &other)),
        }
    }
}

/// Collections cannot be bound from a single request value; they are
/// declared so that a supplied value is reported instead of ignored.
impl<T: 'static> FromArgument for Vec<T> {
    fn kind() -> ParamKind {
        ParamKind::Unsupported(std::any::type_name::<Vec<T>>())
    }

    fn from_argument(argument: Argument, index: usize) -> Result<Self, BindError> {
        match argument {
            Argument::Unbound => Ok(Vec::new()),
            other => Err(mismatch(index, "collection", &other)),
        }
    }
}

/// A composite parameter built from dot-qualified fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form<T>(pub T);

impl<T> Form<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Form<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: FormModel> FromArgument for Form<T> {
    fn kind() -> ParamKind {
        ParamKind::Composite(T::fields)
    }

    fn from_argument(argument: Argument, index: usize) -> Result<Self, BindError> {
        match argument {
            Argument::Composite(value) => serde_json::from_value::<T>(value)
                .map(Form)
                .map_err(|e| BindError::MalformedComposite {
                    index,
                    type_name: std::any::type_name::<T>(),
                    reason: e.to_string(),
                }),
            other => Err(mismatch(index, "composite", &other)),
        }
    }
}

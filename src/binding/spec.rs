//! Parameter declarations.
//!
//! `RequestParam` is the bound-parameter tag a handler attaches to one of its
//! parameters. `ParameterSpec` is what the binder actually works from: the
//! tag folded together with the parameter's declared name and type, derived
//! once when the handler is registered.

use serde::de::DeserializeOwned;

use crate::binding::scalar::ScalarType;

/// Bound-parameter tag.
///
/// `value` is the explicit binding name, `name` an alias for it. A parameter
/// is required unless marked otherwise; the default value is used when the
/// request does not supply one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParam {
    pub value: String,
    pub name: String,
    pub required: bool,
    pub default_value: String,
}

impl Default for RequestParam {
    fn default() -> Self {
        Self {
            value: String::new(),
            name: String::new(),
            required: true,
            default_value: String::new(),
        }
    }
}

impl RequestParam {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag with an explicit binding name.
    pub fn named(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn optional(self) -> Self {
        self.required(false)
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }
}

/// Returns the field schema of a composite type.
pub type SchemaFn = fn() -> Vec<FieldSpec>;

/// Declared type of one composite field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Scalar(ScalarType),
    /// Nested composite, bound from `<prefix>.<field>.*` entries.
    Nested(SchemaFn),
    /// Collections and other types the binder leaves at their zero value.
    Unsupported(&'static str),
}

/// One field of a composite type.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn scalar(name: &'static str, ty: ScalarType) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar(ty),
        }
    }

    pub fn nested<T: FormModel>(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Nested(T::fields),
        }
    }

    pub const fn unsupported(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Unsupported(type_name),
        }
    }
}

/// A user-defined composite that can be built from dot-qualified fields.
///
/// The binder assembles a JSON object from [`FormModel::fields`] and
/// deserializes it, so implementors should carry `#[serde(default)]`:
/// fields without a matching entry keep their `Default` value.
pub trait FormModel: DeserializeOwned + Default {
    fn fields() -> Vec<FieldSpec>;
}

/// How a handler parameter is bound.
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    Scalar(ScalarType),
    /// Receives the whole merged binding bag.
    Map,
    Composite(SchemaFn),
    /// A type the binder cannot produce from request text.
    Unsupported(&'static str),
}

impl ParamKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ParamKind::Scalar(ty) => ty.name(),
            ParamKind::Map => "map",
            ParamKind::Composite(_) => "composite",
            ParamKind::Unsupported(name) => name,
        }
    }
}

/// Binding metadata for one handler parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Name the parameter was declared with.
    pub declared_name: String,
    /// Name looked up in the binding bag.
    pub bound_name: String,
    pub required: bool,
    pub default_value: Option<String>,
    pub kind: ParamKind,
    /// Whether the parameter carried a bound-parameter tag.
    pub tagged: bool,
    /// Whether the tag named the parameter explicitly or by alias.
    pub explicit_name: bool,
    /// Whether a missing value becomes `None` rather than a zero value.
    pub optional_type: bool,
}

impl ParameterSpec {
    /// Fold a declaration and its optional tag into a spec.
    ///
    /// The bound name is the tag's explicit name, else its alias, else the
    /// declared name. Untagged parameters are never required.
    pub fn new(declared_name: impl Into<String>, kind: ParamKind, tag: Option<&RequestParam>) -> Self {
        let declared_name = declared_name.into();
        let explicit = tag.and_then(|t| {
            [&t.value, &t.name]
                .into_iter()
                .find(|n| !n.is_empty())
                .cloned()
        });
        let explicit_name = explicit.is_some();
        let bound_name = explicit.unwrap_or_else(|| declared_name.clone());

        Self {
            bound_name,
            required: tag.is_some_and(|t| t.required),
            default_value: tag
                .map(|t| t.default_value.clone())
                .filter(|d| !d.is_empty()),
            kind,
            tagged: tag.is_some(),
            explicit_name,
            optional_type: false,
            declared_name,
        }
    }

    pub(crate) fn with_optional_type(mut self, optional: bool) -> Self {
        self.optional_type = optional;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_name_precedence() {
        let kind = ParamKind::Scalar(ScalarType::Str);

        let spec = ParameterSpec::new("id", kind, None);
        assert_eq!(spec.bound_name, "id");
        assert!(!spec.required);

        let tag = RequestParam::new().alias("user_id");
        let spec = ParameterSpec::new("id", kind, Some(&tag));
        assert_eq!(spec.bound_name, "user_id");
        assert!(spec.required);

        let tag = RequestParam::named("uid").alias("user_id");
        let spec = ParameterSpec::new("id", kind, Some(&tag));
        assert_eq!(spec.bound_name, "uid");
    }

    #[test]
    fn test_default_value_blank_means_none() {
        let kind = ParamKind::Scalar(ScalarType::Int);
        let spec = ParameterSpec::new("page", kind, Some(&RequestParam::new().optional()));
        assert_eq!(spec.default_value, None);

        let tag = RequestParam::new().optional().default_value("1");
        let spec = ParameterSpec::new("page", kind, Some(&tag));
        assert_eq!(spec.default_value.as_deref(), Some("1"));
        assert!(!spec.required);
    }
}

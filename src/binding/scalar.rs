//! Scalar parameter types and string conversion.

use std::fmt;

use serde_json::Value;

/// Declared type of a scalar handler parameter or form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Bool,
    Char,
    Str,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Byte => "i8",
            ScalarType::Short => "i16",
            ScalarType::Int => "i32",
            ScalarType::Long => "i64",
            ScalarType::Float => "f32",
            ScalarType::Double => "f64",
            ScalarType::Bool => "bool",
            ScalarType::Char => "char",
            ScalarType::Str => "String",
        }
    }

    /// The value a parameter of this type takes when nothing was supplied.
    pub fn zero(self) -> Scalar {
        match self {
            ScalarType::Byte => Scalar::Byte(0),
            ScalarType::Short => Scalar::Short(0),
            ScalarType::Int => Scalar::Int(0),
            ScalarType::Long => Scalar::Long(0),
            ScalarType::Float => Scalar::Float(0.0),
            ScalarType::Double => Scalar::Double(0.0),
            ScalarType::Bool => Scalar::Bool(false),
            ScalarType::Char => Scalar::Char('\0'),
            ScalarType::Str => Scalar::Str(String::new()),
        }
    }

    /// Convert raw request text into this type.
    ///
    /// Numbers are parsed as-is (no trimming). Floating-point text must name
    /// a finite value; `NaN` and the infinities are rejected. Booleans never fail: `true`,
    /// `on` and `1` (any case) are true, everything else is false. A char
    /// takes the first character.
    pub fn convert(self, raw: &str) -> Result<Scalar, ConversionError> {
        let fail = || ConversionError {
            value: raw.to_string(),
            target: self,
        };
        Ok(match self {
            ScalarType::Byte => Scalar::Byte(raw.parse().map_err(|_| fail())?),
            ScalarType::Short => Scalar::Short(raw.parse().map_err(|_| fail())?),
            ScalarType::Int => Scalar::Int(raw.parse().map_err(|_| fail())?),
            ScalarType::Long => Scalar::Long(raw.parse().map_err(|_| fail())?),
            ScalarType::Float => {
                let value: f32 = raw.parse().map_err(|_| fail())?;
                if !value.is_finite() {
                    return Err(fail());
                }
                Scalar::Float(value)
            }
            ScalarType::Double => {
                let value: f64 = raw.parse().map_err(|_| fail())?;
                if !value.is_finite() {
                    return Err(fail());
                }
                Scalar::Double(value)
            }
            ScalarType::Bool => Scalar::Bool(is_truthy(raw)),
            ScalarType::Char => Scalar::Char(raw.chars().next().unwrap_or('\0')),
            ScalarType::Str => Scalar::Str(raw.to_string()),
        })
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Truthiness used for boolean parameters.
pub fn is_truthy(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("on") || raw == "1"
}

/// Raw text that does not parse as the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub value: String,
    pub target: ScalarType,
}

/// A converted scalar argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl Scalar {
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Scalar::Byte(_) => ScalarType::Byte,
            Scalar::Short(_) => ScalarType::Short,
            Scalar::Int(_) => ScalarType::Int,
            Scalar::Long(_) => ScalarType::Long,
            Scalar::Float(_) => ScalarType::Float,
            Scalar::Double(_) => ScalarType::Double,
            Scalar::Bool(_) => ScalarType::Bool,
            Scalar::Char(_) => ScalarType::Char,
            Scalar::Str(_) => ScalarType::Str,
        }
    }

    /// JSON form, used when assembling composite objects.
    pub fn into_json(self) -> Value {
        match self {
            Scalar::Byte(v) => Value::from(v),
            Scalar::Short(v) => Value::from(v),
            Scalar::Int(v) => Value::from(v),
            Scalar::Long(v) => Value::from(v),
            Scalar::Float(v) => Value::from(v),
            Scalar::Double(v) => Value::from(v),
            Scalar::Bool(v) => Value::from(v),
            Scalar::Char(v) => Value::from(v.to_string()),
            Scalar::Str(v) => Value::from(v),
        }
    }
}

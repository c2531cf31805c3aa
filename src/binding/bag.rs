//! Per-request binding values.
//!
//! A `BindingBag` keeps path-extracted parameters apart from request fields:
//! scalar lookups consult the path first, and the merged JSON view handed to
//! map parameters lets path values override fields of the same name.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

/// String-keyed map of untyped values, as handed to map parameters.
pub type BindingMap = Map<String, Value>;

/// Values available to bind one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingBag {
    path: BTreeMap<String, String>,
    fields: BTreeMap<String, String>,
}

impl BindingBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from request fields (query or form).
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut bag = Self::new();
        for (name, value) in fields {
            bag.insert_field(name, value);
        }
        bag
    }

    /// Decode an `application/x-www-form-urlencoded` string.
    ///
    /// A leading `?` is ignored. For repeated names the first value wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut bag = Self::new();
        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            bag.fields
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        bag
    }

    /// Add path parameters; they take precedence over fields.
    pub fn with_path_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in params {
            self.insert_path(name, value);
        }
        self
    }

    pub fn insert_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn insert_path(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.path.insert(name.into(), value.into());
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Raw value for `name`: path entry first, then request field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.path_param(name).or_else(|| self.field(name))
    }

    /// True if any entry is named `<prefix>.<something>`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        let dotted = format!("{prefix}.");
        self.path
            .keys()
            .chain(self.fields.keys())
            .any(|k| k.starts_with(&dotted))
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.fields.is_empty()
    }

    /// Merged view with scalar inference applied to every value.
    pub fn to_map(&self) -> BindingMap {
        let mut map = BindingMap::new();
        for (name, value) in self.fields.iter().chain(self.path.iter()) {
            map.insert(name.clone(), infer(value));
        }
        map
    }
}

/// Guess the JSON type of a request string.
pub fn infer(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}

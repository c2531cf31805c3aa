//! Route records.
//!
//! A route binds one URL template to a handler member per HTTP verb, plus the
//! view to render and free-form model data. Routes are built by the registry,
//! indexed by the dispatch context, and copied per request when a pattern
//! template matches a concrete path.

use std::fmt;

use http::Method;
use serde_json::Value;

use crate::binding::BindingMap;
use crate::discovery::ControllerType;
use crate::handler::Member;

/// The verbs an untagged catch-all route serves.
pub const DEFAULT_CATCH_ALL: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// Verb → member mapping, in insertion order. Each verb appears once.
#[derive(Clone, Default)]
pub struct VerbMap {
    entries: Vec<(Method, Member)>,
}

impl VerbMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `verb` to `member`, returning the member it replaced.
    pub fn insert(&mut self, verb: Method, member: Member) -> Option<Member> {
        match self.entries.iter_mut().find(|(v, _)| *v == verb) {
            Some((_, existing)) => Some(std::mem::replace(existing, member)),
            None => {
                self.entries.push((verb, member));
                None
            }
        }
    }

    pub fn get(&self, verb: &Method) -> Option<&Member> {
        self.entries.iter().find(|(v, _)| v == verb).map(|(_, m)| m)
    }

    pub fn contains(&self, verb: &Method) -> bool {
        self.get(verb).is_some()
    }

    pub fn verbs(&self) -> impl Iterator<Item = &Method> {
        self.entries.iter().map(|(v, _)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Method, &Member)> {
        self.entries.iter().map(|(v, m)| (v, m))
    }

    pub fn first(&self) -> Option<(&Method, &Member)> {
        self.entries.first().map(|(v, m)| (v, m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for VerbMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(v, m)| (v.as_str(), m.name())))
            .finish()
    }
}

/// Prefix for path parameters copied into a scoped route's data, keeping
/// them apart from keys the handler's view data already uses.
pub const PATH_PARAM_PREFIX: &str = "urlParam_";

/// One entry of the route table.
#[derive(Clone)]
pub struct Route {
    template: String,
    handlers: VerbMap,
    view: String,
    owner: ControllerType,
    data: BindingMap,
}

impl Route {
    pub fn new(template: String, handlers: VerbMap, view: String, owner: ControllerType) -> Self {
        Self {
            template,
            handlers,
            view,
            owner,
            data: BindingMap::new(),
        }
    }

    /// The URL template, or the concrete path for a per-request copy.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn handlers(&self) -> &VerbMap {
        &self.handlers
    }

    pub fn handler(&self, verb: &Method) -> Option<&Member> {
        self.handlers.get(verb)
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn owner(&self) -> &ControllerType {
        &self.owner
    }

    pub fn data(&self) -> &BindingMap {
        &self.data
    }

    pub fn set_view(&mut self, view: impl Into<String>) {
        self.view = view.into();
    }

    pub fn add_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub(crate) fn handlers_mut(&mut self) -> &mut VerbMap {
        &mut self.handlers
    }

    pub(crate) fn set_owner(&mut self, owner: ControllerType) {
        self.owner = owner;
    }

    pub(crate) fn extend_data(&mut self, data: BindingMap) {
        self.data.extend(data);
    }

    /// Copy of this route for one concrete path, with each extracted path
    /// parameter added to its data under [`PATH_PARAM_PREFIX`] + name.
    pub fn scoped<I>(&self, path: &str, params: I) -> Route
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut route = self.clone();
        route.template = path.to_string();
        for (name, value) in params {
            route.data.insert(format!("{PATH_PARAM_PREFIX}{name}"), Value::String(value));
        }
        route
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("template", &self.template)
            .field("handlers", &self.handlers)
            .field("view", &self.view)
            .field("owner", &self.owner.name())
            .field("data", &self.data)
            .finish()
    }
}

/// Parse a verb token, upper-casing it first.
pub fn parse_verb(token: &str) -> Option<Method> {
    let token = token.trim().to_ascii_uppercase();
    if token.is_empty() {
        return None;
    }
    Method::from_bytes(token.as_bytes()).ok()
}

/// Prefix `template` with `base`, with exactly one `/` at the join.
///
/// The result always starts with `/` and is never empty.
pub fn join_template(base: &str, template: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let template = template.trim();
    let template = template.trim_start_matches('/');

    let mut joined = String::with_capacity(base.len() + template.len() + 2);
    if !base.is_empty() {
        if !base.starts_with('/') {
            joined.push('/');
        }
        joined.push_str(base);
    }
    if !template.is_empty() {
        joined.push('/');
        joined.push_str(template);
    }
    if joined.is_empty() {
        joined.push('/');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_template() {
        assert_eq!(join_template("", "/contact"), "/contact");
        assert_eq!(join_template("", "contact"), "/contact");
        assert_eq!(join_template("/demo", "/contact"), "/demo/contact");
        assert_eq!(join_template("/demo/", "contact"), "/demo/contact");
        assert_eq!(join_template("demo", "/"), "/demo");
        assert_eq!(join_template("", ""), "/");
        assert_eq!(join_template("/", "/"), "/");
        assert_eq!(join_template("/users", "/{id}"), "/users/{id}");
    }

    #[test]
    fn test_parse_verb() {
        assert_eq!(parse_verb("get"), Some(Method::GET));
        assert_eq!(parse_verb(" Patch "), Some(Method::PATCH));
        assert_eq!(parse_verb(""), None);
        assert_eq!(parse_verb("GE T"), None);
    }
}

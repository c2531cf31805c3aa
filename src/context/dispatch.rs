//! The dispatch context.
//!
//! # Responsibilities
//! - Build the route table once: discovery, registry, warm-up, indexing
//! - Resolve a path (and verb) to a route, extracting path parameters
//! - Bind request values and invoke the selected handler
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - One precompiled matcher per template
//! - Exact template hit first, then pattern scan in template order
//! - A pattern hit yields a per-request copy; the indexed route never changes
//! - Warm-up failures are logged and counted, never fatal

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use http::Method;

use crate::binding::{bind, Arguments, BindingBag};
use crate::config::DispatchConfig;
use crate::context::error::{DispatchError, RouteConflict};
use crate::discovery::Discovery;
use crate::handler::{InvokeError, Member, Outcome};
use crate::observability::metrics::DispatchMetrics;
use crate::routing::matcher::{clean_path, find_best_template, with_leading_slash, Matcher, TemplateSet};
use crate::routing::{build_routes_with, parse_verb, Route, DEFAULT_CATCH_ALL};

/// A route selected for one request.
#[derive(Debug, Clone)]
pub struct Resolved {
    route: Route,
    verb: Method,
    member: Member,
    path_params: Vec<(String, String)>,
}

impl Resolved {
    /// The matched route, scoped to the concrete path on a pattern hit.
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn verb(&self) -> &Method {
        &self.verb
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Placeholder values extracted from the request path.
    pub fn path_params(&self) -> &[(String, String)] {
        &self.path_params
    }
}

/// The route table plus everything needed to serve requests from it.
pub struct DispatchContext {
    routes: BTreeMap<String, Route>,
    matchers: BTreeMap<String, Matcher>,
    conflicts: Vec<RouteConflict>,
    metrics: DispatchMetrics,
}

impl DispatchContext {
    /// Discover every registered controller and build the table.
    pub fn build(config: &DispatchConfig) -> Self {
        Self::build_with(&Discovery::new(), config)
    }

    /// Build the table from the controllers `discovery` finds.
    pub fn build_with(discovery: &Discovery, config: &DispatchConfig) -> Self {
        let controllers = discovery.discover(config.discovery.scope.as_deref());
        let catch_all = catch_all_verbs(&config.routing.catch_all_verbs);
        let routes = build_routes_with(&controllers, &catch_all);
        Self::from_routes(routes, config)
    }

    /// Warm up and index already-built routes.
    pub fn from_routes(mut routes: Vec<Route>, config: &DispatchConfig) -> Self {
        let metrics = DispatchMetrics::new(config.observability.metrics_enabled);

        if config.routing.warm_up_views {
            for route in &mut routes {
                warm_up(route, &metrics);
            }
        }

        let mut table: BTreeMap<String, Route> = BTreeMap::new();
        let mut conflicts = Vec::new();
        for route in routes {
            match table.entry(route.template().to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(route);
                }
                Entry::Occupied(mut slot) => merge_into(slot.get_mut(), route, &mut conflicts),
            }
        }

        let mut matchers = BTreeMap::new();
        for template in table.keys() {
            match Matcher::new(template) {
                Ok(matcher) => {
                    matchers.insert(template.clone(), matcher);
                }
                Err(e) => {
                    tracing::warn!(template = %template, error = %e, "Template cannot be compiled; exact lookups only");
                }
            }
        }

        tracing::info!(
            routes = table.len(),
            conflicts = conflicts.len(),
            "Dispatch context ready"
        );

        Self {
            routes: table,
            matchers,
            conflicts,
            metrics,
        }
    }

    /// The route serving `path`.
    ///
    /// An exact template hit returns the indexed route. A pattern hit returns
    /// a copy scoped to `path` with the path parameters added to its data
    /// under the `urlParam_` prefix.
    pub fn find_route(&self, path: &str) -> Option<Cow<'_, Route>> {
        self.lookup(path).map(|(route, _)| route)
    }

    /// Like [`find_route`](Self::find_route), but only if the route maps `verb`.
    pub fn find_route_for(&self, path: &str, verb: &Method) -> Option<Cow<'_, Route>> {
        self.find_route(path).filter(|route| route.handler(verb).is_some())
    }

    /// The route table, ordered by template.
    pub fn all_routes(&self) -> &BTreeMap<String, Route> {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Verb mappings that replaced an earlier one while indexing.
    pub fn conflicts(&self) -> &[RouteConflict] {
        &self.conflicts
    }

    /// Select the route and handler for a request.
    pub fn resolve(&self, path: &str, verb: &Method) -> Result<Resolved, DispatchError> {
        let not_found = || DispatchError::NoMatchingRoute {
            path: path.to_string(),
            verb: verb.clone(),
        };

        let (route, path_params) = self.lookup(path).ok_or_else(not_found)?;
        let member = route.handler(verb).cloned().ok_or_else(not_found)?;

        Ok(Resolved {
            route: route.into_owned(),
            verb: verb.clone(),
            member,
            path_params,
        })
    }

    /// Bind `bag` (plus the resolved path parameters) and run the handler.
    pub fn invoke(&self, resolved: &Resolved, bag: BindingBag) -> Result<Outcome, DispatchError> {
        let bag = bag.with_path_params(resolved.path_params.iter().cloned());
        let member = &resolved.member;

        let args = bind(member.params(), &bag).map_err(|e| {
            self.metrics.record_binding_failure(e.kind());
            tracing::debug!(member = %member.name(), error = %e, "Binding failed");
            DispatchError::Binding(e)
        })?;

        match member.invoke(args) {
            Ok(outcome) => {
                self.metrics.record_invocation("ok");
                Ok(outcome)
            }
            Err(InvokeError::Binding(e)) => {
                self.metrics.record_binding_failure(e.kind());
                Err(DispatchError::Binding(e))
            }
            Err(e) => {
                self.metrics.record_invocation("error");
                let handler = format!("{}::{}", resolved.route.owner().name(), member.name());
                tracing::warn!(handler = %handler, error = %e, "Handler invocation failed");
                Err(DispatchError::Invocation { handler, source: e })
            }
        }
    }

    /// Resolve and invoke in one step.
    pub fn dispatch(&self, path: &str, verb: &Method, bag: BindingBag) -> Result<Outcome, DispatchError> {
        let resolved = self.resolve(path, verb)?;
        self.invoke(&resolved, bag)
    }

    fn lookup(&self, path: &str) -> Option<(Cow<'_, Route>, Vec<(String, String)>)> {
        let normalized = with_leading_slash(clean_path(path));
        let path = normalized.as_str();

        if let Some(route) = self.routes.get(path) {
            self.metrics.record_lookup("exact");
            return Some((Cow::Borrowed(route), Vec::new()));
        }

        let Some(template) = find_best_template(self, path) else {
            self.metrics.record_lookup("miss");
            tracing::trace!(path = %path, "No route");
            return None;
        };
        let route = self.routes.get(template)?;

        let mut params: Vec<(String, String)> = self
            .matchers
            .get(template)
            .map(|m| m.extract(path).into_iter().collect())
            .unwrap_or_default();
        params.sort();

        self.metrics.record_lookup("pattern");
        tracing::trace!(path = %path, template = %template, "Pattern route");
        Some((Cow::Owned(route.scoped(path, params.clone())), params))
    }
}

impl TemplateSet for DispatchContext {
    fn contains_template(&self, template: &str) -> bool {
        self.routes.contains_key(template)
    }

    fn templates(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.routes.keys().map(String::as_str))
    }

    fn template_matches(&self, template: &str, path: &str) -> bool {
        self.matchers
            .get(template)
            .is_some_and(|m| m.is_match(path))
    }
}

impl std::fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchContext")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field("conflicts", &self.conflicts.len())
            .finish()
    }
}

fn catch_all_verbs(configured: &[String]) -> Vec<Method> {
    let verbs: Vec<Method> = configured
        .iter()
        .filter_map(|token| {
            let verb = parse_verb(token);
            if verb.is_none() {
                tracing::warn!(verb = %token, "Ignoring invalid catch-all verb");
            }
            verb
        })
        .collect();

    if verbs.is_empty() {
        DEFAULT_CATCH_ALL.to_vec()
    } else {
        verbs
    }
}

/// Run the route's handler once with zero-valued arguments to learn its view.
fn warm_up(route: &mut Route, metrics: &DispatchMetrics) {
    let member = route
        .handler(&Method::GET)
        .or_else(|| route.handlers().first().map(|(_, m)| m))
        .cloned();
    let Some(member) = member else {
        return;
    };

    match member.invoke(Arguments::zeroed(member.params())) {
        Ok(Outcome::View(mv)) => {
            if !mv.view.trim().is_empty() {
                route.set_view(mv.view);
            }
            route.extend_data(mv.data);
        }
        Ok(_) => {}
        Err(e) => {
            metrics.record_warmup_failure();
            tracing::warn!(
                template = %route.template(),
                member = %member.name(),
                error = %e,
                "Warm-up invocation failed; keeping declared view"
            );
        }
    }
}

/// Fold `incoming` into the route already indexed under the same template.
///
/// Verbs are merged with the later handler winning. View and owner follow the
/// GET handler: they move to `incoming` only when it serves GET or the
/// existing route does not.
fn merge_into(existing: &mut Route, incoming: Route, conflicts: &mut Vec<RouteConflict>) {
    let takes_view =
        incoming.handler(&Method::GET).is_some() || existing.handler(&Method::GET).is_none();

    for (verb, member) in incoming.handlers().iter() {
        if let Some(previous) = existing.handlers_mut().insert(verb.clone(), member.clone()) {
            let conflict = RouteConflict {
                template: existing.template().to_string(),
                verb: verb.clone(),
                previous: format!("{}::{}", existing.owner().name(), previous.name()),
                replacement: format!("{}::{}", incoming.owner().name(), member.name()),
            };
            tracing::warn!(conflict = %conflict, "Route conflict");
            conflicts.push(conflict);
        }
    }
    if takes_view {
        existing.set_view(incoming.view());
        existing.set_owner(incoming.owner().clone());
        existing.extend_data(incoming.data().clone());
    } else {
        for (key, value) in incoming.data() {
            if !existing.data().contains_key(key) {
                existing.add_data(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{Controller, Discovery};
    use crate::handler::{HandlerSet, ModelView};

    #[derive(Default)]
    struct Files;

    impl Files {
        fn show(&self, name: String) -> String {
            format!("file-{name}")
        }
    }

    impl Controller for Files {
        fn routes(h: &mut HandlerSet<Self>) {
            h.member("show", Self::show).route("/files/{name}").param("name");
            h.member("index", Self::show).get("/files/index");
        }
    }

    #[derive(Default)]
    struct Forms;

    impl Forms {
        fn page(&self) -> ModelView {
            ModelView::new("form-page")
        }

        fn submitted(&self) -> ModelView {
            ModelView::new("form-done")
        }
    }

    impl Controller for Forms {
        fn routes(h: &mut HandlerSet<Self>) {
            h.member("page", Self::page).get("/signup");
            h.member("submitted", Self::submitted).post("/signup");
            h.member("submittedFirst", Self::submitted).post("/survey");
            h.member("pageLast", Self::page).get("/survey");
        }
    }

    fn context() -> DispatchContext {
        let discovery = Discovery::explicit_only().register::<Files>();
        DispatchContext::build_with(&discovery, &DispatchConfig::default())
    }

    #[test]
    fn test_catch_all_verbs_fallback() {
        assert_eq!(catch_all_verbs(&["get".into(), "bad verb".into()]), vec![Method::GET]);
        assert_eq!(catch_all_verbs(&[]), DEFAULT_CATCH_ALL.to_vec());
    }

    #[test]
    fn test_exact_hit_is_borrowed() {
        let context = context();
        assert!(matches!(context.find_route("/files/index"), Some(Cow::Borrowed(_))));
        assert!(matches!(context.find_route("/files/a.txt"), Some(Cow::Owned(_))));
    }

    #[test]
    fn test_template_set_uses_compiled_matchers() {
        let context = context();
        assert!(context.template_matches("/files/{name}", "/files/x"));
        assert!(!context.template_matches("/files/{name}", "/files/x/y"));
        assert!(!context.template_matches("/missing/{x}", "/missing/1"));
        assert_eq!(find_best_template(&context, "/files/x"), Some("/files/{name}"));
    }

    #[test]
    fn test_resolve_requires_verb() {
        let context = context();
        assert!(context.resolve("/files/index", &Method::GET).is_ok());
        let err = context.resolve("/files/index", &Method::DELETE).unwrap_err();
        assert!(err.is_not_found());

        let resolved = context.resolve("/files/a.txt", &Method::DELETE).unwrap();
        let outcome = context.invoke(&resolved, BindingBag::new()).unwrap();
        assert_eq!(outcome.view_name(), Some("file-a.txt"));
    }

    #[test]
    fn test_relative_path_hits_exact_route() {
        let context = context();
        let route = context.find_route("files/index").unwrap();
        assert!(matches!(route, Cow::Borrowed(_)));
        assert_eq!(route.template(), "/files/index");
        assert!(context.resolve("files/index?page=2", &Method::GET).is_ok());

        let scoped = context.find_route("files/a.txt").unwrap();
        assert_eq!(scoped.template(), "/files/a.txt");
    }

    #[test]
    fn test_shared_template_keeps_get_view() {
        let discovery = Discovery::explicit_only().register::<Forms>();
        let context = DispatchContext::build_with(&discovery, &DispatchConfig::default());
        assert!(context.conflicts().is_empty());

        for template in ["/signup", "/survey"] {
            let route = context.find_route(template).unwrap();
            assert_eq!(route.view(), "form-page", "{template}");
            assert_eq!(route.handlers().len(), 2);
            assert!(route.handler(&Method::POST).unwrap().name().starts_with("submitted"));
        }
    }
}

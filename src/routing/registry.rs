//! Route registry.
//!
//! # Responsibilities
//! - Turn the routing tags of every controller member into routes
//! - Merge the generic tag with the GET and POST tags of one member
//! - Apply the controller base path
//!
//! # Design Decisions
//! - Output order follows controller then member declaration order
//! - An empty verb list on the generic tag means every catch-all verb
//! - Bad verb tokens are logged and skipped, never fatal
//! - Template precedence: generic, then GET, then POST
//! - View precedence: POST, then GET, then generic, then the member name

use http::Method;

use crate::discovery::ControllerType;
use crate::handler::{Member, VerbTag};
use crate::routing::route::{join_template, parse_verb, Route, VerbMap, DEFAULT_CATCH_ALL};

/// Build routes for `controllers`, using the default catch-all verbs.
pub fn build_routes(controllers: &[ControllerType]) -> Vec<Route> {
    build_routes_with(controllers, &DEFAULT_CATCH_ALL)
}

/// Build routes for `controllers`; `catch_all` is the verb set an untagged
/// generic route serves.
pub fn build_routes_with(controllers: &[ControllerType], catch_all: &[Method]) -> Vec<Route> {
    let mut routes = Vec::new();
    for controller in controllers {
        for member in controller.members() {
            if let Some(route) = route_for(controller, member, catch_all) {
                tracing::debug!(
                    controller = %controller.name(),
                    member = %member.name(),
                    template = %route.template(),
                    verbs = route.handlers().len(),
                    "Registered route"
                );
                routes.push(route);
            }
        }
    }
    routes
}

fn route_for(controller: &ControllerType, member: &Member, catch_all: &[Method]) -> Option<Route> {
    if !member.is_routed() {
        return None;
    }

    let mut handlers = VerbMap::new();

    if let Some(tag) = member.route_tag() {
        if tag.verbs.is_empty() {
            for verb in catch_all {
                handlers.insert(verb.clone(), member.clone());
            }
        } else {
            for token in &tag.verbs {
                match parse_verb(token) {
                    Some(verb) => {
                        handlers.insert(verb, member.clone());
                    }
                    None => tracing::warn!(
                        controller = %controller.name(),
                        member = %member.name(),
                        verb = %token,
                        "Ignoring invalid verb"
                    ),
                }
            }
        }
    }
    if member.get_tag().is_some() {
        handlers.insert(Method::GET, member.clone());
    }
    if member.post_tag().is_some() {
        handlers.insert(Method::POST, member.clone());
    }

    if handlers.is_empty() {
        tracing::warn!(
            controller = %controller.name(),
            member = %member.name(),
            "Member has no usable verb; no route registered"
        );
        return None;
    }

    let template = non_blank(member.route_tag().map(|t| t.template.as_str()))
        .or_else(|| non_blank(member.get_tag().map(|t| t.template.as_str())))
        .or_else(|| non_blank(member.post_tag().map(|t| t.template.as_str())))
        .unwrap_or_default();

    let view = verb_view(member.post_tag())
        .or_else(|| verb_view(member.get_tag()))
        .or_else(|| non_blank(member.route_tag().map(|t| t.view.as_str())))
        .unwrap_or_else(|| member.name())
        .to_string();

    Some(Route::new(
        join_template(controller.base_path(), template),
        handlers,
        view,
        controller.clone(),
    ))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn verb_view(tag: Option<&VerbTag>) -> Option<&str> {
    non_blank(tag.map(|t| t.view.as_str()))
}

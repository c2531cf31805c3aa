//! End-to-end dispatch: resolve a request, bind its values, run the handler.

use controller_dispatch::binding::BindError;
use controller_dispatch::handler::InvokeError;
use controller_dispatch::prelude::*;
use serde_json::{json, Value};

mod common;

use common::{fixture_context, view_of};

#[test]
fn test_path_parameter_reaches_handler() {
    let context = fixture_context();
    let outcome = context
        .dispatch("/demo/users/42", &Method::GET, BindingBag::new())
        .unwrap();

    let mv = view_of(&outcome);
    assert_eq!(mv.view, "user-details");
    assert_eq!(mv.data["userId"], "42");
}

#[test]
fn test_resolved_route_is_scoped_to_path() {
    let context = fixture_context();
    let resolved = context.resolve("/demo/users/42?tab=posts", &Method::GET).unwrap();

    assert_eq!(resolved.route().template(), "/demo/users/42");
    assert_eq!(resolved.route().data()["urlParam_id"], "42");
    assert_eq!(resolved.path_params(), [("id".to_string(), "42".to_string())]);
    assert_eq!(resolved.member().name(), "getUser");

    let indexed = &context.all_routes()["/demo/users/{id}"];
    assert!(!indexed.data().contains_key("urlParam_id"));
}

#[test]
fn test_post_uses_default_for_blank_field() {
    let context = fixture_context();
    let bag = BindingBag::from_query("name=Ana&email=");
    let outcome = context.dispatch("/demo/users", &Method::POST, bag).unwrap();

    let mv = view_of(&outcome);
    assert_eq!(mv.view, "user-created");
    assert_eq!(mv.data["userName"], "Ana");
    assert_eq!(mv.data["userEmail"], "user@example.com");
}

#[test]
fn test_missing_required_parameter() {
    let context = fixture_context();
    let err = context
        .dispatch("/demo/users", &Method::POST, BindingBag::new())
        .unwrap_err();

    match err {
        DispatchError::Binding(BindError::MissingRequiredParameter { name }) => assert_eq!(name, "name"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_same_template_get_and_post() {
    let context = fixture_context();

    let form = context.dispatch("/demo/contact", &Method::GET, BindingBag::new()).unwrap();
    assert_eq!(view_of(&form).view, "contact-form");

    let bag = BindingBag::from_fields([("name", "Ana"), ("message", "Bonjour")]);
    let sent = context.dispatch("/demo/contact", &Method::POST, bag).unwrap();
    let mv = view_of(&sent);
    assert_eq!(mv.view, "contact-success");
    assert_eq!(mv.data["contactMessage"], "Bonjour");
}

#[test]
fn test_listed_verbs_only() {
    let context = fixture_context();

    let bag = BindingBag::from_fields([("action", "restock")]);
    let outcome = context.dispatch("/demo/products/9", &Method::PUT, bag).unwrap();
    let mv = view_of(&outcome);
    assert_eq!(mv.data["productId"], "9");
    assert_eq!(mv.data["requestedAction"], "restock");

    let outcome = context
        .dispatch("/demo/products/9", &Method::GET, BindingBag::new())
        .unwrap();
    assert_eq!(view_of(&outcome).data["requestedAction"], "default");

    let err = context
        .dispatch("/demo/products/9", &Method::DELETE, BindingBag::new())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_unknown_path_is_not_found() {
    let context = fixture_context();
    let err = context.resolve("/nowhere/at/all", &Method::GET).unwrap_err();
    assert!(matches!(err, DispatchError::NoMatchingRoute { ref path, .. } if path == "/nowhere/at/all"));
}

#[test]
fn test_nested_composite_from_dotted_fields() {
    let context = fixture_context();
    let bag = BindingBag::from_query("emp.nom=Dupont&emp.age=41&emp.dept.nom=IT&emp.skills=rust");
    let outcome = context.dispatch("/hr/employees", &Method::POST, bag).unwrap();

    match outcome {
        Outcome::Json(value) => assert_eq!(
            value,
            json!({ "nom": "Dupont", "age": 41, "dept": { "nom": "IT" }, "skills": [] })
        ),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_composite_without_nested_entries_keeps_defaults() {
    let context = fixture_context();
    let bag = BindingBag::from_fields([("nom", "Martin")]);
    let outcome = context.dispatch("/hr/employees", &Method::POST, bag).unwrap();

    match outcome {
        Outcome::Json(value) => {
            assert_eq!(value["nom"], "Martin");
            assert_eq!(value["age"], 0);
            assert_eq!(value["dept"], json!({ "nom": "" }));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_composite_conversion_failure() {
    let context = fixture_context();
    let bag = BindingBag::from_fields([("emp.age", "forty")]);
    let err = context.dispatch("/hr/employees", &Method::POST, bag).unwrap_err();

    match err {
        DispatchError::Binding(BindError::UnconvertibleParameterValue { name, value, .. }) => {
            assert_eq!(name, "emp.age");
            assert_eq!(value, "forty");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_map_parameter_gets_merged_bag() {
    let context = fixture_context();
    let bag = BindingBag::from_query("flag=TRUE&n=12&ratio=0.5&name=x");
    let outcome = context.dispatch("/hr/echo", &Method::PATCH, bag).unwrap();

    match outcome {
        Outcome::Merge(map) => {
            assert_eq!(map["flag"], Value::Bool(true));
            assert_eq!(map["n"], json!(12));
            assert_eq!(map["ratio"], json!(0.5));
            assert_eq!(map["name"], "x");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_opaque_outcome() {
    let context = fixture_context();
    let outcome = context
        .dispatch("/hr/teams/platform/headcount", &Method::GET, BindingBag::new())
        .unwrap();

    match outcome {
        Outcome::Opaque(any) => assert_eq!(any.downcast_ref::<usize>(), Some(&8)),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_unconvertible_path_value() {
    let context = fixture_context();
    let err = context
        .dispatch("/fragile/abc", &Method::GET, BindingBag::new())
        .unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Binding(BindError::UnconvertibleParameterValue { ref name, .. }) if name == "id"
    ));
}

#[test]
fn test_handler_error_is_invocation_failure() {
    let context = fixture_context();
    let err = context.dispatch("/fragile/0", &Method::GET, BindingBag::new()).unwrap_err();

    match err {
        DispatchError::Invocation { handler, source: InvokeError::Failed(inner) } => {
            assert!(handler.ends_with("FlakyController::fragile"));
            assert_eq!(inner.to_string(), "no record for id 0");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let ok = context.dispatch("/fragile/3", &Method::GET, BindingBag::new()).unwrap();
    assert_eq!(view_of(&ok).data["id"], 3);
}

#[test]
fn test_handler_panic_is_invocation_failure() {
    let context = fixture_context();
    let err = context.dispatch("/explode", &Method::POST, BindingBag::new()).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Invocation { source: InvokeError::Panicked(ref msg), .. } if msg == "kaboom"
    ));
}

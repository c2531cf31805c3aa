//! Shared controllers for the integration tests.

#![allow(dead_code)]

use controller_dispatch::binding::{FieldSpec, ScalarType};
use controller_dispatch::config::DispatchConfig;
use controller_dispatch::discovery::Discovery;
use controller_dispatch::handler::HandlerError;
use controller_dispatch::prelude::*;
use serde::{Deserialize, Serialize};

/// User, product and contact pages under `/demo`.
#[derive(Default)]
pub struct DemoController;

impl DemoController {
    fn get_user(&self, id: String) -> ModelView {
        ModelView::new("user-details")
            .with("userId", id)
            .with("action", "GET - show user")
    }

    fn create_user(&self, name: String, email: String) -> ModelView {
        ModelView::new("user-created")
            .with("userName", name)
            .with("userEmail", email)
    }

    fn handle_product(&self, id: String, action: Option<String>) -> ModelView {
        ModelView::new("product-handler")
            .with("productId", id)
            .with("requestedAction", action.unwrap_or_else(|| "default".to_string()))
    }

    fn catch_all(&self, path: String) -> ModelView {
        ModelView::new("catch-all").with("capturedPath", path)
    }

    fn show_contact_form(&self) -> ModelView {
        ModelView::new("contact-form")
    }

    fn submit_contact_form(&self, name: String, message: String) -> ModelView {
        ModelView::new("contact-success")
            .with("contactName", name)
            .with("contactMessage", message)
    }
}

impl Controller for DemoController {
    const BASE_PATH: &'static str = "/demo";

    fn routes(h: &mut HandlerSet<Self>) {
        h.member("getUser", Self::get_user)
            .get("/users/{id}")
            .param_with("id", RequestParam::new());
        h.member("createUser", Self::create_user)
            .post("/users")
            .param_with("name", RequestParam::new())
            .param_with("email", RequestParam::new().default_value("user@example.com"));
        h.member("handleProduct", Self::handle_product)
            .route(RouteTag::new("/products/{id}").verbs(["GET", "POST", "PUT"]))
            .param_with("id", RequestParam::new())
            .param_with("action", RequestParam::new().optional());
        h.member("catchAll", Self::catch_all)
            .route("/catch-all/{path}")
            .param_with("path", RequestParam::new());
        h.member("showContactForm", Self::show_contact_form).get("/contact");
        h.member("submitContactForm", Self::submit_contact_form)
            .post("/contact")
            .param_with("name", RequestParam::new())
            .param_with("message", RequestParam::new());
    }
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Dept {
    pub nom: String,
}

impl FormModel for Dept {
    fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec::scalar("nom", ScalarType::Str)]
    }
}

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Employee {
    pub nom: String,
    pub age: i32,
    pub dept: Dept,
    pub skills: Vec<String>,
}

impl FormModel for Employee {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::scalar("nom", ScalarType::Str),
            FieldSpec::scalar("age", ScalarType::Int),
            FieldSpec::nested::<Dept>("dept"),
            FieldSpec::unsupported("skills", "Vec<String>"),
        ]
    }
}

/// Composite, map and opaque results.
#[derive(Default)]
pub struct HrController;

impl HrController {
    fn save(&self, emp: Form<Employee>) -> Json<Employee> {
        Json(emp.into_inner())
    }

    fn echo(&self, all: BindingMap) -> BindingMap {
        all
    }

    fn headcount(&self, team: String) -> Opaque<usize> {
        Opaque(team.len())
    }
}

impl Controller for HrController {
    const BASE_PATH: &'static str = "/hr";

    fn routes(h: &mut HandlerSet<Self>) {
        h.member("save", Self::save).post("/employees").param("emp");
        h.member("echo", Self::echo).route("/echo").param("all");
        h.member("headcount", Self::headcount)
            .get(VerbTag::new("/teams/{team}/headcount").view("headcount"))
            .param_with("team", RequestParam::new());
    }
}

/// Exact templates next to a pattern template with the same shape.
#[derive(Default)]
pub struct CatalogController;

impl CatalogController {
    fn item(&self, id: i64) -> ModelView {
        ModelView::new("item").with("id", id)
    }

    fn new_item(&self) -> &'static str {
        "item-form"
    }
}

impl Controller for CatalogController {
    fn routes(h: &mut HandlerSet<Self>) {
        h.member("item", Self::item)
            .get("/items/{id}")
            .param_with("id", RequestParam::new());
        h.member("newItem", Self::new_item).get("/items/new");
    }
}

/// Handlers that fail.
#[derive(Default)]
pub struct FlakyController;

impl FlakyController {
    fn fragile(&self, id: i64) -> Result<ModelView, HandlerError> {
        if id == 0 {
            return Err("no record for id 0".into());
        }
        Ok(ModelView::new("fragile-view").with("id", id))
    }

    fn explode(&self) -> String {
        panic!("kaboom")
    }
}

impl Controller for FlakyController {
    fn routes(h: &mut HandlerSet<Self>) {
        h.member("fragile", Self::fragile)
            .get(VerbTag::new("/fragile/{id}").view("fragile-declared"))
            .param_with("id", RequestParam::new());
        h.member("explode", Self::explode).post("/explode");
    }
}

#[derive(Default)]
pub struct ConflictA;

impl ConflictA {
    fn page(&self) -> &'static str {
        "from-a"
    }
}

impl Controller for ConflictA {
    fn routes(h: &mut HandlerSet<Self>) {
        h.member("page", Self::page).get("/dup");
    }
}

#[derive(Default)]
pub struct ConflictB;

impl ConflictB {
    fn page(&self) -> &'static str {
        "from-b"
    }
}

impl Controller for ConflictB {
    fn routes(h: &mut HandlerSet<Self>) {
        h.member("page", Self::page).get("/dup");
    }
}

/// Controller found only through the link-time registry.
#[derive(Default)]
pub struct RegisteredController;

impl RegisteredController {
    fn ping(&self) -> Json<&'static str> {
        Json("pong")
    }
}

impl Controller for RegisteredController {
    fn routes(h: &mut HandlerSet<Self>) {
        h.member("ping", Self::ping).get("/registered/ping");
    }
}

register_controller!(RegisteredController);

/// Discovery over the fixtures above, excluding the registry.
pub fn fixture_discovery() -> Discovery {
    Discovery::explicit_only()
        .register::<DemoController>()
        .register::<HrController>()
        .register::<CatalogController>()
        .register::<FlakyController>()
}

pub fn fixture_context() -> DispatchContext {
    DispatchContext::build_with(&fixture_discovery(), &quiet_config())
}

/// Default configuration with metrics off.
pub fn quiet_config() -> DispatchConfig {
    let mut config = DispatchConfig::default();
    config.observability.metrics_enabled = false;
    config
}

pub fn view_of(outcome: &Outcome) -> &ModelView {
    match outcome {
        Outcome::View(mv) => mv,
        other => panic!("expected a view outcome, got {other:?}"),
    }
}

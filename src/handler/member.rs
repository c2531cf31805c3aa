//! Handler members and their routing tags.
//!
//! A controller declares its members on a [`HandlerSet`]: each member is a
//! named handler function plus the tags that route requests to it and the
//! names and tags of its parameters. Declaration happens once, when the
//! controller is loaded; the result is an immutable [`Member`].
//!
//! # Example
//! ```ignore
//! impl Controller for UserController {
//!     const BASE_PATH: &'static str = "/users";
//!
//!     fn routes(h: &mut HandlerSet<Self>) {
//!         h.member("details", Self::details)
//!             .get(VerbTag::new("/{id}").view("user-details"))
//!             .param_with("id", RequestParam::new());
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::binding::{Arguments, ParameterSpec, RequestParam};
use crate::handler::outcome::{InvokeError, Outcome};
use crate::handler::typed::{Handler, ParamShape};

type Invoker = dyn Fn(Arguments) -> Result<Outcome, InvokeError> + Send + Sync;

/// Generic route tag: a template, an optional view and the verbs it serves.
///
/// An empty verb list serves every catch-all verb.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTag {
    pub template: String,
    pub view: String,
    pub verbs: Vec<String>,
}

impl RouteTag {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    pub fn verbs<I, S>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.verbs = verbs.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&str> for RouteTag {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

/// Verb-specific route tag (GET or POST).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerbTag {
    pub template: String,
    pub view: String,
}

impl VerbTag {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            view: String::new(),
        }
    }

    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }
}

impl From<&str> for VerbTag {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

/// A loaded handler member of a controller.
#[derive(Clone)]
pub struct Member {
    name: String,
    route: Option<RouteTag>,
    get: Option<VerbTag>,
    post: Option<VerbTag>,
    params: Arc<[ParameterSpec]>,
    invoker: Arc<Invoker>,
}

impl Member {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route_tag(&self) -> Option<&RouteTag> {
        self.route.as_ref()
    }

    pub fn get_tag(&self) -> Option<&VerbTag> {
        self.get.as_ref()
    }

    pub fn post_tag(&self) -> Option<&VerbTag> {
        self.post.as_ref()
    }

    /// True if any routing tag is present.
    pub fn is_routed(&self) -> bool {
        self.route.is_some() || self.get.is_some() || self.post.is_some()
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Run the handler on a fresh controller instance.
    ///
    /// A panic inside the handler is caught and reported as an error.
    pub fn invoke(&self, args: Arguments) -> Result<Outcome, InvokeError> {
        match catch_unwind(AssertUnwindSafe(|| (self.invoker)(args))) {
            Ok(result) => result,
            Err(payload) => Err(InvokeError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("route", &self.route)
            .field("get", &self.get)
            .field("post", &self.post)
            .field("params", &self.params.len())
            .finish()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Declaration of one member, filled in through chained calls.
pub struct MemberDecl {
    name: String,
    route: Option<RouteTag>,
    get: Option<VerbTag>,
    post: Option<VerbTag>,
    shapes: Vec<ParamShape>,
    names: Vec<(String, Option<RequestParam>)>,
    invoker: Arc<Invoker>,
}

impl MemberDecl {
    pub fn route(&mut self, tag: impl Into<RouteTag>) -> &mut Self {
        self.route = Some(tag.into());
        self
    }

    pub fn get(&mut self, tag: impl Into<VerbTag>) -> &mut Self {
        self.get = Some(tag.into());
        self
    }

    pub fn post(&mut self, tag: impl Into<VerbTag>) -> &mut Self {
        self.post = Some(tag.into());
        self
    }

    /// Name the next parameter, without a bound-parameter tag.
    pub fn param(&mut self, name: impl Into<String>) -> &mut Self {
        self.names.push((name.into(), None));
        self
    }

    /// Name the next parameter and attach a bound-parameter tag.
    pub fn param_with(&mut self, name: impl Into<String>, tag: RequestParam) -> &mut Self {
        self.names.push((name.into(), Some(tag)));
        self
    }

    fn finish(self) -> Member {
        if self.names.len() > self.shapes.len() {
            tracing::warn!(
                member = %self.name,
                declared = self.names.len(),
                actual = self.shapes.len(),
                "More parameter names than handler parameters; extra names ignored"
            );
        }

        let mut names = self.names.into_iter();
        let params = self
            .shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| {
                let (declared, tag) = names.next().unwrap_or_else(|| {
                    tracing::warn!(member = %self.name, index = i, "Unnamed handler parameter");
                    (format!("arg{i}"), None)
                });
                ParameterSpec::new(declared, shape.kind, tag.as_ref()).with_optional_type(shape.optional)
            })
            .collect();

        Member {
            name: self.name,
            route: self.route,
            get: self.get,
            post: self.post,
            params,
            invoker: self.invoker,
        }
    }
}

/// Collects the members a controller declares.
pub struct HandlerSet<C> {
    members: Vec<MemberDecl>,
    _controller: PhantomData<fn() -> C>,
}

impl<C: Default + 'static> HandlerSet<C> {
    pub(crate) fn new() -> Self {
        Self {
            members: Vec::new(),
            _controller: PhantomData,
        }
    }

    /// Declare a handler member. Each call builds a fresh `C`.
    pub fn member<H, A>(&mut self, name: impl Into<String>, handler: H) -> &mut MemberDecl
    where
        H: Handler<C, A>,
    {
        let invoker: Arc<Invoker> = Arc::new(move |args: Arguments| handler.call(&C::default(), args));
        let index = self.members.len();
        self.members.push(MemberDecl {
            name: name.into(),
            route: None,
            get: None,
            post: None,
            shapes: H::shapes(),
            names: Vec::new(),
            invoker,
        });
        &mut self.members[index]
    }

    pub(crate) fn into_members(self) -> Vec<Member> {
        self.members.into_iter().map(MemberDecl::finish).collect()
    }
}

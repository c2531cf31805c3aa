//! Controllers and their loaded form.

use std::any::type_name;
use std::cmp::Ordering;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;

use crate::handler::member::panic_message;
use crate::handler::{HandlerSet, Member};

/// A type whose members serve requests.
///
/// `routes` declares the handler members; it runs once, when the controller
/// is loaded. Every invocation works on a fresh `Self::default()`.
pub trait Controller: Default + 'static {
    /// Prefix applied to every route template of this controller.
    const BASE_PATH: &'static str = "";

    fn routes(handlers: &mut HandlerSet<Self>);
}

/// A controller that could not be loaded. Discovery logs and skips it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("controller {name} panicked while declaring members: {message}")]
    Panicked { name: String, message: String },

    #[error("controller {name} has invalid base path '{base_path}'")]
    InvalidBasePath { name: String, base_path: String },
}

/// A loaded controller: its identity plus its declared members.
///
/// Immutable once loaded. Equality and ordering use the qualified name only.
#[derive(Clone)]
pub struct ControllerType {
    name: String,
    base_path: String,
    origin: String,
    members: Arc<[Member]>,
}

impl ControllerType {
    /// Load controller `C`, trapping a panic in its declarations.
    pub fn load<C: Controller>() -> Result<Self, LoadError> {
        let name = type_name::<C>().to_string();

        if !is_valid_base_path(C::BASE_PATH) {
            return Err(LoadError::InvalidBasePath {
                name,
                base_path: C::BASE_PATH.to_string(),
            });
        }

        let members = catch_unwind(AssertUnwindSafe(|| {
            let mut set = HandlerSet::<C>::new();
            C::routes(&mut set);
            set.into_members()
        }))
        .map_err(|payload| LoadError::Panicked {
            name: name.clone(),
            message: panic_message(payload.as_ref()),
        })?;

        Ok(Self {
            origin: origin_of(&name).to_string(),
            base_path: C::BASE_PATH.to_string(),
            members: members.into(),
            name,
        })
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short type name, without the module path.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit_once("::").map_or(self.name.as_str(), |(_, n)| n)
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Module path the controller lives in.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }
}

fn origin_of(name: &str) -> &str {
    name.rsplit_once("::").map_or("", |(module, _)| module)
}

fn is_valid_base_path(base_path: &str) -> bool {
    !base_path.contains(['?', '#']) && !base_path.chars().any(char::is_whitespace)
}

impl PartialEq for ControllerType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ControllerType {}

impl PartialOrd for ControllerType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ControllerType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Debug for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerType")
            .field("name", &self.name)
            .field("base_path", &self.base_path)
            .field("members", &self.members.len())
            .finish()
    }
}

impl fmt::Display for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

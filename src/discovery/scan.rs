//! Controller discovery.
//!
//! # Algorithm
//! ```text
//! candidates = explicit registrations ++ link-time registry
//!     → dedupe by qualified name (first seen wins)
//!     → keep names inside the scope hint, if any
//!     → drop synthetic names ('$', "{{", '<')
//!     → load each; log and skip failures
//!     → sort by qualified name
//! ```

use std::collections::BTreeMap;

use crate::discovery::controller::{Controller, ControllerType};
use crate::discovery::registry::{self, ControllerRegistration};

const SYNTHETIC_MARKERS: [&str; 3] = ["$", "{{", "<"];

/// Finds and loads controllers.
#[derive(Debug, Clone)]
pub struct Discovery {
    explicit: Vec<ControllerRegistration>,
    walk_registry: bool,
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}

impl Discovery {
    /// Discovery over the link-time registry.
    pub fn new() -> Self {
        Self {
            explicit: Vec::new(),
            walk_registry: true,
        }
    }

    /// Discovery over explicit registrations only.
    pub fn explicit_only() -> Self {
        Self {
            explicit: Vec::new(),
            walk_registry: false,
        }
    }

    /// Add a controller directly, without going through the registry.
    pub fn register<C: Controller>(mut self) -> Self {
        self.explicit.push(ControllerRegistration::of::<C>());
        self
    }

    /// Load every controller inside `scope`, sorted by qualified name.
    ///
    /// The scope is a module path prefix, with `::` or `.` separators.
    /// Controllers that fail to load are logged and skipped.
    pub fn discover(&self, scope: Option<&str>) -> Vec<ControllerType> {
        let scope = scope.map(normalize_scope).filter(|s| !s.is_empty());

        let mut candidates: BTreeMap<&'static str, ControllerRegistration> = BTreeMap::new();
        let walked = self
            .walk_registry
            .then(registry::registered)
            .into_iter()
            .flatten()
            .copied();
        for registration in self.explicit.iter().copied().chain(walked) {
            candidates.entry(registration.name()).or_insert(registration);
        }

        let mut controllers = Vec::with_capacity(candidates.len());
        for (name, registration) in candidates {
            if let Some(scope) = &scope {
                if !in_scope(name, scope) {
                    continue;
                }
            }
            if is_synthetic(name) {
                tracing::debug!(controller = %name, "Skipping synthetic type");
                continue;
            }
            match registration.load() {
                Ok(controller) => {
                    tracing::debug!(
                        controller = %name,
                        members = controller.members().len(),
                        "Loaded controller"
                    );
                    controllers.push(controller);
                }
                Err(e) => {
                    tracing::warn!(controller = %name, error = %e, "Skipping controller that failed to load");
                }
            }
        }

        controllers.sort();
        tracing::info!(
            scope = scope.as_deref().unwrap_or("<all>"),
            count = controllers.len(),
            "Controller discovery complete"
        );
        controllers
    }
}

fn normalize_scope(scope: &str) -> String {
    scope.trim().replace('.', "::").trim_end_matches(':').to_string()
}

fn in_scope(name: &str, scope: &str) -> bool {
    name == scope
        || name
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with("::"))
}

fn is_synthetic(name: &str) -> bool {
    SYNTHETIC_MARKERS.iter().any(|m| name.contains(m))
}

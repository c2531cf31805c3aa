//! Dispatch errors.

use http::Method;
use thiserror::Error;

use crate::binding::BindError;
use crate::handler::InvokeError;

/// Why a request could not be served.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No template matches the path, or the matching route lacks the verb.
    #[error("no route for {verb} {path}")]
    NoMatchingRoute { path: String, verb: Method },

    #[error(transparent)]
    Binding(#[from] BindError),

    #[error("handler {handler} failed: {source}")]
    Invocation {
        handler: String,
        #[source]
        source: InvokeError,
    },
}

impl DispatchError {
    /// True for the not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchError::NoMatchingRoute { .. })
    }
}

/// Two routes mapped the same verb on the same template.
///
/// The later route replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{verb} {template} mapped by {previous} and {replacement}; keeping {replacement}")]
pub struct RouteConflict {
    pub template: String,
    pub verb: Method,
    pub previous: String,
    pub replacement: String,
}

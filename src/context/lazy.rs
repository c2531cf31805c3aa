//! One-time context initialization.

use std::fmt;
use std::sync::OnceLock;

use crate::config::DispatchConfig;
use crate::context::dispatch::DispatchContext;
use crate::discovery::Discovery;

type Init = Box<dyn Fn() -> DispatchContext + Send + Sync>;

/// Builds a [`DispatchContext`] on first use and hands out the same one
/// afterwards.
///
/// Concurrent first callers block until the single build finishes. The
/// holder is owned by the caller; put it in a `static` or share it through
/// an `Arc` as the embedding server sees fit.
pub struct LazyContext {
    cell: OnceLock<DispatchContext>,
    init: Init,
}

impl LazyContext {
    /// Build from the link-time registry with `config`.
    pub fn new(config: DispatchConfig) -> Self {
        Self::with_init(move || DispatchContext::build(&config))
    }

    /// Build from `discovery` with `config`.
    pub fn with_discovery(discovery: Discovery, config: DispatchConfig) -> Self {
        Self::with_init(move || DispatchContext::build_with(&discovery, &config))
    }

    pub fn with_init(init: impl Fn() -> DispatchContext + Send + Sync + 'static) -> Self {
        Self {
            cell: OnceLock::new(),
            init: Box::new(init),
        }
    }

    /// The context, building it if this is the first access.
    pub fn instance(&self) -> &DispatchContext {
        self.cell.get_or_init(|| (self.init)())
    }

    /// The context if it has been built.
    pub fn get(&self) -> Option<&DispatchContext> {
        self.cell.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl fmt::Debug for LazyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyContext")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

//! Link-time controller registry.
//!
//! `register_controller!(Type)` submits a [`ControllerRegistration`] through
//! `inventory`; [`Discovery`](crate::discovery::Discovery) walks every
//! submission linked into the binary.

use std::any::type_name;

use crate::discovery::controller::{Controller, ControllerType, LoadError};

/// A registered controller, not yet loaded.
#[derive(Clone, Copy)]
pub struct ControllerRegistration {
    name: fn() -> &'static str,
    load: fn() -> Result<ControllerType, LoadError>,
}

impl ControllerRegistration {
    pub const fn of<C: Controller>() -> Self {
        Self {
            name: type_name::<C>,
            load: ControllerType::load::<C>,
        }
    }

    /// Qualified name of the registered type.
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    pub fn load(&self) -> Result<ControllerType, LoadError> {
        (self.load)()
    }
}

impl std::fmt::Debug for ControllerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ControllerRegistration").field(&self.name()).finish()
    }
}

inventory::collect!(ControllerRegistration);

/// Every registration linked into the binary, in link order.
pub fn registered() -> impl Iterator<Item = &'static ControllerRegistration> {
    inventory::iter::<ControllerRegistration>.into_iter()
}

/// Register a controller type for discovery.
///
/// ```ignore
/// register_controller!(UserController);
/// ```
#[macro_export]
macro_rules! register_controller {
    ($ty:ty) => {
        $crate::inventory::submit! {
            $crate::discovery::ControllerRegistration::of::<$ty>()
        }
    };
}

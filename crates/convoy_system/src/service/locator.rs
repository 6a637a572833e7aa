//! Service and locator contracts.

use std::sync::Arc;

use downcast_rs::{DowncastSync, impl_downcast};

use crate::instance::InstanceAware;

/// A named dependency that can be resolved from a [`ServiceLocator`].
///
/// Services are stored and handed out type-erased; consumers recover
/// concrete types by downcasting, or probe for behavioral capabilities via
/// the `as_*` queries without knowing the concrete type at all.
///
/// # Capability Queries
///
/// Both queries default to `None`. An implementor that can act as a locator
/// or track a current instance opts in by returning `Some(self)`:
///
/// ```
/// use std::sync::Arc;
/// use convoy_system::instance::{InstanceAware, InstanceSlot};
/// use convoy_system::service::Service;
///
/// struct TaggingService {
///     slot: InstanceSlot,
/// }
///
/// impl InstanceAware for TaggingService {
///     fn set_instance(&self, instance: Option<Arc<dyn convoy_system::instance::Instance>>) {
///         self.slot.set_instance(instance);
///     }
///
///     fn instance(&self) -> Option<Arc<dyn convoy_system::instance::Instance>> {
///         self.slot.instance()
///     }
/// }
///
/// impl Service for TaggingService {
///     fn as_instance_aware(self: Arc<Self>) -> Option<Arc<dyn InstanceAware>> {
///         Some(self)
///     }
/// }
/// ```
pub trait Service: DowncastSync {
    /// Returns the type name for debugging purposes.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Queries the service-locator capability.
    ///
    /// Returns `Some` if this service can itself resolve named
    /// dependencies.
    fn as_locator(self: Arc<Self>) -> Option<Arc<dyn ServiceLocator>> {
        None
    }

    /// Queries the instance-aware capability.
    ///
    /// Returns `Some` if this service tracks the instance it is currently
    /// operating on.
    fn as_instance_aware(self: Arc<Self>) -> Option<Arc<dyn InstanceAware>> {
        None
    }
}

impl_downcast!(sync Service);

/// A facility that resolves named dependencies.
///
/// Implementations are externally owned and may be shared across threads;
/// resolution takes `&self` and must be internally synchronized. A locator
/// may be stateful: two resolves of the same name are allowed to return
/// different objects.
pub trait ServiceLocator: Service {
    /// Resolves the service registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if nothing is registered under
    /// `name`.
    fn resolve(&self, name: &str) -> Result<Arc<dyn Service>, ResolveError>;
}

/// Errors that can occur during service resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Nothing is registered under the requested name.
    #[error("service not found: {0}")]
    NotFound(String),

    /// A service is registered under the name, but it is not of the
    /// requested type.
    #[error("service '{name}' is not a {expected}")]
    WrongType {
        /// The requested service name.
        name: String,
        /// The type that was requested.
        expected: &'static str,
    },
}

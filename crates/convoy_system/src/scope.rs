//! Per-instance contextual scope.

use std::sync::Arc;

use crate::instance::{Instance, InstanceAware, InstanceSlot};
use crate::service::{ResolveError, Service, ServiceLocator, ServiceRegistry};

/// A contextual resolver scoped to the instance currently being processed.
///
/// `InstanceScope` bundles a [`ServiceRegistry`] with an [`InstanceSlot`]
/// and exposes both capabilities. It is the canonical object to register
/// under a dispatcher's context key: per-instance lookups resolve against
/// its registry, and the dispatcher keeps its slot pointed at the instance
/// the current phase sequence is about.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use convoy_system::scope::InstanceScope;
/// use convoy_system::service::{Service, ServiceRegistry};
///
/// struct Audit;
/// impl Service for Audit {}
///
/// let scope = Arc::new(InstanceScope::new());
/// scope.services().insert("audit", Arc::new(Audit));
///
/// let registry = ServiceRegistry::new();
/// registry.insert("scope", scope);
/// ```
#[derive(Debug, Default)]
pub struct InstanceScope {
    services: ServiceRegistry,
    slot: InstanceSlot,
}

impl InstanceScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scope's service registry.
    #[must_use]
    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }
}

impl Service for InstanceScope {
    fn as_locator(self: Arc<Self>) -> Option<Arc<dyn ServiceLocator>> {
        Some(self)
    }

    fn as_instance_aware(self: Arc<Self>) -> Option<Arc<dyn InstanceAware>> {
        Some(self)
    }
}

impl ServiceLocator for InstanceScope {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Service>, ResolveError> {
        self.services.resolve(name)
    }
}

impl InstanceAware for InstanceScope {
    fn set_instance(&self, instance: Option<Arc<dyn Instance>>) {
        self.slot.set_instance(instance);
    }

    fn instance(&self) -> Option<Arc<dyn Instance>> {
        self.slot.instance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Audit;
    impl Service for Audit {}

    #[test]
    fn scope_exposes_both_capabilities() {
        let scope: Arc<dyn Service> = Arc::new(InstanceScope::new());

        assert!(Arc::clone(&scope).as_locator().is_some());
        assert!(scope.as_instance_aware().is_some());
    }

    #[test]
    fn resolve_delegates_to_registry() {
        let scope = InstanceScope::new();
        scope.services().insert("audit", Arc::new(Audit));

        assert!(scope.resolve("audit").is_ok());
        assert_eq!(
            scope.resolve("missing").err().unwrap(),
            ResolveError::NotFound("missing".into())
        );
    }

    #[test]
    fn slot_delegates_to_instance_aware() {
        let scope = InstanceScope::new();
        let instance: Arc<dyn Instance> = Arc::new(5_i64);

        scope.set_instance(Some(Arc::clone(&instance)));
        let held = scope.instance().expect("slot should be occupied");
        assert!(Arc::ptr_eq(&held, &instance));

        scope.set_instance(None);
        assert!(scope.instance().is_none());
    }

    #[test]
    fn capability_views_share_state() {
        let scope = Arc::new(InstanceScope::new());
        let aware = Arc::clone(&scope)
            .as_instance_aware()
            .expect("scope is instance-aware");

        aware.set_instance(Some(Arc::new("item")));
        assert!(scope.instance().is_some());
    }
}

//! The shared event envelope passed to every listener.
//!
//! One [`IterationEvent`] is built per dispatch run and reused for every
//! instance in the sequence. The dispatcher mutates the per-instance slots
//! between triggers; listeners only ever see a shared borrow, so they cannot
//! hold onto the envelope past their own invocation.

use core::fmt;
use std::sync::Arc;

use convoy_system::instance::Instance;
use convoy_system::service::ServiceLocator;

use crate::controller::Controller;
use crate::dispatcher::DispatcherId;

/// The mutable event envelope for one dispatch run.
///
/// Carries run-scoped context (the dispatcher's ID, the owning controller,
/// the root service locator) alongside two per-instance slots that the
/// dispatcher rewrites before each cycle: the current instance and the
/// contextual locator resolved for it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use convoy_dispatch::dispatcher::DispatcherId;
/// use convoy_dispatch::events::IterationEvent;
/// use convoy_system::service::{ServiceLocator, ServiceRegistry};
///
/// let locator: Arc<dyn ServiceLocator> = Arc::new(ServiceRegistry::new());
/// let mut event = IterationEvent::new(DispatcherId::new(), None, locator);
///
/// assert!(event.instance().is_none());
/// event.set_instance(Some(Arc::new("order-17".to_string())));
/// assert!(event.instance().is_some());
/// ```
pub struct IterationEvent {
    target: DispatcherId,
    controller: Option<Arc<dyn Controller>>,
    service_locator: Arc<dyn ServiceLocator>,
    instance: Option<Arc<dyn Instance>>,
    contextual_locator: Option<Arc<dyn ServiceLocator>>,
}

impl IterationEvent {
    /// Creates a new envelope for a run owned by `target`.
    ///
    /// Both per-instance slots start empty.
    #[must_use]
    pub fn new(
        target: DispatcherId,
        controller: Option<Arc<dyn Controller>>,
        service_locator: Arc<dyn ServiceLocator>,
    ) -> Self {
        Self {
            target,
            controller,
            service_locator,
            instance: None,
            contextual_locator: None,
        }
    }

    /// Returns the ID of the dispatcher driving this run.
    #[must_use]
    pub fn target(&self) -> &DispatcherId {
        &self.target
    }

    /// Returns the controller that owns this run, if one was configured.
    #[must_use]
    pub fn controller(&self) -> Option<&Arc<dyn Controller>> {
        self.controller.as_ref()
    }

    /// Returns the root service locator for this run.
    #[must_use]
    pub fn service_locator(&self) -> &Arc<dyn ServiceLocator> {
        &self.service_locator
    }

    /// Returns the instance currently being processed.
    ///
    /// `None` outside an instance cycle: before the first instance, after
    /// the last one, and after a cycle that ended in an error.
    #[must_use]
    pub fn instance(&self) -> Option<&Arc<dyn Instance>> {
        self.instance.as_ref()
    }

    /// Returns the locator resolved for the current instance's context key.
    ///
    /// `None` when the run has no context key, or outside an instance cycle.
    #[must_use]
    pub fn contextual_locator(&self) -> Option<&Arc<dyn ServiceLocator>> {
        self.contextual_locator.as_ref()
    }

    /// Replaces the current instance slot.
    pub fn set_instance(&mut self, instance: Option<Arc<dyn Instance>>) {
        self.instance = instance;
    }

    /// Replaces the contextual locator slot.
    pub fn set_contextual_locator(&mut self, locator: Option<Arc<dyn ServiceLocator>>) {
        self.contextual_locator = locator;
    }
}

impl fmt::Debug for IterationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterationEvent")
            .field("target", &self.target)
            .field("controller", &self.controller.as_ref().map(|c| c.name()))
            .field("has_instance", &self.instance.is_some())
            .field("has_contextual_locator", &self.contextual_locator.is_some())
            .finish()
    }
}

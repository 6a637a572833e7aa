//! The instance dispatcher.
//!
//! [`InstanceDispatcher`] walks a sequence of instances and triggers the
//! three-phase cycle (`iterate.pre`, `iterate`, `iterate.post`) for each one
//! through an [`EventDispatch`] implementation. Listeners observe the run
//! through a single shared [`IterationEvent`] envelope.
//!
//! # Collaborators
//!
//! The dispatcher is assembled from its collaborators rather than reaching
//! into any global state:
//!
//! - An [`EventDispatch`] that owns listener registration and triggering
//! - A [`ServiceLocator`] that resolves contextual services by key
//! - Optionally, a [`Controller`] the run is executed on behalf of
//!
//! Both the event dispatch and the locator are required before a run can
//! start; the accessors surface their absence as errors rather than
//! panicking.

use core::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use convoy_system::instance::{Instance, InstanceAware};
use convoy_system::phase::PhaseId;
use convoy_system::service::{ResolveError, ServiceLocator};

use crate::controller::Controller;
use crate::events::phases::{Iterate, SEQUENCE};
use crate::events::{BoxedError, EventDispatch, IterationEvent, Listener};

// ─────────────────────────────────────────────────────────────────────────────
// DispatcherId
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a dispatcher.
///
/// Dispatcher IDs are generated using nanoid, providing globally unique
/// identifiers that don't require coordination between dispatchers. The ID is
/// stamped onto every envelope a dispatcher emits, so listeners shared by
/// several dispatchers can tell their runs apart.
///
/// Internally uses `Arc<str>` for cheap cloning (reference count bump only).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatcherId(Arc<str>);

impl DispatcherId {
    /// Creates a new dispatcher ID with a unique nanoid.
    #[must_use]
    pub fn new() -> Self {
        Self(nanoid::nanoid!().into())
    }

    /// Creates a dispatcher ID from a specific string value.
    ///
    /// This is primarily useful for testing or for wiring a dispatcher to an
    /// externally assigned identity.
    #[must_use]
    pub fn from_string(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DispatcherId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DispatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispatcher_{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IterateError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while preparing or driving a dispatch run.
#[derive(Debug)]
pub enum IterateError {
    /// No event dispatch was provided to the dispatcher.
    MissingEventDispatch,
    /// No service locator was provided to the dispatcher.
    MissingServiceLocator,
    /// A context key was supplied but is empty.
    EmptyContextKey,
    /// The contextual service exists but cannot act as a service locator.
    ContextNotResolver {
        /// The context key the service was resolved under.
        name: String,
    },
    /// The contextual service could not be resolved.
    Resolve {
        /// The context key that failed to resolve.
        name: String,
        /// The locator's underlying error.
        source: ResolveError,
    },
    /// A listener failed while a phase was being triggered.
    Listener {
        /// The phase that was being triggered.
        phase: PhaseId,
        /// The listener's error.
        source: BoxedError,
    },
    /// The instance source yielded an error instead of an instance.
    Item {
        /// The source's error.
        source: BoxedError,
    },
}

impl fmt::Display for IterateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IterateError::MissingEventDispatch => write!(f, "event dispatch not provided"),
            IterateError::MissingServiceLocator => write!(f, "service locator not provided"),
            IterateError::EmptyContextKey => write!(f, "context key must not be empty"),
            IterateError::ContextNotResolver { name } => {
                write!(f, "contextual service '{name}' is not a service locator")
            }
            IterateError::Resolve { name, .. } => {
                write!(f, "failed to resolve contextual service '{name}'")
            }
            IterateError::Listener { phase, .. } => {
                write!(f, "listener failed during phase '{phase}'")
            }
            IterateError::Item { .. } => write!(f, "instance source yielded an error"),
        }
    }
}

impl core::error::Error for IterateError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            IterateError::Resolve { source, .. } => Some(source),
            IterateError::Listener { source, .. } | IterateError::Item { source } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IterationResult
// ─────────────────────────────────────────────────────────────────────────────

/// Summary of a completed dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationResult {
    /// Number of instances that completed all three phases.
    pub instances_visited: usize,
    /// Wall-clock time the run took.
    pub duration: Duration,
}

// ─────────────────────────────────────────────────────────────────────────────
// InstanceDispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Drives the three-phase event cycle over a sequence of instances.
///
/// For every instance the dispatcher triggers `iterate.pre`, `iterate`, and
/// `iterate.post` in order on the configured [`EventDispatch`], with the
/// shared envelope updated between cycles. An optional context key names a
/// service that is resolved fresh for each instance and exposed to listeners
/// as the envelope's contextual locator; if that service is additionally
/// instance-aware, the current instance is attached to it for the duration of
/// its cycle and always detached afterwards, even when a listener fails.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use convoy_dispatch::dispatcher::InstanceDispatcher;
/// use convoy_dispatch::events::{EventManager, IterationEvent};
/// use convoy_dispatch::events::phases::Iterate;
/// use convoy_system::instance::Instance;
/// use convoy_system::service::ServiceRegistry;
///
/// let manager = Arc::new(EventManager::new());
/// manager.attach_to::<Iterate>(|event: &IterationEvent| {
///     assert!(event.instance().is_some());
///     Ok(())
/// });
///
/// let dispatcher = InstanceDispatcher::new()
///     .with_event_dispatch(manager)
///     .with_service_locator(Arc::new(ServiceRegistry::new()));
///
/// let instances: Vec<Arc<dyn Instance>> = vec![Arc::new(1_u8), Arc::new(2_u8)];
/// let result = dispatcher.iterate(instances, None, None)?;
/// assert_eq!(result.instances_visited, 2);
/// # Ok::<(), convoy_dispatch::dispatcher::IterateError>(())
/// ```
pub struct InstanceDispatcher {
    id: DispatcherId,
    event_dispatch: Option<Arc<dyn EventDispatch>>,
    service_locator: Option<Arc<dyn ServiceLocator>>,
    controller: Option<Arc<dyn Controller>>,
}

impl InstanceDispatcher {
    /// Creates a dispatcher with no collaborators configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: DispatcherId::new(),
            event_dispatch: None,
            service_locator: None,
            controller: None,
        }
    }

    /// Sets the event dispatch runs are driven through.
    #[must_use]
    pub fn with_event_dispatch(mut self, events: Arc<dyn EventDispatch>) -> Self {
        self.event_dispatch = Some(events);
        self
    }

    /// Sets the service locator contextual services are resolved from.
    #[must_use]
    pub fn with_service_locator(mut self, locator: Arc<dyn ServiceLocator>) -> Self {
        self.service_locator = Some(locator);
        self
    }

    /// Sets the controller runs are executed on behalf of.
    #[must_use]
    pub fn with_controller(mut self, controller: Arc<dyn Controller>) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Replaces the event dispatch.
    pub fn set_event_dispatch(&mut self, events: Arc<dyn EventDispatch>) {
        self.event_dispatch = Some(events);
    }

    /// Replaces the service locator.
    pub fn set_service_locator(&mut self, locator: Arc<dyn ServiceLocator>) {
        self.service_locator = Some(locator);
    }

    /// Replaces the controller.
    pub fn set_controller(&mut self, controller: Arc<dyn Controller>) {
        self.controller = Some(controller);
    }

    /// Returns this dispatcher's ID.
    #[must_use]
    pub fn id(&self) -> &DispatcherId {
        &self.id
    }

    /// Returns the configured event dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`IterateError::MissingEventDispatch`] if none was provided.
    pub fn event_dispatch(&self) -> Result<&Arc<dyn EventDispatch>, IterateError> {
        self.event_dispatch
            .as_ref()
            .ok_or(IterateError::MissingEventDispatch)
    }

    /// Returns the configured service locator.
    ///
    /// # Errors
    ///
    /// Returns [`IterateError::MissingServiceLocator`] if none was provided.
    pub fn service_locator(&self) -> Result<&Arc<dyn ServiceLocator>, IterateError> {
        self.service_locator
            .as_ref()
            .ok_or(IterateError::MissingServiceLocator)
    }

    /// Returns the configured controller, if any.
    ///
    /// A dispatcher without a controller is valid; listeners then see no
    /// controller on the envelope.
    #[must_use]
    pub fn controller(&self) -> Option<&Arc<dyn Controller>> {
        self.controller.as_ref()
    }

    /// Runs the three-phase cycle for every instance in `instances`.
    ///
    /// `context_key`, when present, names the service resolved fresh from the
    /// locator for each instance. `handler`, when present, is attached to the
    /// `iterate` phase before the first cycle and detached when the run ends,
    /// whether it succeeded or not.
    ///
    /// # Errors
    ///
    /// - [`IterateError::EmptyContextKey`] if `context_key` is `Some("")`.
    ///   This is checked before anything else; no listener runs and nothing
    ///   is resolved.
    /// - [`IterateError::MissingEventDispatch`] /
    ///   [`IterateError::MissingServiceLocator`] if a collaborator is absent,
    ///   in that order.
    /// - [`IterateError::Resolve`] / [`IterateError::ContextNotResolver`] if
    ///   the contextual service is unusable for the current instance.
    /// - [`IterateError::Listener`] carrying the failing phase when a
    ///   listener errors; remaining instances are not processed.
    pub fn iterate<I>(
        &self,
        instances: I,
        context_key: Option<&str>,
        handler: Option<Listener>,
    ) -> Result<IterationResult, IterateError>
    where
        I: IntoIterator<Item = Arc<dyn Instance>>,
    {
        self.try_iterate(instances.into_iter().map(Ok), context_key, handler)
    }

    /// Like [`iterate`](Self::iterate), for sources that can themselves fail.
    ///
    /// Each item is either an instance or an error from the source (a lazy
    /// loader, a paginated fetch). A source error ends the run with
    /// [`IterateError::Item`]; the transient handler is still detached.
    ///
    /// # Errors
    ///
    /// Everything [`iterate`](Self::iterate) returns, plus
    /// [`IterateError::Item`] wrapping the source's error.
    pub fn try_iterate<I>(
        &self,
        instances: I,
        context_key: Option<&str>,
        handler: Option<Listener>,
    ) -> Result<IterationResult, IterateError>
    where
        I: IntoIterator<Item = Result<Arc<dyn Instance>, BoxedError>>,
    {
        if context_key.is_some_and(str::is_empty) {
            return Err(IterateError::EmptyContextKey);
        }

        let events = Arc::clone(self.event_dispatch()?);
        let locator = Arc::clone(self.service_locator()?);

        let started = Instant::now();
        tracing::debug!(dispatcher = %self.id, context_key, "starting dispatch run");

        let mut event = IterationEvent::new(
            self.id.clone(),
            self.controller.clone(),
            Arc::clone(&locator),
        );

        let handle = handler.map(|handler| events.attach(PhaseId::of::<Iterate>(), handler));

        let outcome =
            Self::run_cycles(events.as_ref(), &locator, &mut event, instances, context_key);

        // The transient handler never outlives the run, including when the
        // run ends in an error.
        if let Some(handle) = handle {
            events.detach(handle);
        }

        let instances_visited = outcome?;
        let duration = started.elapsed();
        tracing::debug!(dispatcher = %self.id, instances_visited, ?duration, "dispatch run complete");

        Ok(IterationResult {
            instances_visited,
            duration,
        })
    }

    /// Drives one cycle per instance, returning the number completed.
    fn run_cycles<I>(
        events: &dyn EventDispatch,
        locator: &Arc<dyn ServiceLocator>,
        event: &mut IterationEvent,
        instances: I,
        context_key: Option<&str>,
    ) -> Result<usize, IterateError>
    where
        I: IntoIterator<Item = Result<Arc<dyn Instance>, BoxedError>>,
    {
        let mut visited = 0;

        for instance in instances {
            let instance = instance.map_err(|source| IterateError::Item { source })?;

            // Contextual services are resolved per instance, never cached
            // across cycles.
            let (aware, contextual) = match context_key {
                Some(key) => Self::resolve_contextual(locator, key)?,
                None => (None, None),
            };

            event.set_instance(Some(Arc::clone(&instance)));
            event.set_contextual_locator(contextual);
            if let Some(aware) = &aware {
                aware.set_instance(Some(Arc::clone(&instance)));
            }

            let cycle = Self::trigger_cycle(events, event);

            // The contextual service must not keep the instance past its
            // cycle, even when a listener failed.
            if let Some(aware) = &aware {
                aware.set_instance(None);
            }
            event.set_instance(None);
            event.set_contextual_locator(None);

            cycle?;
            visited += 1;
        }

        Ok(visited)
    }

    /// Resolves the contextual service and splits out its capabilities.
    fn resolve_contextual(
        locator: &Arc<dyn ServiceLocator>,
        key: &str,
    ) -> Result<
        (
            Option<Arc<dyn InstanceAware>>,
            Option<Arc<dyn ServiceLocator>>,
        ),
        IterateError,
    > {
        let service = locator
            .resolve(key)
            .map_err(|source| IterateError::Resolve {
                name: key.to_owned(),
                source,
            })?;

        let aware = Arc::clone(&service).as_instance_aware();
        let contextual = service
            .as_locator()
            .ok_or_else(|| IterateError::ContextNotResolver {
                name: key.to_owned(),
            })?;

        Ok((aware, Some(contextual)))
    }

    /// Triggers the three phases for the current envelope state.
    fn trigger_cycle(
        events: &dyn EventDispatch,
        event: &IterationEvent,
    ) -> Result<(), IterateError> {
        for phase in SEQUENCE {
            tracing::trace!(%phase, "triggering phase");
            events
                .trigger(phase, event)
                .map_err(|source| IterateError::Listener { phase, source })?;
        }
        Ok(())
    }
}

impl Default for InstanceDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InstanceDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceDispatcher")
            .field("id", &self.id)
            .field("has_event_dispatch", &self.event_dispatch.is_some())
            .field("has_service_locator", &self.service_locator.is_some())
            .field(
                "controller",
                &self.controller.as_ref().map(|controller| controller.name()),
            )
            .finish()
    }
}

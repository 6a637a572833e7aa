//! Listener registration and triggering for dispatch phases.
//!
//! The [`EventManager`] is the reference [`EventDispatch`] implementation: a
//! registry of listeners keyed by [`PhaseId`], invoked in registration order
//! when a phase is triggered.
//!
//! # Attach / Detach
//!
//! [`attach`](EventDispatch::attach) returns a [`CallbackHandle`] that
//! identifies the registration; pass it to [`detach`](EventDispatch::detach)
//! to remove exactly that listener. Handles are cheap to copy and remain
//! valid until detached.
//!
//! # Example
//!
//! ```ignore
//! let handle = manager.attach_to::<Iterate>(|event: &IterationEvent| {
//!     tracing::info!(target = %event.target(), "processing instance");
//!     Ok(())
//! });
//!
//! manager.trigger(PhaseId::of::<Iterate>(), &event)?;
//! manager.detach(handle);
//! ```

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use convoy_system::phase::{Phase, PhaseId};

use super::envelope::IterationEvent;

// ─────────────────────────────────────────────────────────────────────────────
// Listener types
// ─────────────────────────────────────────────────────────────────────────────

/// Type-erased error returned by a failing listener.
pub type BoxedError = Box<dyn core::error::Error + Send + Sync>;

/// Type-erased listener invoked with the shared event envelope.
///
/// Listeners are stored behind [`Arc`] so triggering can snapshot the
/// registered set without holding the registry lock across invocations.
pub type Listener = Arc<dyn Fn(&IterationEvent) -> Result<(), BoxedError> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// CallbackHandle
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies one listener registration on one phase.
///
/// Returned by [`EventDispatch::attach`]; pass it back to
/// [`EventDispatch::detach`] to remove the registration. Detaching a handle
/// that was already removed (or was issued by a different manager) returns
/// `false` and changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle {
    phase: PhaseId,
    token: u64,
}

impl CallbackHandle {
    /// Returns the phase this handle's listener is attached to.
    #[must_use]
    pub fn phase(&self) -> PhaseId {
        self.phase
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventDispatch
// ─────────────────────────────────────────────────────────────────────────────

/// The event dispatch contract the dispatcher drives runs through.
///
/// Implementations own listener storage and define how a triggered phase
/// reaches its listeners. [`EventManager`] is the in-process reference
/// implementation; the dispatcher only depends on this trait.
pub trait EventDispatch: Send + Sync {
    /// Attaches a listener to a phase, returning a handle for later removal.
    ///
    /// Listeners on the same phase are invoked in attachment order.
    fn attach(&self, phase: PhaseId, listener: Listener) -> CallbackHandle;

    /// Detaches the listener identified by `handle`.
    ///
    /// Returns `true` if a listener was removed, `false` if the handle no
    /// longer (or never) matched a registration.
    fn detach(&self, handle: CallbackHandle) -> bool;

    /// Invokes every listener attached to `phase` with `event`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first listener error and skips the listeners after it.
    fn trigger(&self, phase: PhaseId, event: &IterationEvent) -> Result<(), BoxedError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// ListenerEntry
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the listener registry.
struct ListenerEntry {
    /// Token tying this entry to the handle issued at attach time.
    token: u64,
    /// The listener callback.
    callback: Listener,
}

// ─────────────────────────────────────────────────────────────────────────────
// EventManager
// ─────────────────────────────────────────────────────────────────────────────

/// In-process listener registry and reference [`EventDispatch`] implementation.
///
/// # Thread Safety
///
/// The `EventManager` uses interior mutability via [`RwLock`] so listeners can
/// be attached and detached concurrently with triggering. A trigger snapshots
/// the listeners registered at that moment and releases the lock before
/// invoking any of them, so a listener may attach or detach listeners on this
/// same manager without deadlocking; such changes take effect from the next
/// trigger.
#[derive(Default)]
pub struct EventManager {
    /// Maps phase ID to a list of listener entries.
    listeners: RwLock<HashMap<PhaseId, Vec<ListenerEntry>>>,
    /// Source of tokens for issued handles.
    next_token: AtomicU64,
}

impl EventManager {
    /// Creates a new empty listener registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            next_token: AtomicU64::new(0),
        }
    }

    /// Attaches a listener to the phase named by the marker type `P`.
    ///
    /// Type-safe sugar over [`EventDispatch::attach`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// manager.attach_to::<IteratePre>(|event: &IterationEvent| {
    ///     println!("about to process {:?}", event.instance());
    ///     Ok(())
    /// });
    /// ```
    pub fn attach_to<P: Phase>(
        &self,
        listener: impl Fn(&IterationEvent) -> Result<(), BoxedError> + Send + Sync + 'static,
    ) -> CallbackHandle {
        self.attach(PhaseId::of::<P>(), Arc::new(listener))
    }

    /// Returns the number of listeners attached to the given phase.
    #[must_use]
    pub fn listener_count(&self, phase: PhaseId) -> usize {
        let listeners = self.listeners.read();
        listeners.get(&phase).map_or(0, Vec::len)
    }

    /// Checks whether `handle` still identifies an attached listener.
    #[must_use]
    pub fn contains(&self, handle: CallbackHandle) -> bool {
        let listeners = self.listeners.read();
        listeners
            .get(&handle.phase)
            .is_some_and(|entries| entries.iter().any(|entry| entry.token == handle.token))
    }
}

impl EventDispatch for EventManager {
    fn attach(&self, phase: PhaseId, listener: Listener) -> CallbackHandle {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);

        let mut listeners = self.listeners.write();
        listeners.entry(phase).or_default().push(ListenerEntry {
            token,
            callback: listener,
        });

        CallbackHandle { phase, token }
    }

    fn detach(&self, handle: CallbackHandle) -> bool {
        let mut listeners = self.listeners.write();

        let Some(entries) = listeners.get_mut(&handle.phase) else {
            return false;
        };
        let Some(position) = entries.iter().position(|entry| entry.token == handle.token) else {
            return false;
        };

        entries.remove(position);
        if entries.is_empty() {
            listeners.remove(&handle.phase);
        }
        true
    }

    fn trigger(&self, phase: PhaseId, event: &IterationEvent) -> Result<(), BoxedError> {
        // Snapshot under the read lock, invoke outside it. Listeners may
        // re-enter this manager.
        let snapshot: Vec<Listener> = {
            let listeners = self.listeners.read();
            match listeners.get(&phase) {
                Some(entries) => entries
                    .iter()
                    .map(|entry| Arc::clone(&entry.callback))
                    .collect(),
                None => return Ok(()),
            }
        };

        for callback in &snapshot {
            callback(event)?;
        }
        Ok(())
    }
}

impl fmt::Debug for EventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.read();
        let total: usize = listeners.values().map(Vec::len).sum();
        f.debug_struct("EventManager")
            .field("phases", &listeners.len())
            .field("listeners", &total)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::DispatcherId;
    use crate::events::phases::{Iterate, IteratePre};
    use convoy_system::service::{ServiceLocator, ServiceRegistry};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn test_event() -> IterationEvent {
        let locator: Arc<dyn ServiceLocator> = Arc::new(ServiceRegistry::new());
        IterationEvent::new(DispatcherId::new(), None, locator)
    }

    #[test]
    fn attach_increments_count() {
        let manager = EventManager::new();
        let phase = PhaseId::of::<Iterate>();

        manager.attach_to::<Iterate>(|_| Ok(()));
        assert_eq!(manager.listener_count(phase), 1);

        manager.attach_to::<Iterate>(|_| Ok(()));
        assert_eq!(manager.listener_count(phase), 2);
    }

    #[test]
    fn trigger_calls_listeners() {
        let manager = EventManager::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        manager.attach_to::<Iterate>(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let event = test_event();

        manager
            .trigger(PhaseId::of::<Iterate>(), &event)
            .expect("trigger should succeed");
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        manager
            .trigger(PhaseId::of::<Iterate>(), &event)
            .expect("trigger should succeed");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn trigger_calls_all_listeners_in_order() {
        let manager = EventManager::new();
        let invocation_order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order_clone = Arc::clone(&invocation_order);
            manager.attach_to::<Iterate>(move |_| {
                order_clone.lock().unwrap().push(name);
                Ok(())
            });
        }

        manager
            .trigger(PhaseId::of::<Iterate>(), &test_event())
            .expect("trigger should succeed");

        let order = invocation_order.lock().unwrap();
        assert_eq!(
            *order,
            vec!["first", "second", "third"],
            "listeners should run in attachment order"
        );
    }

    #[test]
    fn trigger_unknown_phase_is_noop() {
        let manager = EventManager::new();

        // Should not panic or error with no listeners attached
        manager
            .trigger(PhaseId::of::<Iterate>(), &test_event())
            .expect("empty trigger should succeed");
    }

    #[test]
    fn listener_error_skips_remaining_listeners() {
        let manager = EventManager::new();
        let reached = Arc::new(AtomicUsize::new(0));

        manager.attach_to::<Iterate>(|_| Err("boom".into()));

        let reached_clone = Arc::clone(&reached);
        manager.attach_to::<Iterate>(move |_| {
            reached_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let result = manager.trigger(PhaseId::of::<Iterate>(), &test_event());

        let err = result.expect_err("first listener error should surface");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(
            reached.load(Ordering::SeqCst),
            0,
            "listeners after the failing one should not run"
        );
    }

    #[test]
    fn detach_removes_listener() {
        let manager = EventManager::new();
        let phase = PhaseId::of::<Iterate>();

        let keep = manager.attach_to::<Iterate>(|_| Ok(()));
        let remove = manager.attach_to::<Iterate>(|_| Ok(()));

        assert!(manager.detach(remove));
        assert_eq!(manager.listener_count(phase), 1);
        assert!(manager.contains(keep));
        assert!(!manager.contains(remove));
    }

    #[test]
    fn detach_twice_returns_false() {
        let manager = EventManager::new();
        let handle = manager.attach_to::<Iterate>(|_| Ok(()));

        assert!(manager.detach(handle));
        assert!(!manager.detach(handle));
    }

    #[test]
    fn detach_on_empty_phase_returns_false() {
        let manager = EventManager::new();
        let handle = manager.attach_to::<IteratePre>(|_| Ok(()));
        manager.detach(handle);

        // Phase entry was dropped entirely once its last listener left
        assert!(!manager.detach(handle));
        assert_eq!(manager.listener_count(PhaseId::of::<IteratePre>()), 0);
    }

    #[test]
    fn handle_reports_its_phase() {
        let manager = EventManager::new();
        let handle = manager.attach_to::<IteratePre>(|_| Ok(()));

        assert_eq!(handle.phase(), PhaseId::of::<IteratePre>());
    }

    #[test]
    fn listener_may_detach_itself_during_trigger() {
        let manager = Arc::new(EventManager::new());
        let phase = PhaseId::of::<Iterate>();

        let slot: Arc<Mutex<Option<CallbackHandle>>> = Arc::new(Mutex::new(None));
        let manager_clone = Arc::clone(&manager);
        let slot_clone = Arc::clone(&slot);

        let handle = manager.attach_to::<Iterate>(move |_| {
            let handle = slot_clone.lock().unwrap().take();
            if let Some(handle) = handle {
                assert!(manager_clone.detach(handle));
            }
            Ok(())
        });
        *slot.lock().unwrap() = Some(handle);

        manager
            .trigger(phase, &test_event())
            .expect("self-detaching trigger should succeed");
        assert_eq!(manager.listener_count(phase), 0);

        // Second trigger sees the updated registry
        manager
            .trigger(phase, &test_event())
            .expect("trigger after self-detach should succeed");
    }

    #[test]
    fn detached_listener_still_runs_for_current_snapshot() {
        let manager = Arc::new(EventManager::new());
        let phase = PhaseId::of::<Iterate>();
        let calls = Arc::new(AtomicUsize::new(0));

        // First listener detaches the second; the second still runs this
        // trigger because the snapshot was taken before any listener ran.
        let second_slot: Arc<Mutex<Option<CallbackHandle>>> = Arc::new(Mutex::new(None));
        let manager_clone = Arc::clone(&manager);
        let slot_clone = Arc::clone(&second_slot);
        manager.attach_to::<Iterate>(move |_| {
            if let Some(handle) = slot_clone.lock().unwrap().take() {
                manager_clone.detach(handle);
            }
            Ok(())
        });

        let calls_clone = Arc::clone(&calls);
        let second = manager.attach_to::<Iterate>(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        *second_slot.lock().unwrap() = Some(second);

        manager.trigger(phase, &test_event()).expect("trigger should succeed");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        manager.trigger(phase, &test_event()).expect("trigger should succeed");
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "detached listener should not run on later triggers"
        );
    }

    #[test]
    fn debug_reports_registry_shape() {
        let manager = EventManager::new();
        manager.attach_to::<Iterate>(|_| Ok(()));
        manager.attach_to::<IteratePre>(|_| Ok(()));

        let debug_str = format!("{manager:?}");
        assert!(debug_str.contains("phases: 2"));
        assert!(debug_str.contains("listeners: 2"));
    }
}

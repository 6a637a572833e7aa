//! Phase markers for the per-instance dispatch cycle.
//!
//! These marker types identify when listeners are invoked while the
//! dispatcher walks an instance sequence. Use them with
//! [`PhaseId::of::<T>()`](convoy_system::phase::PhaseId::of) for dynamic
//! registration, or use the type-safe registration method
//! [`attach_to::<IteratePre>`](super::EventManager::attach_to).
//!
//! # Pure Markers
//!
//! Phase markers are pure marker types implementing the [`Phase`] trait.
//! Event data is provided via the shared [`IterationEvent`](super::IterationEvent)
//! envelope, which all listeners receive.

use convoy_system::phase::{Phase, PhaseId};

// ─────────────────────────────────────────────────────────────────────────────
// Per-Instance Phases
// ─────────────────────────────────────────────────────────────────────────────

/// Marker type for listeners called before an instance is processed.
///
/// By the time this phase fires, the envelope already carries the current
/// instance and its contextual locator (if a context key was supplied), so
/// listeners can prepare state the main phase depends on.
///
/// Wire name: `iterate.pre`
pub struct IteratePre;
impl Phase for IteratePre {
    const NAME: &'static str = "iterate.pre";
}

/// Marker type for listeners called to process an instance.
///
/// This is the main phase of the cycle and the one a transient handler
/// passed to [`iterate`](crate::dispatcher::InstanceDispatcher::iterate)
/// is attached to for the duration of the run.
///
/// Wire name: `iterate`
pub struct Iterate;
impl Phase for Iterate {
    const NAME: &'static str = "iterate";
}

/// Marker type for listeners called after an instance has been processed.
///
/// The envelope still carries the instance that was just processed; it is
/// cleared only after this phase completes.
///
/// Wire name: `iterate.post`
pub struct IteratePost;
impl Phase for IteratePost {
    const NAME: &'static str = "iterate.post";
}

// ─────────────────────────────────────────────────────────────────────────────
// Phase Sequence
// ─────────────────────────────────────────────────────────────────────────────

/// The three phases of one instance cycle, in trigger order.
pub const SEQUENCE: [PhaseId; 3] = [
    PhaseId::of::<IteratePre>(),
    PhaseId::of::<Iterate>(),
    PhaseId::of::<IteratePost>(),
];

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

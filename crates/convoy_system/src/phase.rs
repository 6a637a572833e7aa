//! Phase identifiers for named event points.
//!
//! Phases are the mechanism by which a dispatcher notifies listeners at
//! well-known points of its lifecycle. A phase is identified by a marker
//! type carrying a wire name, wrapped in a [`PhaseId`]. See [`PhaseId`] for
//! the layered architecture and a full example.

use core::fmt;

/// Identifier for an event phase, derived from a marker type or a raw name.
///
/// A `PhaseId` wraps the phase's wire name, so two ids compare equal exactly
/// when their names do, regardless of which marker type produced them. The
/// phase system is split across layers:
///
/// - **Layer 1** (`convoy_system`) — provides the identifier type.
/// - **Layer 2** (`convoy_dispatch`) — defines the iteration phase markers
///   (`IteratePre`, `Iterate`, `IteratePost`) and triggers them at the
///   appropriate points while walking an instance sequence.
/// - **Callers** — attach listeners by phase id and may define additional
///   phases of their own.
///
/// # Example
///
/// ```
/// use convoy_system::phase::{Phase, PhaseId};
///
/// // Layer 2 defines a phase marker type
/// pub struct BeforeFlush;
///
/// impl Phase for BeforeFlush {
///     const NAME: &'static str = "flush.before";
/// }
///
/// let id = PhaseId::of::<BeforeFlush>();
/// assert_eq!(id.name(), "flush.before");
/// assert_eq!(id, PhaseId::named("flush.before"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseId {
    name: &'static str,
}

impl PhaseId {
    /// Creates a `PhaseId` for the given phase marker type.
    ///
    /// # Example
    ///
    /// ```
    /// # use convoy_system::phase::{Phase, PhaseId};
    /// pub struct AfterCommit;
    ///
    /// impl Phase for AfterCommit {
    ///     const NAME: &'static str = "commit.after";
    /// }
    ///
    /// let phase = PhaseId::of::<AfterCommit>();
    /// ```
    #[must_use]
    pub const fn of<P: Phase>() -> Self {
        Self { name: P::NAME }
    }

    /// Creates a `PhaseId` from a raw phase name.
    ///
    /// This is the escape hatch for phases without a marker type, such as
    /// phase names agreed on between listeners at runtime.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns the phase's wire name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Phase Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Marker trait for phase types.
///
/// Implemented by Layer 2 for the per-instance lifecycle markers (e.g.
/// `IteratePre`, `IteratePost`). The trait carries no methods, only the wire
/// name the phase is triggered under.
///
/// Note that [`PhaseId::named`] accepts any static string and does not
/// require this trait — `Phase` is a convention, not a hard constraint.
pub trait Phase: 'static {
    /// The wire name the phase is triggered under.
    const NAME: &'static str;
}

//! Controller contract for dispatch targets.
//!
//! A controller is the component on whose behalf a dispatch run executes.
//! The dispatcher never calls into it; it is stamped onto the event envelope
//! so listeners can see which component the run belongs to.

// ─────────────────────────────────────────────────────────────────────────────
// Controller trait
// ─────────────────────────────────────────────────────────────────────────────

/// A component that owns a dispatch run.
///
/// Controllers are opaque to the dispatcher. Implement this on whatever
/// type fronts the instances being iterated; listeners receive it through
/// [`IterationEvent::controller`](crate::events::IterationEvent::controller)
/// and can use [`name`](Controller::name) for logging or routing.
///
/// # Example
///
/// ```
/// use convoy_dispatch::controller::Controller;
///
/// struct BillingController;
///
/// impl Controller for BillingController {
///     fn name(&self) -> &str {
///         "billing"
///     }
/// }
///
/// let controller = BillingController;
/// assert_eq!(controller.name(), "billing");
/// ```
pub trait Controller: Send + Sync + 'static {
    /// Returns a human-readable name for logging and tracing.
    ///
    /// Defaults to the implementing type's name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

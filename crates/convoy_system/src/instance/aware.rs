//! The instance-aware capability and its reference implementation.

use core::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::instance::Instance;

/// Capability for objects that track which instance they are operating on.
///
/// A contextual service resolved once per instance may expose this
/// capability; a dispatcher then attaches the current instance before
/// triggering the phase sequence and detaches it afterwards. The slot is
/// mutated through `&self` while the object stays externally owned, so
/// implementations must synchronize internally.
pub trait InstanceAware: Send + Sync {
    /// Attaches an instance, or detaches the current one with `None`.
    fn set_instance(&self, instance: Option<Arc<dyn Instance>>);

    /// Returns the currently attached instance.
    fn instance(&self) -> Option<Arc<dyn Instance>>;
}

/// Minimal [`InstanceAware`] implementation: one lock-guarded slot.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use convoy_system::instance::{InstanceAware, InstanceSlot};
///
/// let slot = InstanceSlot::new();
/// assert!(slot.instance().is_none());
///
/// slot.set_instance(Some(Arc::new("row-17")));
/// assert!(slot.instance().is_some());
///
/// slot.set_instance(None);
/// assert!(slot.instance().is_none());
/// ```
#[derive(Default)]
pub struct InstanceSlot {
    current: RwLock<Option<Arc<dyn Instance>>>,
}

impl InstanceSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstanceAware for InstanceSlot {
    fn set_instance(&self, instance: Option<Arc<dyn Instance>>) {
        *self.current.write() = instance;
    }

    fn instance(&self) -> Option<Arc<dyn Instance>> {
        self.current.read().clone()
    }
}

impl fmt::Debug for InstanceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceSlot")
            .field("occupied", &self.current.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_and_detach_round_trip() {
        let slot = InstanceSlot::new();
        let instance: Arc<dyn Instance> = Arc::new(11_u32);

        slot.set_instance(Some(Arc::clone(&instance)));
        let held = slot.instance().expect("slot should be occupied");
        assert!(Arc::ptr_eq(&held, &instance));

        slot.set_instance(None);
        assert!(slot.instance().is_none());
    }

    #[test]
    fn attach_replaces_previous_instance() {
        let slot = InstanceSlot::new();
        let first: Arc<dyn Instance> = Arc::new("first");
        let second: Arc<dyn Instance> = Arc::new("second");

        slot.set_instance(Some(Arc::clone(&first)));
        slot.set_instance(Some(Arc::clone(&second)));

        let held = slot.instance().expect("slot should be occupied");
        assert!(Arc::ptr_eq(&held, &second));
    }

    #[test]
    fn debug_reports_occupancy() {
        let slot = InstanceSlot::new();
        assert!(format!("{slot:?}").contains("occupied: false"));

        slot.set_instance(Some(Arc::new(0_u8)));
        assert!(format!("{slot:?}").contains("occupied: true"));
    }
}

//! Instance traits and the instance-aware capability.
//!
//! This module provides the vocabulary for the objects a dispatcher walks
//! over and for services that track them:
//!
//! - [`Instance`] - Blanket trait for opaque domain objects
//! - [`InstanceAware`] - Capability for objects that track a current
//!   instance
//! - [`InstanceSlot`] - Minimal lock-guarded [`InstanceAware`]
//!   implementation
//!
//! # Opacity
//!
//! The dispatcher never inspects instances; they travel as
//! `Arc<dyn Instance>` and listeners recover concrete types by
//! downcasting. Any `Send + Sync + 'static` type is an instance
//! automatically.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use convoy_system::instance::{Instance, InstanceAware, InstanceSlot};
//!
//! struct Order { id: u64 }
//!
//! let slot = InstanceSlot::new();
//! slot.set_instance(Some(Arc::new(Order { id: 42 })));
//!
//! let current = slot.instance().expect("slot is occupied");
//! let order = current.downcast_ref::<Order>().expect("known type");
//! assert_eq!(order.id, 42);
//! ```

mod aware;
#[expect(
    clippy::module_inception,
    reason = "instance.rs contains the core Instance trait"
)]
mod instance;

pub use aware::{InstanceAware, InstanceSlot};
pub use instance::Instance;

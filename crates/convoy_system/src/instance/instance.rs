//! The core `Instance` trait.

use downcast_rs::{DowncastSync, impl_downcast};

/// An opaque domain object fed through a dispatcher.
///
/// Identity and fields are irrelevant to the iteration machinery; instances
/// are carried type-erased and only listeners give them meaning. Any type
/// that is `Send + Sync + 'static` automatically implements `Instance`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use convoy_system::instance::Instance;
///
/// struct Shipment { weight_kg: f32 }
///
/// let instance: Arc<dyn Instance> = Arc::new(Shipment { weight_kg: 1.5 });
/// let shipment = instance.downcast_ref::<Shipment>().expect("known type");
/// assert_eq!(shipment.weight_kg, 1.5);
/// ```
pub trait Instance: DowncastSync {
    /// Returns the type name for debugging purposes.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

// Blanket implementation for all compatible types
impl<T: Send + Sync + 'static> Instance for T {}

impl_downcast!(sync Instance);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn any_send_sync_type_is_an_instance() {
        let _: Arc<dyn Instance> = Arc::new(17_u64);
        let _: Arc<dyn Instance> = Arc::new(String::from("row"));
        let _: Arc<dyn Instance> = Arc::new(vec![1, 2, 3]);
    }

    #[test]
    fn downcast_arc_round_trip() {
        let instance: Arc<dyn Instance> = Arc::new(String::from("order-9"));

        let string = instance
            .downcast_arc::<String>()
            .ok()
            .expect("should downcast to String");
        assert_eq!(*string, "order-9");
    }

    #[test]
    fn type_name_reports_concrete_type() {
        let instance: Arc<dyn Instance> = Arc::new(3.5_f64);
        assert!(instance.type_name().contains("f64"));
    }
}

//! The foundational service-location framework for Convoy (Layer 1).
//!
//! `convoy_system` provides the core primitives for phased instance
//! dispatch:
//!
//! - [`phase`] - Phase marker trait and identifiers
//! - [`service`] - Service contracts, capability queries, and the registry
//! - [`instance`] - Instance trait and the instance-aware capability
//! - [`scope`] - Per-instance contextual scope
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Convoy architecture:
//!
//! - **Layer 1** (`convoy_system`): service-location primitives (this crate)
//! - **Layer 2** (`convoy_dispatch`): event machinery and the instance
//!   dispatcher
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use convoy_system::scope::InstanceScope;
//! use convoy_system::service::{Service, ServiceRegistry};
//!
//! struct Audit { sink: &'static str }
//! impl Service for Audit {}
//!
//! let services = ServiceRegistry::new();
//! services.insert("audit", Arc::new(Audit { sink: "stdout" }));
//! services.insert_factory("scope", || Arc::new(InstanceScope::new()));
//!
//! let audit = services.resolve_as::<Audit>("audit").unwrap();
//! assert_eq!(audit.sink, "stdout");
//! ```

/// Phase marker trait and identifiers.
pub mod phase;

/// Service contracts and the named registry.
pub mod service;

/// Instance trait and the instance-aware capability.
pub mod instance;

/// Per-instance contextual scope.
pub mod scope;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::instance::*;
    pub use crate::phase::*;
    pub use crate::scope::*;
    pub use crate::service::*;
}

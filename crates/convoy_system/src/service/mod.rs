//! Service location and resolution.
//!
//! This module provides the contracts for named dependency resolution and a
//! default registry implementation:
//!
//! - [`Service`] - Marker trait for resolvable objects, with optional
//!   capability queries
//! - [`ServiceLocator`] - Named resolution contract
//! - [`ServiceRegistry`] - Default locator backed by a name-to-entry map
//! - [`ResolveError`] - Resolution failures
//!
//! # Capability Queries
//!
//! A resolved [`Service`] is opaque until asked. [`Service::as_locator`] and
//! [`Service::as_instance_aware`] surface optional capabilities as typed
//! trait objects; both default to `None`, and implementors opt in by
//! returning `Some(self)`. Callers treat `None` as "capability absent", not
//! as a failure.
//!
//! # Shared vs Factory Entries
//!
//! | Entry | Registered via | Resolution behavior |
//! |-------|----------------|---------------------|
//! | Shared | [`ServiceRegistry::insert`] | Same reference every time |
//! | Factory | [`ServiceRegistry::insert_factory`] | Factory runs on every resolve |
//!
//! Factory entries exist for stateful resolution: a locator consulted once
//! per work item may legitimately hand out a different object each time.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use convoy_system::service::{Service, ServiceLocator, ServiceRegistry};
//!
//! struct Clock { tz: &'static str }
//! impl Service for Clock {}
//!
//! let registry = ServiceRegistry::new();
//! registry.insert("clock", Arc::new(Clock { tz: "UTC" }));
//!
//! let resolved = registry.resolve("clock").unwrap();
//! assert!(resolved.as_locator().is_none());
//! ```

mod locator;
mod registry;

pub use locator::{ResolveError, Service, ServiceLocator};
pub use registry::ServiceRegistry;

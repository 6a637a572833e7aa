//! Phased event dispatch over instance sequences for Convoy (Layer 2).
//!
//! `convoy_dispatch` provides the core abstractions for driving a three-phase
//! event cycle over a sequence of instances. This is the foundation for
//! observable, per-instance processing pipelines.
//!
//! # Core Concepts
//!
//! - [`InstanceDispatcher`] - Drives the phase cycle over an instance sequence
//! - [`EventManager`](events::EventManager) - Listener registry and reference dispatch
//! - [`IterationEvent`](events::IterationEvent) - Shared envelope listeners observe runs through
//! - Phase markers ([`events::phases`]) - `iterate.pre`, `iterate`, `iterate.post`
//! - [`Controller`](controller::Controller) - The component a run executes on behalf of
//!
//! # Example
//!
//! ```ignore
//! use convoy_dispatch::prelude::*;
//!
//! let manager = Arc::new(EventManager::new());
//! manager.attach_to::<Iterate>(|event: &IterationEvent| {
//!     process(event.instance());
//!     Ok(())
//! });
//!
//! let dispatcher = InstanceDispatcher::new()
//!     .with_event_dispatch(manager)
//!     .with_service_locator(registry);
//!
//! let result = dispatcher.iterate(instances, Some("mapper"), None)?;
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 2 of the Convoy architecture:
//!
//! - **Layer 1** (`convoy_system`): Service location and instance primitives
//! - **Layer 2** (`convoy_dispatch`): Phased dispatch over instances (this crate)

/// Controller contract for dispatch targets.
pub mod controller;

/// The dispatcher and its run types.
pub mod dispatcher;

/// Phase events: markers, envelope, and the listener manager.
pub mod events;

/// Tracing subscriber setup.
pub mod trace;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::controller::Controller;
    pub use crate::dispatcher::{DispatcherId, InstanceDispatcher, IterateError, IterationResult};
    pub use crate::events::phases::{Iterate, IteratePost, IteratePre, SEQUENCE};
    pub use crate::events::{
        BoxedError, CallbackHandle, EventDispatch, EventManager, IterationEvent, Listener,
    };
    pub use crate::trace::{TraceConfig, TraceFormat};
}

// Re-export key types at crate root for convenience
pub use dispatcher::{DispatcherId, InstanceDispatcher, IterateError, IterationResult};
pub use events::{EventDispatch, EventManager, IterationEvent};

//! Phase events for instance dispatch.
//!
//! This module provides the event machinery a dispatch run is observed
//! through: phase markers naming the points in the per-instance cycle, the
//! shared envelope listeners receive, and the manager that registers and
//! triggers listeners.
//!
//! # Design Principles
//!
//! - Listeners execute in attachment order
//! - One envelope per run, mutated between triggers, never handed out owned
//! - A failing listener stops the phase and surfaces its error
//!
//! # Architecture
//!
//! The event system consists of three parts:
//!
//! - **Phase markers** ([`phases`]): Empty types that identify trigger points
//! - **Envelope** ([`envelope`]): `IterationEvent` carrying run context to listeners
//! - **Manager** ([`manager`]): Registration and triggering mechanism
//!
//! # Example
//!
//! ```ignore
//! use convoy_dispatch::events::{EventManager, IterationEvent};
//! use convoy_dispatch::events::phases::{Iterate, IteratePost};
//!
//! let manager = EventManager::new();
//!
//! manager.attach_to::<Iterate>(|event: &IterationEvent| {
//!     if let Some(instance) = event.instance() {
//!         tracing::info!("processing {}", instance.type_name());
//!     }
//!     Ok(())
//! });
//!
//! manager.attach_to::<IteratePost>(|_event: &IterationEvent| {
//!     tracing::debug!("instance done");
//!     Ok(())
//! });
//! ```

pub mod envelope;
pub mod manager;
pub mod phases;

pub use envelope::IterationEvent;
pub use manager::{BoxedError, CallbackHandle, EventDispatch, EventManager, Listener};

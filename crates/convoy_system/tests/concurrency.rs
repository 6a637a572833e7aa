//! Concurrent access tests for `convoy_system`.
//!
//! These tests verify thread-safety and concurrent access patterns of the
//! reference implementations, which are externally owned and may be shared
//! across many callers.

use std::sync::{Arc, Barrier};
use std::thread;

use convoy_system::instance::{Instance, InstanceAware, InstanceSlot};
use convoy_system::scope::InstanceScope;
use convoy_system::service::{Service, ServiceRegistry};

// Test service types
struct Counter {
    value: i32,
}
impl Service for Counter {}

struct Config {
    name: String,
}
impl Service for Config {}

/// Test concurrent resolves from multiple threads.
#[test]
fn concurrent_resolves_from_multiple_threads() {
    let registry = Arc::new(ServiceRegistry::new());
    registry.insert("counter", Arc::new(Counter { value: 42 }));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                // Multiple concurrent resolves should all succeed
                for _ in 0..100 {
                    let counter = registry.resolve_as::<Counter>("counter").unwrap();
                    assert_eq!(counter.value, 42);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

/// Test registration racing with resolution on a shared registry.
#[test]
fn concurrent_insert_and_resolve() {
    let registry = Arc::new(ServiceRegistry::new());
    registry.insert("config", Arc::new(Config { name: "seed".into() }));

    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..100 {
                registry.insert(format!("service_{i}"), Arc::new(Counter { value: i }));
            }
        })
    };

    let reader = {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..100 {
                // The seed entry is always resolvable while writes land
                let config = registry.resolve_as::<Config>("config").unwrap();
                assert_eq!(config.name, "seed");
            }
        })
    };

    writer.join().expect("Thread panicked");
    reader.join().expect("Thread panicked");

    assert_eq!(registry.len(), 101);
}

/// Test that a shared slot never observes a torn value under contention.
#[test]
fn concurrent_slot_updates_are_consistent() {
    let slot = Arc::new(InstanceSlot::new());
    let barrier = Arc::new(Barrier::new(3));

    let instances: Vec<Arc<dyn Instance>> = vec![Arc::new(1_u8), Arc::new(2_u8)];

    let writers: Vec<_> = instances
        .iter()
        .map(|instance| {
            let slot = Arc::clone(&slot);
            let barrier = Arc::clone(&barrier);
            let instance = Arc::clone(instance);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..500 {
                    slot.set_instance(Some(Arc::clone(&instance)));
                }
            })
        })
        .collect();

    let reader = {
        let slot = Arc::clone(&slot);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..500 {
                if let Some(held) = slot.instance() {
                    let value = *held.downcast_ref::<u8>().expect("only u8s are attached");
                    assert!(value == 1 || value == 2);
                }
            }
        })
    };

    for writer in writers {
        writer.join().expect("Thread panicked");
    }
    reader.join().expect("Thread panicked");
}

/// Test a scope shared as both locator and instance-aware views.
#[test]
fn scope_capability_views_are_thread_safe() {
    let scope = Arc::new(InstanceScope::new());
    scope.services().insert("counter", Arc::new(Counter { value: 7 }));

    let locator = Arc::clone(&scope)
        .as_locator()
        .expect("scope is a locator");
    let aware = Arc::clone(&scope)
        .as_instance_aware()
        .expect("scope is instance-aware");

    let resolver = thread::spawn(move || {
        for _ in 0..200 {
            assert!(locator.resolve("counter").is_ok());
        }
    });

    let attacher = thread::spawn(move || {
        for i in 0..200_u32 {
            aware.set_instance(Some(Arc::new(i)));
        }
        aware.set_instance(None);
    });

    resolver.join().expect("Thread panicked");
    attacher.join().expect("Thread panicked");

    assert!(scope.instance().is_none());
}

//! Named service registry.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use super::locator::{ResolveError, Service, ServiceLocator};

/// Producer behind a registry entry.
enum ServiceEntry {
    /// One shared reference, cloned out on every resolve.
    Shared(Arc<dyn Service>),
    /// Factory invoked on every resolve.
    Factory(Arc<dyn Fn() -> Arc<dyn Service> + Send + Sync>),
}

/// Named service store and the default [`ServiceLocator`] implementation.
///
/// # Thread Safety
///
/// The registry uses interior mutability via [`RwLock`] so services can be
/// registered through `&self` while the registry is shared behind an
/// [`Arc`]. Resolution holds the read lock only long enough to copy the
/// entry's producer out.
///
/// # Shared vs Factory
///
/// [`insert`](Self::insert) stores one reference that every resolve clones;
/// [`insert_factory`](Self::insert_factory) stores a closure that runs on
/// every resolve, so repeated lookups of the same name may observe
/// different objects.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use convoy_system::service::{Service, ServiceLocator, ServiceRegistry};
///
/// struct Mailer { from: &'static str }
/// impl Service for Mailer {}
///
/// let registry = ServiceRegistry::new();
/// registry.insert("mailer", Arc::new(Mailer { from: "noreply@example.com" }));
///
/// let mailer = registry.resolve_as::<Mailer>("mailer").unwrap();
/// assert_eq!(mailer.from, "noreply@example.com");
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    entries: RwLock<HashMap<String, ServiceEntry>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a shared service under `name`, replacing any previous
    /// entry.
    pub fn insert(&self, name: impl Into<String>, service: Arc<dyn Service>) {
        self.entries
            .write()
            .insert(name.into(), ServiceEntry::Shared(service));
    }

    /// Registers a factory under `name`, replacing any previous entry.
    ///
    /// The factory runs on every resolve of `name`.
    pub fn insert_factory<S, F>(&self, name: impl Into<String>, factory: F)
    where
        S: Service,
        F: Fn() -> Arc<S> + Send + Sync + 'static,
    {
        let erased = Arc::new(move || -> Arc<dyn Service> { factory() });
        self.entries
            .write()
            .insert(name.into(), ServiceEntry::Factory(erased));
    }

    /// Removes the entry under `name`, returning whether one existed.
    pub fn remove(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }

    /// Checks whether an entry is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Returns the number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Checks whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Resolves `name` and downcasts the result to a concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if nothing is registered under
    /// `name`, or [`ResolveError::WrongType`] if the registered service is
    /// not a `T`.
    pub fn resolve_as<T: Service>(&self, name: &str) -> Result<Arc<T>, ResolveError> {
        self.resolve(name)?
            .downcast_arc::<T>()
            .map_err(|_| ResolveError::WrongType {
                name: name.to_owned(),
                expected: core::any::type_name::<T>(),
            })
    }
}

impl ServiceLocator for ServiceRegistry {
    fn resolve(&self, name: &str) -> Result<Arc<dyn Service>, ResolveError> {
        let producer = {
            let entries = self.entries.read();
            match entries.get(name) {
                Some(ServiceEntry::Shared(service)) => return Ok(Arc::clone(service)),
                Some(ServiceEntry::Factory(factory)) => Arc::clone(factory),
                None => return Err(ResolveError::NotFound(name.to_owned())),
            }
        };
        // Run the factory outside the lock; it may resolve from this same
        // registry.
        Ok(producer())
    }
}

impl Service for ServiceRegistry {
    fn as_locator(self: Arc<Self>) -> Option<Arc<dyn ServiceLocator>> {
        Some(self)
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("len", &self.len())
            .finish()
    }
}

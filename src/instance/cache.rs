//! Live instance cache shared between a container and its service locator.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::service::{Instance, Service};

/// Id → instance map populated on first resolution of shared services.
///
/// Clones share the same storage, which is how the
/// [`ServiceLocator`] handed out as `service_container` sees instances created
/// after it was resolved.
#[derive(Clone, Default)]
pub(crate) struct InstanceCache {
    inner: Arc<RwLock<HashMap<String, Instance>>>,
}

impl InstanceCache {
    pub(crate) fn get(&self, id: &str) -> Option<Instance> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).get(id).cloned()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).contains_key(id)
    }

    /// Inserts unless another resolution got there first; returns the cached value.
    pub(crate) fn get_or_insert(&self, id: &str, instance: Instance) -> Instance {
        let mut cache = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        cache.entry(id.to_owned()).or_insert(instance).clone()
    }

    pub(crate) fn insert(&self, id: impl Into<String>, instance: Instance) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).insert(id.into(), instance);
    }

    pub(crate) fn remove(&self, id: &str) -> Option<Instance> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).remove(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Read-only view of a container's live instances.
///
/// Resolved as `service_container` when the container is built with
/// [`ContainerOptions::container_as_service`](crate::ContainerOptions::container_as_service).
/// It only sees instances that already exist; it never constructs anything.
#[derive(Clone)]
pub struct ServiceLocator {
    cache: InstanceCache,
}

impl ServiceLocator {
    pub(crate) fn new(cache: InstanceCache) -> Self {
        Self { cache }
    }

    pub fn get(&self, id: &str) -> Option<Instance> {
        self.cache.get(id)
    }

    pub fn get_as<T: Service>(&self, id: &str) -> Option<Arc<T>> {
        self.cache.get(id).and_then(|instance| instance.downcast_arc::<T>())
    }

    pub fn is_set(&self, id: &str) -> bool {
        self.cache.contains(id)
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Service for ServiceLocator {}

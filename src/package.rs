//! External packages injected through [`PackageReference`](crate::PackageReference).
//!
//! Packages live outside the service graph: they are never constructed,
//! cached or decorated by the container, only looked up by name.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::value::Package;

/// Host capability that turns a package name into a value.
pub trait PackageResolver: Send + Sync {
    fn resolve(&self, id: &str) -> DiResult<Package>;
}

/// In-memory package table, the default resolver of every container.
///
/// ```
/// use ferrous_container::{PackageRegistry, PackageResolver};
///
/// let registry = PackageRegistry::new().with_package("clock", 1_700_000_000u64);
/// let clock = registry.resolve("clock").unwrap();
/// assert_eq!(*clock.downcast::<u64>().unwrap(), 1_700_000_000);
/// assert!(registry.resolve("fs").is_err());
/// ```
#[derive(Clone, Default)]
pub struct PackageRegistry {
    packages: HashMap<String, Package>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package<T: Any + Send + Sync>(mut self, id: impl Into<String>, package: T) -> Self {
        self.insert(id, package);
        self
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, id: impl Into<String>, package: T) {
        self.packages.insert(id.into(), Arc::new(package));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.packages.contains_key(id)
    }
}

impl PackageResolver for PackageRegistry {
    fn resolve(&self, id: &str) -> DiResult<Package> {
        self.packages
            .get(id)
            .cloned()
            .ok_or_else(|| DiError::PackageNotFound { id: id.to_owned() })
    }
}

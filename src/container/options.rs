//! Container configuration.

use std::fmt;
use std::sync::Arc;

use crate::compiler::DefaultPasses;
use crate::logger::{Logger, TracingLogger};
use crate::package::{PackageRegistry, PackageResolver};

/// Options fixed when a [`ContainerBuilder`](crate::ContainerBuilder) is created.
///
/// # Examples
///
/// ```
/// use ferrous_container::{ContainerBuilder, ContainerOptions, PackageRegistry};
/// use std::sync::Arc;
///
/// let options = ContainerOptions::new()
///     .container_as_service(true)
///     .with_package_resolver(Arc::new(PackageRegistry::new().with_package("fs", "/srv")));
///
/// let container = ContainerBuilder::with_options(options);
/// assert!(container.get("service_container").is_ok());
/// ```
#[derive(Clone)]
pub struct ContainerOptions {
    container_as_service: bool,
    logger: Arc<dyn Logger>,
    package_resolver: Arc<dyn PackageResolver>,
    default_passes: DefaultPasses,
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes a read-only view of the container under `service_container`.
    pub fn container_as_service(mut self, enabled: bool) -> Self {
        self.container_as_service = enabled;
        self
    }

    /// Receiver of deprecation and not-found warnings.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_package_resolver(mut self, resolver: Arc<dyn PackageResolver>) -> Self {
        self.package_resolver = resolver;
        self
    }

    /// Replaces the passes run for phases without registered passes.
    pub fn with_default_passes(mut self, passes: DefaultPasses) -> Self {
        self.default_passes = passes;
        self
    }

    pub fn is_container_as_service(&self) -> bool {
        self.container_as_service
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn package_resolver(&self) -> &dyn PackageResolver {
        self.package_resolver.as_ref()
    }

    pub fn default_passes(&self) -> &DefaultPasses {
        &self.default_passes
    }
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            container_as_service: false,
            logger: Arc::new(TracingLogger::new()),
            package_resolver: Arc::new(PackageRegistry::new()),
            default_passes: DefaultPasses::default(),
        }
    }
}

impl fmt::Debug for ContainerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerOptions")
            .field("container_as_service", &self.container_as_service)
            .finish_non_exhaustive()
    }
}

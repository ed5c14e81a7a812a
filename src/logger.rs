//! Side-channel logging for deprecation and not-found notices.
//!
//! Warnings never change control flow. The container only needs a `warn`
//! capability; the default implementation forwards to `tracing`.

/// Logger injected into a container through
/// [`ContainerOptions::with_logger`](crate::ContainerOptions::with_logger).
///
/// # Examples
///
/// ```
/// use ferrous_container::{ContainerBuilder, ContainerOptions, Logger, Target, Service};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Collecting(Mutex<Vec<String>>);
///
/// impl Logger for Collecting {
///     fn warn(&self, message: &str) {
///         self.0.lock().unwrap().push(message.to_owned());
///     }
/// }
///
/// struct Legacy;
/// impl Service for Legacy {}
///
/// let logger = Arc::new(Collecting::default());
/// let mut container = ContainerBuilder::with_options(ContainerOptions::new().with_logger(logger.clone()));
/// container
///     .register("legacy", Target::new(|_| Ok(Legacy)))
///     .unwrap()
///     .set_deprecated("legacy is deprecated, use modern");
///
/// container.get("legacy").unwrap();
/// assert_eq!(logger.0.lock().unwrap().len(), 1);
/// ```
pub trait Logger: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing::warn!`.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    prefix: String,
}

impl TracingLogger {
    /// Creates a new logger with the default prefix.
    pub fn new() -> Self {
        Self { prefix: "[ferrous-container]".to_string() }
    }

    /// Creates a new logger with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for TracingLogger {
    fn warn(&self, message: &str) {
        tracing::warn!("{} {}", self.prefix, message);
    }
}

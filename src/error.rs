//! Error types for the dependency injection container.

use thiserror::Error;

/// Dependency injection errors
///
/// Every failure raised while registering, compiling or resolving services is one
/// of these variants. Each carries the offending identifier so messages stay
/// stable and greppable.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{ContainerBuilder, DiError};
///
/// let container = ContainerBuilder::new();
/// match container.get("mailer") {
///     Err(DiError::ServiceNotFound { id }) => assert_eq!(id, "mailer"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// No definition (or instance) exists for the requested service id
    #[error("Service not found: {id}")]
    ServiceNotFound { id: String },
    /// A definition lookup by id failed
    #[error("Definition not found: {id}")]
    DefinitionNotFound { id: String },
    /// A `%key%` parameter or `%env(NAME)%` variable is not defined
    #[error("Parameter not found: {key}")]
    ParameterNotFound { key: String },
    /// The package resolver does not know the requested package
    #[error("Package not found: {id}")]
    PackageNotFound { id: String },

    /// A private service was requested from outside the container
    #[error("Service {id} is private and cannot be resolved directly")]
    PrivateService { id: String },
    /// Abstract definitions are templates and never instantiated
    #[error("Service {id} is abstract and cannot be instantiated")]
    AbstractService { id: String },
    /// The container has been compiled and no longer accepts definitions
    #[error("Container is frozen, cannot register service {id}")]
    FrozenContainer { id: String },
    /// A definition names a parent that is not abstract
    #[error("Parent service {id} must be abstract")]
    NotAbstractService { id: String },

    /// The definition shape is inconsistent
    #[error("Invalid definition for {id}: {reason}")]
    InvalidDefinition { id: String, reason: String },
    /// Tag attributes must be a key-value mapping
    #[error("Invalid attributes for tag {tag}: expected a mapping")]
    InvalidAttributes { tag: String },
    /// A method call was added without a method name
    #[error("Method name cannot be empty")]
    EmptyMethodName,
    /// Parameters must be strings, lists, booleans or maps
    #[error("Invalid type {kind} for parameter {key}")]
    InvalidParameterType { key: String, kind: &'static str },
    /// The service identifier is blank
    #[error("Invalid service identifier: {id:?}")]
    InvalidIdentifier { id: String },
    /// A constructor received an argument of the wrong kind
    #[error("Invalid argument at position {index}: expected {expected}")]
    InvalidArgument { index: usize, expected: &'static str },
    /// A method call or factory method does not exist on the target
    #[error("Method {method} not found on {target}")]
    MethodNotFound { target: String, method: String },
    /// A property injection names a property the service does not expose
    #[error("Property {property} not found on {target}")]
    PropertyNotFound { target: String, property: String },
    /// The resolved instance is not of the requested type
    #[error("Type mismatch for {id}: expected {expected}")]
    TypeMismatch { id: String, expected: &'static str },

    /// The dependency graph contains a cycle (includes path)
    #[error("Circular reference detected: {}", path.join(" -> "))]
    CircularReference { path: Vec<String> },

    /// Unknown compiler phase name
    #[error("Invalid compiler pass phase: {phase}")]
    InvalidPhase { phase: String },

    /// A services map could not be parsed or emitted
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl DiError {
    pub(crate) fn service_not_found(id: impl Into<String>) -> Self {
        DiError::ServiceNotFound { id: id.into() }
    }

    pub(crate) fn definition_not_found(id: impl Into<String>) -> Self {
        DiError::DefinitionNotFound { id: id.into() }
    }

    /// Builds a [`DiError::MethodNotFound`] for the given target.
    pub fn method_not_found(target: impl Into<String>, method: impl Into<String>) -> Self {
        DiError::MethodNotFound { target: target.into(), method: method.into() }
    }

    /// Builds a [`DiError::PropertyNotFound`] for the given target.
    pub fn property_not_found(target: impl Into<String>, property: impl Into<String>) -> Self {
        DiError::PropertyNotFound { target: target.into(), property: property.into() }
    }
}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
///
/// ```rust
/// use ferrous_container::{DiError, DiResult};
///
/// fn lookup() -> DiResult<()> {
///     Err(DiError::EmptyMethodName)
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;

//! Service identifiers.

use std::any::{type_name, TypeId};
use std::fmt;

/// Identifies the service to resolve.
///
/// Services are registered under string ids. A service can also be requested
/// by the type its target constructs, in which case the container scans its
/// definitions for the first target of that type.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::ServiceId;
///
/// struct Mailer;
/// impl ferrous_container::Service for Mailer {}
///
/// let by_name = ServiceId::from("mailer");
/// let by_type = ServiceId::of::<Mailer>();
///
/// assert_eq!(by_name.display_name(), "mailer");
/// assert!(by_type.display_name().ends_with("Mailer"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceId {
    /// A registered id or alias
    Name(String),
    /// The type built by a definition's target, with its name for diagnostics
    Type(TypeId, &'static str),
}

impl ServiceId {
    /// Identifier for the definition whose target builds `T`.
    pub fn of<T: 'static>() -> Self {
        ServiceId::Type(TypeId::of::<T>(), type_name::<T>())
    }

    /// Get the id or type name for display
    pub fn display_name(&self) -> &str {
        match self {
            ServiceId::Name(name) => name,
            ServiceId::Type(_, name) => name,
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        ServiceId::Name(value.to_owned())
    }
}

impl From<String> for ServiceId {
    fn from(value: String) -> Self {
        ServiceId::Name(value)
    }
}

impl From<&String> for ServiceId {
    fn from(value: &String) -> Self {
        ServiceId::Name(value.clone())
    }
}

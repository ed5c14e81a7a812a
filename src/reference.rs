//! Argument specifications: literals and the three reference kinds.

use crate::value::Literal;

/// "Inject service `id`".
///
/// A nullable reference to an id with no definition resolves to
/// [`Literal::Null`] instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    id: String,
    nullable: bool,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), nullable: false }
    }

    pub fn nullable(id: impl Into<String>) -> Self {
        Self { id: id.into(), nullable: true }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// "Inject every service tagged `name`", in definition order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagReference {
    name: String,
}

impl TagReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// "Inject external package `id`", looked up through the container's
/// [`PackageResolver`](crate::PackageResolver). Packages are not services.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageReference {
    id: String,
}

impl PackageReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// One entry of a definition's argument list.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Argument, Reference, TagReference};
///
/// let args: Vec<Argument> = vec![
///     Reference::new("logger").into(),
///     TagReference::new("listener").into(),
///     "literal".into(),
///     42.into(),
/// ];
/// assert_eq!(args[0].as_reference().unwrap().id(), "logger");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Package(PackageReference),
    Tagged(TagReference),
    Reference(Reference),
    Literal(Literal),
}

impl Argument {
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Argument::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Argument::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl From<Reference> for Argument {
    fn from(value: Reference) -> Self {
        Argument::Reference(value)
    }
}

impl From<TagReference> for Argument {
    fn from(value: TagReference) -> Self {
        Argument::Tagged(value)
    }
}

impl From<PackageReference> for Argument {
    fn from(value: PackageReference) -> Self {
        Argument::Package(value)
    }
}

impl From<Literal> for Argument {
    fn from(value: Literal) -> Self {
        Argument::Literal(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<i32> for Argument {
    fn from(value: i32) -> Self {
        Argument::Literal(value.into())
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Literal(value.into())
    }
}

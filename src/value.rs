//! Literal and resolved argument values.
//!
//! [`Literal`] is plain configuration data: what a definition carries before
//! resolution and what parameters hold. [`Value`] is what a constructor, a
//! property setter or a method call receives once references are resolved.

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};
use crate::service::{Instance, Service};

/// Opaque handle to an external package returned by a
/// [`PackageResolver`](crate::PackageResolver).
pub type Package = Arc<dyn Any + Send + Sync>;

/// A plain data value.
///
/// Literals are passed through argument resolution unchanged. Lists and maps
/// never contain references; the container does not look inside them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Literal>),
    Map(BTreeMap<String, Literal>),
}

impl Literal {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::String(_) => "string",
            Literal::List(_) => "list",
            Literal::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Float(f) => Some(*f),
            Literal::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Literal>> {
        match self {
            Literal::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(i64::from(value))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<Vec<Literal>> for Literal {
    fn from(value: Vec<Literal>) -> Self {
        Literal::List(value)
    }
}

impl From<BTreeMap<String, Literal>> for Literal {
    fn from(value: BTreeMap<String, Literal>) -> Self {
        Literal::Map(value)
    }
}

/// A resolved argument.
#[derive(Clone)]
pub enum Value {
    /// A literal passed through unchanged (also the result of a nullable
    /// reference to a missing service).
    Literal(Literal),
    /// The instance behind a [`Reference`](crate::Reference).
    Service(Instance),
    /// The instances behind a [`TagReference`](crate::TagReference), in
    /// definition order.
    Services(Vec<Instance>),
    /// The package behind a [`PackageReference`](crate::PackageReference).
    Package(Package),
}

impl Value {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_literal().and_then(Literal::as_str)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Literal(Literal::Null))
    }

    /// Downcasts a service value to its concrete type.
    pub fn service<T: Service>(&self) -> Option<Arc<T>> {
        match self {
            Value::Service(instance) => instance.clone().downcast_arc::<T>(),
            _ => None,
        }
    }

    /// Downcasts every instance of a tagged collection. Instances of another
    /// type are skipped.
    pub fn services<T: Service>(&self) -> Option<Vec<Arc<T>>> {
        match self {
            Value::Services(instances) => Some(
                instances
                    .iter()
                    .filter_map(|instance| instance.clone().downcast_arc::<T>())
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn package<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Value::Package(package) => package.clone().downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
            Value::Service(instance) => f.debug_tuple("Service").field(&instance.type_name()).finish(),
            Value::Services(instances) => f
                .debug_tuple("Services")
                .field(&instances.iter().map(|i| i.type_name()).collect::<Vec<_>>())
                .finish(),
            Value::Package(_) => f.write_str("Package(..)"),
        }
    }
}

impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        Value::Literal(value)
    }
}

/// Resolved arguments handed to a constructor, a method call or a factory.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Arguments, Literal, Value};
///
/// let args = Arguments::new(vec![Value::Literal(Literal::from("smtp://localhost"))]);
/// assert_eq!(args.str(0).unwrap(), "smtp://localhost");
/// assert!(args.str(1).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }

    fn require(&self, index: usize, expected: &'static str) -> DiResult<&Value> {
        self.values.get(index).ok_or(DiError::InvalidArgument { index, expected })
    }

    /// The literal at `index`.
    pub fn literal(&self, index: usize) -> DiResult<&Literal> {
        self.require(index, "literal")?
            .as_literal()
            .ok_or(DiError::InvalidArgument { index, expected: "literal" })
    }

    pub fn str(&self, index: usize) -> DiResult<&str> {
        self.literal(index)?
            .as_str()
            .ok_or(DiError::InvalidArgument { index, expected: "string" })
    }

    pub fn bool(&self, index: usize) -> DiResult<bool> {
        self.literal(index)?
            .as_bool()
            .ok_or(DiError::InvalidArgument { index, expected: "bool" })
    }

    pub fn int(&self, index: usize) -> DiResult<i64> {
        self.literal(index)?
            .as_i64()
            .ok_or(DiError::InvalidArgument { index, expected: "int" })
    }

    /// The service at `index`, downcast to `T`.
    pub fn service<T: Service>(&self, index: usize) -> DiResult<Arc<T>> {
        self.require(index, type_name::<T>())?
            .service::<T>()
            .ok_or(DiError::InvalidArgument { index, expected: type_name::<T>() })
    }

    /// Like [`service`](Self::service), but a null literal (a nullable
    /// reference to a missing service) yields `None`.
    pub fn optional_service<T: Service>(&self, index: usize) -> DiResult<Option<Arc<T>>> {
        match self.values.get(index) {
            None => Ok(None),
            Some(value) if value.is_null() => Ok(None),
            Some(_) => self.service::<T>(index).map(Some),
        }
    }

    /// The tagged collection at `index`, downcast to `T`.
    pub fn services<T: Service>(&self, index: usize) -> DiResult<Vec<Arc<T>>> {
        self.require(index, "tagged services")?
            .services::<T>()
            .ok_or(DiError::InvalidArgument { index, expected: "tagged services" })
    }

    pub fn package<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
        self.require(index, type_name::<T>())?
            .package::<T>()
            .ok_or(DiError::InvalidArgument { index, expected: type_name::<T>() })
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl IntoIterator for Arguments {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

//! Service definitions: the recipe for building one service.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::error::{DiError, DiResult};
use crate::reference::{Argument, Reference};
use crate::service::Target;
use crate::value::Literal;

/// A setter-injection call applied after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    method: String,
    arguments: Vec<Argument>,
}

impl MethodCall {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }
}

/// A tag with its attribute mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: String,
    attributes: BTreeMap<String, Literal>,
}

impl Tag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &BTreeMap<String, Literal> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Literal> {
        self.attributes.get(key)
    }
}

/// Where a factory method lives.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorySource {
    /// A static method of the target itself.
    Target(Target),
    /// A static method of the type of the referenced service.
    Reference(Reference),
}

impl From<Target> for FactorySource {
    fn from(value: Target) -> Self {
        FactorySource::Target(value)
    }
}

impl From<Reference> for FactorySource {
    fn from(value: Reference) -> Self {
        FactorySource::Reference(value)
    }
}

/// Alternate construction path: `source::method(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Factory {
    source: FactorySource,
    method: String,
}

impl Factory {
    pub fn source(&self) -> &FactorySource {
        &self.source
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

/// The mutable recipe for one service.
///
/// Definitions are plain data: nothing is resolved until the container builds
/// the service. Setters return `&mut Self` so a definition can be configured
/// fluently right after [`register`](crate::ContainerBuilder::register).
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Definition, Reference};
///
/// let mut definition = Definition::default();
/// definition
///     .add_argument(Reference::new("transport"))
///     .add_argument("noreply@example.com")
///     .set_lazy(true);
/// definition.add_method_call("set_logger", vec![Reference::new("logger").into()]).unwrap();
///
/// assert!(definition.is_synthetic());
/// assert_eq!(definition.arguments().len(), 2);
/// assert_eq!(definition.method_calls()[0].method(), "set_logger");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    target: Option<Target>,
    arguments: Vec<Argument>,
    append_arguments: Vec<Argument>,
    method_calls: Vec<MethodCall>,
    properties: IndexMap<String, Argument>,
    tags: Vec<Tag>,
    public: bool,
    shared: bool,
    lazy: bool,
    synthetic: bool,
    abstract_: bool,
    deprecated: Option<String>,
    factory: Option<Factory>,
    decorated_service: Option<String>,
    decoration_priority: i32,
    parent: Option<String>,
}

impl Default for Definition {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Definition {
    /// Creates a definition for `target`; without a target it is synthetic.
    pub fn new(target: Option<Target>) -> Self {
        Self {
            synthetic: target.is_none(),
            target,
            arguments: Vec::new(),
            append_arguments: Vec::new(),
            method_calls: Vec::new(),
            properties: IndexMap::new(),
            tags: Vec::new(),
            public: true,
            shared: true,
            lazy: false,
            abstract_: false,
            deprecated: None,
            factory: None,
            decorated_service: None,
            decoration_priority: 0,
            parent: None,
        }
    }

    // ----- Construction -----

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, target: Target) -> &mut Self {
        self.target = Some(target);
        self.synthetic = false;
        self
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn set_arguments(&mut self, arguments: Vec<Argument>) -> &mut Self {
        self.arguments = arguments;
        self
    }

    pub fn add_argument(&mut self, argument: impl Into<Argument>) -> &mut Self {
        self.arguments.push(argument.into());
        self
    }

    /// Arguments appended to a child's arguments when this definition is its parent.
    pub fn append_arguments(&self) -> &[Argument] {
        &self.append_arguments
    }

    pub fn add_append_argument(&mut self, argument: impl Into<Argument>) -> &mut Self {
        self.append_arguments.push(argument.into());
        self
    }

    pub fn factory(&self) -> Option<&Factory> {
        self.factory.as_ref()
    }

    /// Builds the service through `source::method(arguments)` instead of the target.
    /// A definition with a factory is never synthetic.
    pub fn set_factory(&mut self, source: impl Into<FactorySource>, method: impl Into<String>) -> &mut Self {
        self.factory = Some(Factory { source: source.into(), method: method.into() });
        self.synthetic = false;
        self
    }

    // ----- Post-construction injection -----

    pub fn method_calls(&self) -> &[MethodCall] {
        &self.method_calls
    }

    pub fn add_method_call(&mut self, method: impl Into<String>, arguments: Vec<Argument>) -> DiResult<&mut Self> {
        let method = method.into();
        if method.trim().is_empty() {
            return Err(DiError::EmptyMethodName);
        }
        self.method_calls.push(MethodCall { method, arguments });
        Ok(self)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn property(&self, name: &str) -> Option<&Argument> {
        self.properties.get(name)
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<Argument>) -> &mut Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    // ----- Tags -----

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    /// Adds a tag. `attributes` must be a map (or null for none).
    pub fn add_tag(&mut self, name: impl Into<String>, attributes: impl Into<Literal>) -> DiResult<&mut Self> {
        let name = name.into();
        let attributes = match attributes.into() {
            Literal::Map(map) => map,
            Literal::Null => BTreeMap::new(),
            _ => return Err(DiError::InvalidAttributes { tag: name }),
        };
        self.tags.push(Tag { name, attributes });
        Ok(self)
    }

    /// Adds a tag without attributes.
    pub fn tag(&mut self, name: impl Into<String>) -> &mut Self {
        self.tags.push(Tag { name: name.into(), attributes: BTreeMap::new() });
        self
    }

    // ----- Lifecycle flags -----

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn set_public(&mut self, public: bool) -> &mut Self {
        self.public = public;
        self
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }

    pub fn set_shared(&mut self, shared: bool) -> &mut Self {
        self.shared = shared;
        self
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn set_lazy(&mut self, lazy: bool) -> &mut Self {
        self.lazy = lazy;
        self
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn set_synthetic(&mut self, synthetic: bool) -> &mut Self {
        self.synthetic = synthetic;
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.abstract_
    }

    pub fn set_abstract(&mut self, abstract_: bool) -> &mut Self {
        self.abstract_ = abstract_;
        self
    }

    pub fn deprecated(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }

    pub fn set_deprecated(&mut self, message: impl Into<String>) -> &mut Self {
        self.deprecated = Some(message.into());
        self
    }

    // ----- Decoration and inheritance -----

    pub fn decorated_service(&self) -> Option<&str> {
        self.decorated_service.as_deref()
    }

    pub fn decoration_priority(&self) -> i32 {
        self.decoration_priority
    }

    /// Marks this definition as a decorator of `id`. Lower priorities wrap first.
    pub fn set_decorated_service(&mut self, id: impl Into<String>, priority: i32) -> &mut Self {
        self.decorated_service = Some(id.into());
        self.decoration_priority = priority;
        self
    }

    pub(crate) fn clear_decoration(&mut self) -> &mut Self {
        self.decorated_service = None;
        self.decoration_priority = 0;
        self
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Names an abstract definition whose append arguments follow this one's.
    pub fn set_parent(&mut self, id: impl Into<String>) -> &mut Self {
        self.parent = Some(id.into());
        self
    }

    /// Checks that the definition can be stored under `id`.
    pub(crate) fn validate(&self, id: &str) -> DiResult<()> {
        if self.parent.as_deref() == Some(id) {
            return Err(DiError::InvalidDefinition { id: id.to_owned(), reason: "a definition cannot be its own parent".into() });
        }
        if self.decorated_service.as_deref() == Some(id) {
            return Err(DiError::InvalidDefinition { id: id.to_owned(), reason: "a definition cannot decorate itself".into() });
        }
        Ok(())
    }
}

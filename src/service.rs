//! Services and the targets that construct them.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::value::{Arguments, Value};

/// A live, shared service instance.
pub type Instance = Arc<dyn Service>;

/// Type-erasure helpers implemented for every `'static + Send + Sync` type.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn service_type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn service_type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// An object the container can build and hand out.
///
/// Property injection and method calls are dispatched by name. The default
/// implementations reject every name, so a plain `impl Service for T {}` is
/// enough for services wired purely through their constructor.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Arguments, DiError, DiResult, Service, Value};
///
/// #[derive(Default)]
/// struct Mailer {
///     transport: String,
///     retries: i64,
/// }
///
/// impl Service for Mailer {
///     fn set_property(&mut self, name: &str, value: Value) -> DiResult<()> {
///         match name {
///             "transport" => {
///                 self.transport = value.as_str().unwrap_or_default().to_owned();
///                 Ok(())
///             }
///             _ => Err(DiError::property_not_found("Mailer", name)),
///         }
///     }
///
///     fn call(&mut self, method: &str, args: Arguments) -> DiResult<()> {
///         match method {
///             "set_retries" => {
///                 self.retries = args.int(0)?;
///                 Ok(())
///             }
///             _ => Err(DiError::method_not_found("Mailer", method)),
///         }
///     }
/// }
/// ```
pub trait Service: AsAny {
    /// Assigns an injected property after construction.
    fn set_property(&mut self, name: &str, _value: Value) -> DiResult<()> {
        Err(DiError::property_not_found(type_name::<Self>(), name))
    }

    /// Invokes a setter-injection call after construction.
    fn call(&mut self, method: &str, _args: Arguments) -> DiResult<()> {
        Err(DiError::method_not_found(type_name::<Self>(), method))
    }
}

impl dyn Service {
    /// Name of the concrete type behind the trait object.
    pub fn type_name(&self) -> &'static str {
        self.service_type_name()
    }

    /// `TypeId` of the concrete type behind the trait object.
    pub fn concrete_type_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    pub fn is<T: Service>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Service>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_arc<T: Service>(self: Arc<Self>) -> Option<Arc<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

impl fmt::Debug for dyn Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Services that know how to build themselves from resolved arguments.
///
/// ```rust
/// use ferrous_container::{Arguments, Constructible, DiResult, Service, Target};
///
/// struct Clock;
/// impl Service for Clock {}
/// impl Constructible for Clock {
///     fn construct(_args: Arguments) -> DiResult<Self> {
///         Ok(Clock)
///     }
/// }
///
/// let target = Target::of::<Clock>();
/// assert!(target.name().ends_with("Clock"));
/// ```
pub trait Constructible: Service + Sized {
    fn construct(args: Arguments) -> DiResult<Self>;
}

type ConstructFn = Arc<dyn Fn(Arguments) -> DiResult<Box<dyn Service>> + Send + Sync>;

/// A named static method usable as a factory.
pub type StaticMethod = Arc<dyn Fn(Arguments) -> DiResult<Instance> + Send + Sync>;

/// The constructible a definition builds.
///
/// A target is identified by the `TypeId` of the service it produces; two
/// targets for the same type compare equal. Static methods registered with
/// [`with_static_method`](Self::with_static_method) serve as factory methods.
#[derive(Clone)]
pub struct Target {
    type_id: TypeId,
    name: &'static str,
    construct: ConstructFn,
    statics: HashMap<String, StaticMethod>,
}

impl Target {
    /// Creates a target from a constructor closure.
    pub fn new<T, F>(construct: F) -> Self
    where
        T: Service,
        F: Fn(Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            construct: Arc::new(move |args| Ok(Box::new(construct(args)?) as Box<dyn Service>)),
            statics: HashMap::new(),
        }
    }

    /// Creates a target from a [`Constructible`] type.
    pub fn of<T: Constructible>() -> Self {
        Self::new(T::construct)
    }

    /// Registers a static method callable through [`Factory`](crate::Factory).
    pub fn with_static_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(Arguments) -> DiResult<Instance> + Send + Sync + 'static,
    {
        self.statics.insert(name.into(), Arc::new(method));
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub(crate) fn construct(&self, args: Arguments) -> DiResult<Box<dyn Service>> {
        (self.construct)(args)
    }

    pub(crate) fn call_static(&self, method: &str, args: Arguments) -> DiResult<Instance> {
        let function = self
            .statics
            .get(method)
            .ok_or_else(|| DiError::method_not_found(self.name, method))?;
        function(args)
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Target {}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut statics: Vec<&str> = self.statics.keys().map(String::as_str).collect();
        statics.sort_unstable();
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("statics", &statics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeter {
        greeting: String,
    }

    impl Service for Greeter {}

    #[test]
    fn targets_compare_by_type() {
        let a = Target::new(|_| Ok(Greeter { greeting: "a".into() }));
        let b = Target::new(|_| Ok(Greeter { greeting: "b".into() }));
        assert_eq!(a, b);
        assert!(a.is::<Greeter>());
    }

    #[test]
    fn unknown_static_method_is_reported() {
        let target = Target::new(|_| Ok(Greeter { greeting: String::new() }));
        let err = target.call_static("create", Arguments::default()).unwrap_err();
        assert!(matches!(err, DiError::MethodNotFound { ref method, .. } if method == "create"));
    }

    #[test]
    fn downcasting_instances() {
        let target = Target::new(|_| Ok(Greeter { greeting: "hi".into() }));
        let instance: Instance = Arc::from(target.construct(Arguments::default()).unwrap());
        assert!(instance.is::<Greeter>());
        assert_eq!(instance.downcast_ref::<Greeter>().unwrap().greeting, "hi");
        assert_eq!(instance.concrete_type_id(), TypeId::of::<Greeter>());
        assert!(instance.clone().downcast_arc::<Greeter>().is_some());
    }

    #[test]
    fn instances_debug_as_their_type() {
        let target = Target::new(|_| Ok(Greeter { greeting: String::new() }));
        let instance: Instance = Arc::from(target.construct(Arguments::default()).unwrap());
        assert!(format!("{instance:?}").ends_with("Greeter"));
        let missing: DiResult<Instance> = Err(DiError::service_not_found("greeter"));
        assert_eq!(missing.unwrap_err(), DiError::ServiceNotFound { id: "greeter".into() });
    }

    #[test]
    fn default_dispatch_rejects_names() {
        let mut greeter = Greeter { greeting: String::new() };
        assert!(matches!(
            greeter.call("wave", Arguments::default()),
            Err(DiError::MethodNotFound { .. })
        ));
        assert!(matches!(
            greeter.set_property("volume", Value::Literal(crate::Literal::Null)),
            Err(DiError::PropertyNotFound { .. })
        ));
    }
}

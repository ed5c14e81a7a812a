//! The container facade.
//!
//! [`ContainerBuilder`] owns definitions, aliases, parameters, registered
//! compiler passes and extensions, and the instance cache. Resolution is
//! delegated to the instance manager; compilation to the [`Compiler`].

use std::any::type_name;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::compiler::{Compiler, CompilerPass, PassConfig, Phase};
use crate::definition::Definition;
use crate::error::{DiError, DiResult};
use crate::extension::Extension;
use crate::instance::{InstanceCache, InstanceManager, ServiceLocator};
use crate::key::ServiceId;
use crate::service::{Instance, Service, Target};
use crate::value::Literal;

pub mod options;
pub use options::ContainerOptions;

/// Registry of service definitions that compiles into a frozen, resolvable graph.
///
/// # Examples
///
/// ```rust
/// use ferrous_container::{Arguments, ContainerBuilder, Reference, Service, Target};
/// use std::sync::Arc;
///
/// struct Transport {
///     dsn: String,
/// }
/// impl Service for Transport {}
///
/// struct Mailer {
///     transport: Arc<Transport>,
/// }
/// impl Service for Mailer {}
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> ferrous_container::DiResult<()> {
/// let mut container = ContainerBuilder::new();
/// container
///     .register("transport", Target::new(|args: Arguments| Ok(Transport { dsn: args.str(0)?.to_owned() })))?
///     .add_argument("smtp://localhost")
///     .set_public(false);
/// container
///     .register("mailer", Target::new(|args: Arguments| Ok(Mailer { transport: args.service(0)? })))?
///     .add_argument(Reference::new("transport"));
///
/// container.compile().await?;
///
/// let mailer = container.get_as::<Mailer>("mailer")?;
/// assert_eq!(mailer.transport.dsn, "smtp://localhost");
/// assert!(container.get("transport").is_err());
/// # Ok(())
/// # }
/// ```
pub struct ContainerBuilder {
    definitions: IndexMap<String, Definition>,
    parameters: IndexMap<String, Literal>,
    aliases: IndexMap<String, String>,
    services: InstanceCache,
    locator: Option<Instance>,
    extensions: Vec<Arc<dyn Extension>>,
    passes: PassConfig,
    frozen: bool,
    options: ContainerOptions,
}

impl ContainerBuilder {
    /// Creates an empty container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        let services = InstanceCache::default();
        let locator = options
            .is_container_as_service()
            .then(|| Arc::new(ServiceLocator::new(services.clone())) as Instance);
        Self {
            definitions: IndexMap::new(),
            parameters: IndexMap::new(),
            aliases: IndexMap::new(),
            services,
            locator,
            extensions: Vec::new(),
            passes: PassConfig::default(),
            frozen: false,
            options,
        }
    }

    // ----- Definitions -----

    /// Registers a service built by `target` and returns its definition for
    /// further configuration.
    pub fn register(&mut self, id: impl Into<String>, target: Target) -> DiResult<&mut Definition> {
        self.set_definition(id, Definition::new(Some(target)))
    }

    /// Registers a synthetic service, whose instance is supplied with [`set`](Self::set).
    pub fn register_synthetic(&mut self, id: impl Into<String>) -> DiResult<&mut Definition> {
        self.set_definition(id, Definition::new(None))
    }

    /// Stores `definition` under `id`, replacing any definition or alias of that id.
    pub fn set_definition(&mut self, id: impl Into<String>, definition: Definition) -> DiResult<&mut Definition> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DiError::InvalidIdentifier { id });
        }
        if self.frozen {
            return Err(DiError::FrozenContainer { id });
        }
        definition.validate(&id)?;

        self.aliases.shift_remove(&id);
        let index = self.definitions.insert_full(id, definition).0;
        Ok(&mut self.definitions[index])
    }

    pub fn get_definition(&self, id: &str) -> DiResult<&Definition> {
        let id = self.resolve_alias(id);
        self.definitions
            .get(id)
            .ok_or_else(|| DiError::definition_not_found(id))
    }

    pub fn get_definition_mut(&mut self, id: &str) -> DiResult<&mut Definition> {
        let id = self.resolve_alias(id).to_owned();
        self.definitions
            .get_mut(&id)
            .ok_or(DiError::DefinitionNotFound { id })
    }

    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(self.resolve_alias(id))
    }

    /// Removes the definition stored under exactly `id`, keeping the order of the others.
    pub fn remove_definition(&mut self, id: &str) -> Option<Definition> {
        self.definitions.shift_remove(id)
    }

    /// All definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.definitions.iter().map(|(id, definition)| (id.as_str(), definition))
    }

    /// Definitions carrying tag `name`, in registration order.
    pub fn find_tagged_service_ids<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (&'a str, &'a Definition)> + 'a {
        self.definitions()
            .filter(move |(_, definition)| definition.has_tag(name))
    }

    // ----- Aliases -----

    /// Points `alias` at `id`, replacing any definition stored under `alias`.
    /// A frozen container accepts no new aliases.
    pub fn set_alias(&mut self, alias: impl Into<String>, id: impl Into<String>) -> DiResult<()> {
        let alias = alias.into();
        let id = id.into();
        if self.frozen {
            return Err(DiError::FrozenContainer { id: alias });
        }
        if alias.trim().is_empty() {
            return Err(DiError::InvalidIdentifier { id: alias });
        }
        if alias == id {
            return Err(DiError::InvalidDefinition { id: alias, reason: "an alias cannot point to itself".into() });
        }
        self.definitions.shift_remove(&alias);
        self.aliases.insert(alias, id);
        Ok(())
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    pub fn get_alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// All aliases in registration order.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(alias, id)| (alias.as_str(), id.as_str()))
    }

    /// Follows aliases to the canonical id. Alias loops stop after one full turn.
    pub(crate) fn resolve_alias<'a>(&'a self, id: &'a str) -> &'a str {
        let mut current = id;
        for _ in 0..=self.aliases.len() {
            match self.aliases.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    // ----- Parameters -----

    /// Sets a parameter. Top-level values must be strings, lists, booleans or maps.
    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<Literal>) -> DiResult<()> {
        let key = key.into();
        let value = value.into();
        match value {
            Literal::String(_) | Literal::List(_) | Literal::Bool(_) | Literal::Map(_) => {
                self.parameters.insert(key, value);
                Ok(())
            }
            other => Err(DiError::InvalidParameterType { key, kind: other.kind() }),
        }
    }

    pub fn get_parameter(&self, key: &str) -> DiResult<&Literal> {
        self.parameters
            .get(key)
            .ok_or_else(|| DiError::ParameterNotFound { key: key.to_owned() })
    }

    pub fn has_parameter(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.parameters.iter().map(|(key, value)| (key.as_str(), value))
    }

    // ----- Resolution -----

    /// Resolves a public service by id, alias or constructed type.
    pub fn get(&self, id: impl Into<ServiceId>) -> DiResult<Instance> {
        self.get_internal(&id.into(), false)
    }

    /// Resolves a public service and downcasts it to `T`.
    pub fn get_as<T: Service>(&self, id: impl Into<ServiceId>) -> DiResult<Arc<T>> {
        let id = id.into();
        self.get_internal(&id, false)?
            .downcast_arc::<T>()
            .ok_or_else(|| DiError::TypeMismatch { id: id.display_name().to_owned(), expected: type_name::<T>() })
    }

    /// Resolves the first public definition whose target builds `T`. When only
    /// private definitions build `T` this fails with [`DiError::PrivateService`].
    pub fn get_by_type<T: Service>(&self) -> DiResult<Arc<T>> {
        self.get_as::<T>(ServiceId::of::<T>())
    }

    pub(crate) fn get_internal(&self, id: &ServiceId, bypass_public: bool) -> DiResult<Instance> {
        InstanceManager::new(self).get(id, bypass_public)
    }

    // ----- Instance cache -----

    /// Stores a ready-made instance, typically for a synthetic definition.
    pub fn set(&self, id: &str, instance: Instance) {
        self.services.insert(self.resolve_alias(id), instance);
    }

    pub fn remove(&self, id: &str) -> Option<Instance> {
        self.services.remove(self.resolve_alias(id))
    }

    /// Whether an instance is cached for `id`.
    pub fn is_set(&self, id: &str) -> bool {
        self.services.contains(self.resolve_alias(id))
    }

    // ----- Compilation -----

    /// Registers a pass for `phase`. Lower priorities run first.
    pub fn add_compiler_pass(&mut self, pass: impl CompilerPass + 'static, phase: Phase, priority: i32) -> &mut Self {
        self.passes.register(Arc::new(pass), phase, priority);
        self
    }

    /// Registers an extension loaded at the start of [`compile`](Self::compile).
    pub fn register_extension(&mut self, extension: impl Extension + 'static) -> &mut Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    /// Runs extensions and all compiler phases, then freezes the container.
    /// Compiling a frozen container does nothing.
    pub async fn compile(&mut self) -> DiResult<()> {
        Compiler::new(self).run().await
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    // ----- Crate accessors -----

    pub(crate) fn definitions_map(&self) -> &IndexMap<String, Definition> {
        &self.definitions
    }

    pub(crate) fn services(&self) -> &InstanceCache {
        &self.services
    }

    pub(crate) fn locator(&self) -> Option<&Instance> {
        self.locator.as_ref()
    }

    pub(crate) fn extensions(&self) -> &[Arc<dyn Extension>] {
        &self.extensions
    }

    pub(crate) fn passes(&self) -> &PassConfig {
        &self.passes
    }

    pub(crate) fn passes_mut(&mut self) -> &mut PassConfig {
        &mut self.passes
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Human-readable summary of definitions, aliases and cached instances.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(out, "ContainerBuilder (frozen: {})", self.frozen);
        for (id, definition) in &self.definitions {
            let target = definition.target().map(Target::name).unwrap_or("<synthetic>");
            let mut flags = Vec::new();
            if !definition.is_public() {
                flags.push("private");
            }
            if !definition.is_shared() {
                flags.push("unshared");
            }
            if definition.is_lazy() {
                flags.push("lazy");
            }
            if definition.is_abstract() {
                flags.push("abstract");
            }
            if self.services.contains(id) {
                flags.push("built");
            }
            let _ = writeln!(out, "  {id}: {target} [{}]", flags.join(", "));
        }
        for (alias, id) in &self.aliases {
            let _ = writeln!(out, "  {alias} -> {id}");
        }
        out
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

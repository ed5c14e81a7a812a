//! Instance resolution.
//!
//! The [`InstanceManager`] turns a service id into a live instance: alias
//! lookup, visibility and abstractness checks, the sharing policy, and the
//! construction of a definition (factory, target + parent arguments,
//! properties, method calls). Argument lists are resolved recursively with
//! private services allowed, and every construction is tracked on a
//! [`ResolutionStack`] so dependency cycles fail with the full chain.

use std::sync::Arc;

use tracing::trace;

use crate::container::ContainerBuilder;
use crate::definition::{Definition, Factory, FactorySource};
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionStack;
use crate::key::ServiceId;
use crate::reference::{Argument, Reference};
use crate::service::Instance;
use crate::value::{Arguments, Literal, Value};

pub(crate) mod cache;

pub use cache::ServiceLocator;
pub(crate) use cache::InstanceCache;

/// Reserved id of the container itself when exposed as a service.
pub const SERVICE_CONTAINER_ID: &str = "service_container";

/// Resolves definitions of one container into instances.
pub(crate) struct InstanceManager<'c> {
    container: &'c ContainerBuilder,
}

impl<'c> InstanceManager<'c> {
    pub(crate) fn new(container: &'c ContainerBuilder) -> Self {
        Self { container }
    }

    /// Resolves `id`. External callers pass `bypass_public = false`.
    pub(crate) fn get(&self, id: &ServiceId, bypass_public: bool) -> DiResult<Instance> {
        let mut stack = ResolutionStack::default();
        self.resolve(id, bypass_public, &mut stack)
    }

    fn resolve(&self, id: &ServiceId, bypass_public: bool, stack: &mut ResolutionStack) -> DiResult<Instance> {
        let id = self.identify(id, bypass_public)?;

        if id == SERVICE_CONTAINER_ID {
            if let Some(locator) = self.container.locator() {
                return Ok(locator.clone());
            }
        }

        let Some(definition) = self.container.definitions_map().get(&id) else {
            return Err(self.not_found(&id));
        };

        if !definition.is_public() && !bypass_public {
            return Err(DiError::PrivateService { id });
        }
        if definition.is_abstract() {
            return Err(DiError::AbstractService { id });
        }
        if let Some(message) = definition.deprecated() {
            self.container.options().logger().warn(message);
        }
        if definition.target().is_none() && definition.factory().is_none() && !definition.is_synthetic() {
            return Err(self.not_found(&id));
        }

        if !definition.is_shared() {
            return self.instantiate(&id, definition, stack)?.ok_or_else(|| self.not_found(&id));
        }

        if let Some(instance) = self.container.services().get(&id) {
            return Ok(instance);
        }
        let instance = self.instantiate(&id, definition, stack)?.ok_or_else(|| self.not_found(&id))?;
        Ok(self.container.services().get_or_insert(&id, instance))
    }

    /// Maps an identifier to the canonical definition id. A type lookup from
    /// outside prefers the first public definition building that type.
    fn identify(&self, id: &ServiceId, bypass_public: bool) -> DiResult<String> {
        match id {
            ServiceId::Name(name) => {
                if name.trim().is_empty() {
                    return Err(DiError::InvalidIdentifier { id: name.clone() });
                }
                Ok(self.container.resolve_alias(name).to_owned())
            }
            ServiceId::Type(type_id, type_name) => {
                let mut candidates = self
                    .container
                    .definitions_map()
                    .iter()
                    .filter(|(_, definition)| definition.target().is_some_and(|target| target.type_id() == *type_id));
                let first = candidates.next();
                first
                    .filter(|(_, definition)| bypass_public || definition.is_public())
                    .or_else(|| candidates.find(|(_, definition)| definition.is_public()))
                    .or(first)
                    .map(|(id, _)| id.clone())
                    .ok_or_else(|| self.not_found(type_name))
            }
        }
    }

    fn not_found(&self, id: &str) -> DiError {
        self.container.options().logger().warn(&format!("Service {id} was not found in the container"));
        DiError::service_not_found(id)
    }

    /// Builds one instance of `definition`; `None` for a synthetic definition.
    fn instantiate(&self, id: &str, definition: &Definition, stack: &mut ResolutionStack) -> DiResult<Option<Instance>> {
        stack.within(id, |stack| {
            trace!(service = id, depth = stack.depth(), "constructing service");
            self.instance_from_definition(definition, stack)
        })
    }

    fn instance_from_definition(&self, definition: &Definition, stack: &mut ResolutionStack) -> DiResult<Option<Instance>> {
        if let Some(factory) = definition.factory() {
            let args = self.resolve_arguments(definition.arguments(), stack)?;
            return self.invoke_factory(factory, args, stack).map(Some);
        }
        if definition.is_synthetic() {
            return Ok(None);
        }
        let Some(target) = definition.target() else {
            return Ok(None);
        };

        let mut args = self.resolve_arguments(definition.arguments(), stack)?;
        if let Some(parent) = definition.parent() {
            args.extend(self.parent_arguments(parent, stack)?);
        }

        let mut service = target.construct(Arguments::new(args))?;
        for (name, argument) in definition.properties() {
            let value = self.resolve_argument(argument, stack)?;
            service.set_property(name, value)?;
        }
        for call in definition.method_calls() {
            let args = self.resolve_arguments(call.arguments(), stack)?;
            service.call(call.method(), Arguments::new(args))?;
        }
        Ok(Some(Arc::from(service)))
    }

    /// Resolved append arguments of the abstract parent `id`.
    fn parent_arguments(&self, id: &str, stack: &mut ResolutionStack) -> DiResult<Vec<Value>> {
        let id = self.container.resolve_alias(id);
        let parent = self
            .container
            .definitions_map()
            .get(id)
            .ok_or_else(|| DiError::definition_not_found(id))?;
        if !parent.is_abstract() {
            return Err(DiError::NotAbstractService { id: id.to_owned() });
        }
        self.resolve_arguments(parent.append_arguments(), stack)
    }

    fn invoke_factory(&self, factory: &Factory, args: Vec<Value>, stack: &mut ResolutionStack) -> DiResult<Instance> {
        match factory.source() {
            FactorySource::Target(target) => target.call_static(factory.method(), Arguments::new(args)),
            FactorySource::Reference(reference) => {
                let instance = self.resolve(&ServiceId::from(reference.id()), true, stack)?;
                let type_id = instance.concrete_type_id();
                let target = self
                    .container
                    .definitions_map()
                    .values()
                    .filter_map(Definition::target)
                    .find(|target| target.type_id() == type_id)
                    .ok_or_else(|| DiError::method_not_found(instance.type_name(), factory.method()))?;
                target.call_static(factory.method(), Arguments::new(args))
            }
        }
    }

    fn resolve_arguments(&self, arguments: &[Argument], stack: &mut ResolutionStack) -> DiResult<Vec<Value>> {
        arguments.iter().map(|argument| self.resolve_argument(argument, stack)).collect()
    }

    fn resolve_argument(&self, argument: &Argument, stack: &mut ResolutionStack) -> DiResult<Value> {
        match argument {
            Argument::Package(package) => self
                .container
                .options()
                .package_resolver()
                .resolve(package.id())
                .map(Value::Package),
            Argument::Tagged(tag) => {
                let ids: Vec<String> = self
                    .container
                    .find_tagged_service_ids(tag.name())
                    .map(|(id, _)| id.to_owned())
                    .collect();
                ids.iter()
                    .map(|id| self.resolve(&ServiceId::from(id), true, stack))
                    .collect::<DiResult<Vec<_>>>()
                    .map(Value::Services)
            }
            Argument::Reference(reference) => self.resolve_reference(reference, stack),
            Argument::Literal(literal) => Ok(Value::Literal(literal.clone())),
        }
    }

    fn resolve_reference(&self, reference: &Reference, stack: &mut ResolutionStack) -> DiResult<Value> {
        let locator = reference.id() == SERVICE_CONTAINER_ID && self.container.locator().is_some();
        if reference.is_nullable() && !locator && !self.container.has_definition(reference.id()) {
            return Ok(Value::Literal(Literal::Null));
        }
        self.resolve(&ServiceId::from(reference.id()), true, stack).map(Value::Service)
    }
}

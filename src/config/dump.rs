//! Emits a container's definitions as a [`ServicesConfig`].

use crate::config::loader::escape;
use crate::config::{CallConfig, FactoryConfig, ServiceConfig, ServiceEntry, ServicesConfig, TagConfig, TargetRegistry};
use crate::container::ContainerBuilder;
use crate::definition::{Definition, FactorySource};
use crate::error::{DiError, DiResult};
use crate::reference::Argument;
use crate::service::Target;
use crate::value::Literal;

/// Dumps parameters, definitions and aliases in registration order.
///
/// Loading the result with the same registry rebuilds an equivalent graph.
/// Every target must be registered in `registry`, otherwise the dump fails
/// with [`DiError::Config`].
pub fn dump(container: &ContainerBuilder, registry: &TargetRegistry) -> DiResult<ServicesConfig> {
    let mut config = ServicesConfig::default();
    for (key, value) in container.parameters() {
        config.parameters.insert(key.to_owned(), value.clone());
    }
    for (id, definition) in container.definitions() {
        let service = service_config(definition, registry)?;
        config.services.insert(id.to_owned(), ServiceEntry::Definition(Box::new(service)));
    }
    for (alias, id) in container.aliases() {
        config.services.insert(alias.to_owned(), ServiceEntry::Alias(format!("@{id}")));
    }
    Ok(config)
}

fn service_config(definition: &Definition, registry: &TargetRegistry) -> DiResult<ServiceConfig> {
    let class = definition.target().map(|target| class_name(target, registry)).transpose()?;
    let factory = match definition.factory() {
        None => None,
        Some(factory) => Some(match factory.source() {
            FactorySource::Target(target) => FactoryConfig {
                class: Some(class_name(target, registry)?),
                service: None,
                method: factory.method().to_owned(),
            },
            FactorySource::Reference(reference) => FactoryConfig {
                class: None,
                service: Some(format!("@{}", reference.id())),
                method: factory.method().to_owned(),
            },
        }),
    };

    Ok(ServiceConfig {
        class,
        arguments: definition.arguments().iter().map(argument).collect(),
        append_arguments: definition.append_arguments().iter().map(argument).collect(),
        properties: definition
            .properties()
            .map(|(name, value)| (name.to_owned(), argument(value)))
            .collect(),
        calls: definition
            .method_calls()
            .iter()
            .map(|call| CallConfig {
                method: call.method().to_owned(),
                arguments: call.arguments().iter().map(argument).collect(),
            })
            .collect(),
        tags: definition
            .tags()
            .iter()
            .map(|tag| TagConfig { name: tag.name().to_owned(), attributes: tag.attributes().clone() })
            .collect(),
        public: definition.is_public(),
        shared: definition.is_shared(),
        lazy: definition.is_lazy(),
        synthetic: definition.is_synthetic(),
        abstract_: definition.is_abstract(),
        deprecated: definition.deprecated().map(str::to_owned),
        parent: definition.parent().map(str::to_owned),
        decorates: definition.decorated_service().map(str::to_owned),
        decoration_priority: definition.decoration_priority(),
        factory,
    })
}

fn class_name(target: &Target, registry: &TargetRegistry) -> DiResult<String> {
    registry
        .name_of(target)
        .map(str::to_owned)
        .ok_or_else(|| DiError::Config { message: format!("no class registered for {}", target.name()) })
}

fn argument(value: &Argument) -> Literal {
    match value {
        Argument::Reference(reference) if reference.is_nullable() => Literal::String(format!("@?{}", reference.id())),
        Argument::Reference(reference) => Literal::String(format!("@{}", reference.id())),
        Argument::Tagged(tag) => Literal::String(format!("!tagged {}", tag.name())),
        Argument::Package(package) => Literal::String(format!("%{}", package.id())),
        Argument::Literal(Literal::String(text)) => Literal::String(escape(text)),
        Argument::Literal(literal) => literal.clone(),
    }
}

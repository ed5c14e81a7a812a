//! Applies a [`ServicesConfig`] to a container.

use tracing::debug;

use crate::config::{ServiceConfig, ServiceEntry, ServicesConfig, TargetRegistry};
use crate::container::ContainerBuilder;
use crate::definition::Definition;
use crate::error::{DiError, DiResult};
use crate::reference::{Argument, PackageReference, Reference, TagReference};
use crate::value::Literal;

const TAGGED_PREFIX: &str = "!tagged ";

/// Loads services maps into a container.
///
/// Parameters are applied first, so `%key%` placeholders may refer to any
/// parameter of the same map or one already set on the container.
///
/// ```
/// use ferrous_container::config::{ConfigLoader, TargetRegistry};
/// use ferrous_container::{Arguments, ContainerBuilder, Service, Target};
///
/// struct Transport(String);
/// impl Service for Transport {}
///
/// let registry = TargetRegistry::new()
///     .with_target("Transport", Target::new(|args: Arguments| Ok(Transport(args.str(0)?.to_owned()))));
///
/// let mut container = ContainerBuilder::new();
/// ConfigLoader::new(&registry)
///     .load_yaml(&mut container, r#"
/// parameters:
///   dsn: smtp://localhost
/// services:
///   transport:
///     class: Transport
///     arguments: ['%dsn%']
/// "#)
///     .unwrap();
///
/// assert_eq!(container.get_as::<Transport>("transport").unwrap().0, "smtp://localhost");
/// ```
pub struct ConfigLoader<'r> {
    registry: &'r TargetRegistry,
}

impl<'r> ConfigLoader<'r> {
    pub fn new(registry: &'r TargetRegistry) -> Self {
        Self { registry }
    }

    pub fn load_yaml(&self, container: &mut ContainerBuilder, source: &str) -> DiResult<()> {
        self.load(container, ServicesConfig::from_yaml(source)?)
    }

    pub fn load_json(&self, container: &mut ContainerBuilder, source: &str) -> DiResult<()> {
        self.load(container, ServicesConfig::from_json(source)?)
    }

    pub fn load(&self, container: &mut ContainerBuilder, config: ServicesConfig) -> DiResult<()> {
        for (key, value) in config.parameters {
            container.set_parameter(key, value)?;
        }

        let mut aliases = Vec::new();
        for (id, entry) in config.services {
            match entry {
                ServiceEntry::Alias(target) => aliases.push((id, target)),
                ServiceEntry::Definition(service) => {
                    let definition = self.definition(container, &service)?;
                    container.set_definition(id, definition)?;
                }
            }
        }
        for (alias, target) in aliases {
            let target = target.strip_prefix('@').unwrap_or(&target).to_owned();
            container.set_alias(alias, target)?;
        }

        debug!(definitions = container.definitions().count(), "services map loaded");
        Ok(())
    }

    fn definition(&self, container: &ContainerBuilder, service: &ServiceConfig) -> DiResult<Definition> {
        let target = service
            .class
            .as_deref()
            .map(|class| self.registry.get(class).cloned())
            .transpose()?;
        let mut definition = Definition::new(target);

        for argument in &service.arguments {
            definition.add_argument(parse_argument(container, argument)?);
        }
        for argument in &service.append_arguments {
            definition.add_append_argument(parse_argument(container, argument)?);
        }
        for (name, value) in &service.properties {
            definition.add_property(name.as_str(), parse_argument(container, value)?);
        }
        for call in &service.calls {
            let arguments = call
                .arguments
                .iter()
                .map(|argument| parse_argument(container, argument))
                .collect::<DiResult<Vec<_>>>()?;
            definition.add_method_call(call.method.as_str(), arguments)?;
        }
        for tag in &service.tags {
            definition.add_tag(tag.name.as_str(), Literal::Map(tag.attributes.clone()))?;
        }

        if let Some(factory) = &service.factory {
            match (&factory.class, &factory.service) {
                (Some(class), None) => {
                    definition.set_factory(self.registry.get(class)?.clone(), factory.method.as_str());
                }
                (None, Some(service)) => {
                    let id = service.strip_prefix('@').unwrap_or(service);
                    definition.set_factory(Reference::new(id), factory.method.as_str());
                }
                _ => {
                    return Err(DiError::Config {
                        message: format!("factory {} needs exactly one of class or service", factory.method),
                    })
                }
            }
        }

        definition
            .set_public(service.public)
            .set_shared(service.shared)
            .set_lazy(service.lazy)
            .set_abstract(service.abstract_);
        if service.synthetic {
            definition.set_synthetic(true);
        }
        if let Some(message) = &service.deprecated {
            definition.set_deprecated(message.as_str());
        }
        if let Some(parent) = &service.parent {
            definition.set_parent(parent.as_str());
        }
        if let Some(decorated) = &service.decorates {
            definition.set_decorated_service(decorated.as_str(), service.decoration_priority);
        }
        Ok(definition)
    }
}

/// Parses one argument of a services map.
pub fn parse_argument(container: &ContainerBuilder, value: &Literal) -> DiResult<Argument> {
    let Literal::String(text) = value else {
        return Ok(Argument::Literal(value.clone()));
    };

    if let Some(escaped) = unescape(text) {
        return Ok(Argument::Literal(Literal::String(escaped.to_owned())));
    }
    if let Some(id) = text.strip_prefix("@?") {
        return Ok(Reference::nullable(id).into());
    }
    if let Some(id) = text.strip_prefix('@') {
        return Ok(Reference::new(id).into());
    }
    if let Some(name) = text.strip_prefix(TAGGED_PREFIX) {
        return Ok(TagReference::new(name.trim()).into());
    }
    if let Some(name) = text.strip_prefix("%env(").and_then(|rest| rest.strip_suffix(")%")) {
        let value = std::env::var(name).map_err(|_| DiError::ParameterNotFound { key: format!("env({name})") })?;
        return Ok(Argument::Literal(Literal::String(value)));
    }
    if let Some(key) = text.strip_prefix('%').and_then(|rest| rest.strip_suffix('%')) {
        return Ok(Argument::Literal(container.get_parameter(key)?.clone()));
    }
    if let Some(package) = text.strip_prefix('%') {
        return Ok(PackageReference::new(package).into());
    }
    Ok(Argument::Literal(value.clone()))
}

/// `@@x`, `%%x` and `!!x` stand for the literal `@x`, `%x` and `!x`.
fn unescape(text: &str) -> Option<&str> {
    ["@@", "%%", "!!"]
        .iter()
        .find(|prefix| text.starts_with(*prefix))
        .map(|_| &text[1..])
}

/// Inverse of [`unescape`] for literal strings.
pub(crate) fn escape(text: &str) -> String {
    match text.chars().next() {
        Some(first @ ('@' | '%' | '!')) => format!("{first}{text}"),
        _ => text.to_owned(),
    }
}

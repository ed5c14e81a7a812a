use async_trait::async_trait;
use tracing::debug;

use crate::compiler::CompilerPass;
use crate::container::ContainerBuilder;
use crate::error::{DiError, DiResult};

/// Rewires decorators onto the services they decorate.
///
/// For a decorator `d` of `x` the current definition of `x` moves to
/// `d.inner`, the decorator takes the place of `x`, and `d` becomes an alias
/// of `x`. An instance of `x` built before compilation moves along with its
/// definition. Decorators apply by ascending priority, so the lowest priority
/// ends up innermost.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoratePass;

#[async_trait]
impl CompilerPass for DecoratePass {
    async fn process(&self, container: &mut ContainerBuilder) -> DiResult<()> {
        let mut decorators: Vec<(String, String, i32)> = container
            .definitions()
            .filter_map(|(id, definition)| {
                definition
                    .decorated_service()
                    .map(|decorated| (id.to_owned(), decorated.to_owned(), definition.decoration_priority()))
            })
            .collect();
        decorators.sort_by_key(|(_, _, priority)| *priority);

        for (id, decorated, priority) in decorators {
            let decorated = container.resolve_alias(&decorated).to_owned();
            let original = container.get_definition(&decorated)?.clone();
            let inner = format!("{id}.inner");
            container.set_definition(inner.clone(), original)?;
            if let Some(instance) = container.services().remove(&decorated) {
                container.services().insert(inner, instance);
            }

            let mut decorator = container
                .remove_definition(&id)
                .ok_or_else(|| DiError::definition_not_found(id.as_str()))?;
            decorator.clear_decoration().set_public(true);
            container.set_definition(decorated.clone(), decorator)?;
            container.set_alias(id.as_str(), decorated.as_str())?;
            container.services().remove(&id);

            debug!(decorator = %id, service = %decorated, priority, "service decorated");
        }
        Ok(())
    }
}

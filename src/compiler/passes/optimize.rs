use async_trait::async_trait;
use tracing::debug;

use crate::compiler::CompilerPass;
use crate::container::ContainerBuilder;
use crate::error::DiResult;
use crate::key::ServiceId;

/// Builds every eager shared service, then freezes the container.
///
/// Lazy, abstract, synthetic and unshared definitions are skipped, as are
/// services that already have an instance. Private services are built too.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizePass;

#[async_trait]
impl CompilerPass for OptimizePass {
    async fn process(&self, container: &mut ContainerBuilder) -> DiResult<()> {
        let eager: Vec<String> = container
            .definitions()
            .filter(|(id, definition)| {
                definition.is_shared()
                    && !definition.is_lazy()
                    && !definition.is_abstract()
                    && !definition.is_synthetic()
                    && !container.services().contains(id)
            })
            .map(|(id, _)| id.to_owned())
            .collect();

        debug!(count = eager.len(), "building eager services");
        for id in eager {
            container.get_internal(&ServiceId::from(id), true)?;
        }

        container.freeze();
        Ok(())
    }
}

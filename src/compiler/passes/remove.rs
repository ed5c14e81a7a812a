use async_trait::async_trait;
use tracing::debug;

use crate::compiler::CompilerPass;
use crate::container::ContainerBuilder;
use crate::error::DiResult;

/// Drops private definitions. Instances already built for them stay cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemovePass;

#[async_trait]
impl CompilerPass for RemovePass {
    async fn process(&self, container: &mut ContainerBuilder) -> DiResult<()> {
        let private: Vec<String> = container
            .definitions()
            .filter(|(_, definition)| !definition.is_public())
            .map(|(id, _)| id.to_owned())
            .collect();

        for id in &private {
            container.remove_definition(id);
        }
        debug!(removed = private.len(), "private definitions removed");
        Ok(())
    }
}

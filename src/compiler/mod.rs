//! Container compilation.
//!
//! Compiling loads every registered [`Extension`](crate::Extension), runs the
//! five [`Phase`]s in order and freezes the container. A phase without
//! registered passes runs its configured default (see [`DefaultPasses`]).

use std::sync::Arc;

use tracing::debug;

use crate::container::ContainerBuilder;
use crate::error::DiResult;

pub mod pass;
pub mod passes;

pub use pass::{CompilerPass, DefaultPasses, Phase};
pub(crate) use pass::PassConfig;

/// Drives one compilation of a container.
///
/// Extensions receive the compiler in [`Extension::load`](crate::Extension::load)
/// and may register passes or definitions through it.
pub struct Compiler<'c> {
    container: &'c mut ContainerBuilder,
}

impl<'c> Compiler<'c> {
    pub fn new(container: &'c mut ContainerBuilder) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &ContainerBuilder {
        self.container
    }

    pub fn container_mut(&mut self) -> &mut ContainerBuilder {
        self.container
    }

    /// Registers a pass on the compiled container.
    pub fn add_pass(&mut self, pass: impl CompilerPass + 'static, phase: Phase, priority: i32) -> &mut Self {
        self.container.passes_mut().register(Arc::new(pass), phase, priority);
        self
    }

    /// Loads extensions, runs every phase and freezes the container.
    pub async fn run(&mut self) -> DiResult<()> {
        if self.container.is_frozen() {
            debug!("container already compiled, skipping");
            return Ok(());
        }

        let extensions = self.container.extensions().to_vec();
        for extension in &extensions {
            extension.load(self)?;
        }
        debug!(extensions = extensions.len(), "extensions loaded");

        for phase in Phase::ALL {
            self.run_phase(phase).await?;
        }

        self.container.freeze();
        debug!("container compiled");
        Ok(())
    }

    async fn run_phase(&mut self, phase: Phase) -> DiResult<()> {
        let mut passes = self.container.passes().passes(phase);
        if passes.is_empty() {
            passes.extend(self.container.options().default_passes().for_phase(phase));
        }

        debug!(%phase, passes = passes.len(), "running compiler phase");
        for pass in passes {
            pass.process(self.container).await?;
        }
        Ok(())
    }
}

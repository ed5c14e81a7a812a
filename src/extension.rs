//! Extensions: reusable bundles of definitions and compiler passes.

use crate::compiler::Compiler;
use crate::error::DiResult;

/// Loaded once at the start of compilation, before any phase runs.
///
/// # Example
///
/// ```rust
/// use ferrous_container::{Compiler, ContainerBuilder, DiResult, Extension, Service, Target};
///
/// struct Clock;
/// impl Service for Clock {}
///
/// struct ClockExtension;
///
/// impl Extension for ClockExtension {
///     fn load(&self, compiler: &mut Compiler<'_>) -> DiResult<()> {
///         compiler
///             .container_mut()
///             .register("clock", Target::new(|_| Ok(Clock)))?;
///         Ok(())
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> DiResult<()> {
/// let mut container = ContainerBuilder::new();
/// container.register_extension(ClockExtension);
/// container.compile().await?;
/// assert!(container.get("clock")?.is::<Clock>());
/// # Ok(())
/// # }
/// ```
pub trait Extension: Send + Sync {
    fn load(&self, compiler: &mut Compiler<'_>) -> DiResult<()>;
}

//! Built-in compiler passes.

mod decorate;
mod optimize;
mod remove;

pub use decorate::DecoratePass;
pub use optimize::OptimizePass;
pub use remove::RemovePass;

//! Circular dependency detection infrastructure.

use crate::error::{DiError, DiResult};

/// Ids currently under construction on the active resolution path.
///
/// Pushed before a definition is built and popped once it returns, so a
/// second push of an id that is still on the stack is a cycle. The error
/// carries the complete chain, e.g. `a -> b -> a`.
#[derive(Debug, Default)]
pub(crate) struct ResolutionStack {
    stack: Vec<String>,
}

impl ResolutionStack {
    /// Enters `id`, failing if it is already being constructed.
    pub(crate) fn push(&mut self, id: &str) -> DiResult<()> {
        // Circular detection BEFORE pushing the new id
        if let Some(start) = self.stack.iter().position(|entry| entry == id) {
            let mut path = self.stack[start..].to_vec();
            path.push(id.to_owned());
            return Err(DiError::CircularReference { path });
        }
        self.stack.push(id.to_owned());
        Ok(())
    }

    pub(crate) fn pop(&mut self, id: &str) {
        let last = self.stack.pop();
        debug_assert_eq!(last.as_deref(), Some(id));
    }

    /// Runs `f` with `id` on the stack, popping it whatever the outcome.
    pub(crate) fn within<T, F>(&mut self, id: &str, f: F) -> DiResult<T>
    where
        F: FnOnce(&mut Self) -> DiResult<T>,
    {
        self.push(id)?;
        let result = f(self);
        self.pop(id);
        result
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

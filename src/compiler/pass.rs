//! Compiler passes and the five-phase registry.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::compiler::passes::{DecoratePass, OptimizePass, RemovePass};
use crate::container::ContainerBuilder;
use crate::error::{DiError, DiResult};

/// A transformation over the full definition set, run during one [`Phase`].
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use ferrous_container::{CompilerPass, ContainerBuilder, DiResult, Phase};
///
/// /// Makes every service lazy.
/// struct LazyEverything;
///
/// #[async_trait]
/// impl CompilerPass for LazyEverything {
///     async fn process(&self, container: &mut ContainerBuilder) -> DiResult<()> {
///         let ids: Vec<String> = container.definitions().map(|(id, _)| id.to_owned()).collect();
///         for id in ids {
///             container.get_definition_mut(&id)?.set_lazy(true);
///         }
///         Ok(())
///     }
/// }
///
/// let mut container = ContainerBuilder::new();
/// container.add_compiler_pass(LazyEverything, Phase::BeforeOptimization, 0);
/// ```
#[async_trait]
pub trait CompilerPass: Send + Sync {
    async fn process(&self, container: &mut ContainerBuilder) -> DiResult<()>;
}

/// Compiler phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    BeforeOptimization,
    Optimize,
    BeforeRemoving,
    Remove,
    AfterRemoving,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::BeforeOptimization,
        Phase::Optimize,
        Phase::BeforeRemoving,
        Phase::Remove,
        Phase::AfterRemoving,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BeforeOptimization => "before_optimization",
            Phase::Optimize => "optimize",
            Phase::BeforeRemoving => "before_removing",
            Phase::Remove => "remove",
            Phase::AfterRemoving => "after_removing",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = DiError;

    /// Accepts snake_case and camelCase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before_optimization" | "beforeOptimization" => Ok(Phase::BeforeOptimization),
            "optimize" => Ok(Phase::Optimize),
            "before_removing" | "beforeRemoving" => Ok(Phase::BeforeRemoving),
            "remove" => Ok(Phase::Remove),
            "after_removing" | "afterRemoving" => Ok(Phase::AfterRemoving),
            other => Err(DiError::InvalidPhase { phase: other.to_owned() }),
        }
    }
}

#[derive(Clone)]
struct RegisteredPass {
    priority: i32,
    sequence: u64,
    pass: Arc<dyn CompilerPass>,
}

/// Passes registered per phase.
///
/// Within a phase passes run by ascending priority; equal priorities keep
/// registration order.
#[derive(Clone, Default)]
pub(crate) struct PassConfig {
    phases: [Vec<RegisteredPass>; 5],
    next_sequence: u64,
}

impl PassConfig {
    pub(crate) fn register(&mut self, pass: Arc<dyn CompilerPass>, phase: Phase, priority: i32) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.phases[phase.index()].push(RegisteredPass { priority, sequence, pass });
    }

    /// Passes of `phase` in execution order.
    pub(crate) fn passes(&self, phase: Phase) -> Vec<Arc<dyn CompilerPass>> {
        let mut entries: Vec<&RegisteredPass> = self.phases[phase.index()].iter().collect();
        entries.sort_by_key(|entry| (entry.priority, entry.sequence));
        entries.into_iter().map(|entry| entry.pass.clone()).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self, phase: Phase) -> usize {
        self.phases[phase.index()].len()
    }
}

/// Passes run for a phase that has nothing registered.
///
/// The defaults decorate before optimization, eagerly build and freeze during
/// optimize, and prune private definitions during remove. Any slot can be
/// replaced or cleared.
#[derive(Clone)]
pub struct DefaultPasses {
    before_optimization: Option<Arc<dyn CompilerPass>>,
    optimize: Option<Arc<dyn CompilerPass>>,
    before_removing: Option<Arc<dyn CompilerPass>>,
    remove: Option<Arc<dyn CompilerPass>>,
    after_removing: Option<Arc<dyn CompilerPass>>,
}

impl DefaultPasses {
    /// No default pass for any phase.
    pub fn none() -> Self {
        Self {
            before_optimization: None,
            optimize: None,
            before_removing: None,
            remove: None,
            after_removing: None,
        }
    }

    /// Sets (or clears) the default of `phase`.
    pub fn with(mut self, phase: Phase, pass: Option<Arc<dyn CompilerPass>>) -> Self {
        *self.slot_mut(phase) = pass;
        self
    }

    pub fn for_phase(&self, phase: Phase) -> Option<Arc<dyn CompilerPass>> {
        match phase {
            Phase::BeforeOptimization => self.before_optimization.clone(),
            Phase::Optimize => self.optimize.clone(),
            Phase::BeforeRemoving => self.before_removing.clone(),
            Phase::Remove => self.remove.clone(),
            Phase::AfterRemoving => self.after_removing.clone(),
        }
    }

    fn slot_mut(&mut self, phase: Phase) -> &mut Option<Arc<dyn CompilerPass>> {
        match phase {
            Phase::BeforeOptimization => &mut self.before_optimization,
            Phase::Optimize => &mut self.optimize,
            Phase::BeforeRemoving => &mut self.before_removing,
            Phase::Remove => &mut self.remove,
            Phase::AfterRemoving => &mut self.after_removing,
        }
    }
}

impl Default for DefaultPasses {
    fn default() -> Self {
        Self::none()
            .with(Phase::BeforeOptimization, Some(Arc::new(DecoratePass)))
            .with(Phase::Optimize, Some(Arc::new(OptimizePass)))
            .with(Phase::Remove, Some(Arc::new(RemovePass)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Named(&'static str, Arc<Mutex<Vec<&'static str>>>);

    #[async_trait]
    impl CompilerPass for Named {
        async fn process(&self, _container: &mut ContainerBuilder) -> DiResult<()> {
            self.1.lock().unwrap().push(self.0);
            Ok(())
        }
    }

    #[test]
    fn phase_names_round_trip() {
        for phase in Phase::ALL {
            assert_eq!(phase.as_str().parse::<Phase>().unwrap(), phase);
        }
        assert_eq!("afterRemoving".parse::<Phase>().unwrap(), Phase::AfterRemoving);
        assert_eq!(
            "cleanup".parse::<Phase>().unwrap_err(),
            DiError::InvalidPhase { phase: "cleanup".into() }
        );
    }

    #[tokio::test]
    async fn priority_then_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut config = PassConfig::default();
        config.register(Arc::new(Named("late", log.clone())), Phase::Optimize, 10);
        config.register(Arc::new(Named("first", log.clone())), Phase::Optimize, 1);
        config.register(Arc::new(Named("second", log.clone())), Phase::Optimize, 1);
        config.register(Arc::new(Named("other-phase", log.clone())), Phase::Remove, 0);

        assert_eq!(config.len(Phase::Optimize), 3);
        let mut container = ContainerBuilder::new();
        for pass in config.passes(Phase::Optimize) {
            pass.process(&mut container).await.unwrap();
        }
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "late"]);
    }

    #[test]
    fn default_passes_cover_three_phases() {
        let defaults = DefaultPasses::default();
        assert!(defaults.for_phase(Phase::BeforeOptimization).is_some());
        assert!(defaults.for_phase(Phase::Optimize).is_some());
        assert!(defaults.for_phase(Phase::BeforeRemoving).is_none());
        assert!(defaults.for_phase(Phase::Remove).is_some());
        assert!(defaults.for_phase(Phase::AfterRemoving).is_none());
        assert!(DefaultPasses::none().with(Phase::Optimize, None).for_phase(Phase::Optimize).is_none());
    }
}

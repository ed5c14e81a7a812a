use async_trait::async_trait;
use ferrous_container::{
    Compiler, CompilerPass, ContainerBuilder, ContainerOptions, DefaultPasses, DiError, DiResult, Extension, Phase,
    Service, Target,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct Clock;
impl Service for Clock {}

type Log = Arc<Mutex<Vec<String>>>;

struct Recording {
    name: &'static str,
    log: Log,
}

#[async_trait]
impl CompilerPass for Recording {
    async fn process(&self, container: &mut ContainerBuilder) -> DiResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, container.is_frozen()));
        Ok(())
    }
}

fn recording(name: &'static str, log: &Log) -> Recording {
    Recording { name, log: log.clone() }
}

struct Failing;

#[async_trait]
impl CompilerPass for Failing {
    async fn process(&self, _container: &mut ContainerBuilder) -> DiResult<()> {
        Err(DiError::InvalidPhase { phase: "failing".into() })
    }
}

#[tokio::test]
async fn test_register_after_compile_is_frozen() {
    let mut container = ContainerBuilder::new();
    container.compile().await.unwrap();

    assert!(container.is_frozen());
    assert_eq!(
        container.register("clock", Target::new(|_| Ok(Clock))).unwrap_err(),
        DiError::FrozenContainer { id: "clock".into() }
    );
}

#[tokio::test]
async fn test_alias_after_compile_is_frozen() {
    let mut container = ContainerBuilder::new();
    container.register("clock", Target::new(|_| Ok(Clock))).unwrap();
    container.compile().await.unwrap();

    assert_eq!(
        container.set_alias("clock", "time").unwrap_err(),
        DiError::FrozenContainer { id: "clock".into() }
    );
    assert!(container.has_definition("clock"));
    assert!(!container.has_alias("clock"));
}

#[tokio::test]
async fn test_phases_run_in_order() {
    let log: Log = Arc::default();
    let mut container = ContainerBuilder::new();
    container
        .add_compiler_pass(recording("after_removing", &log), Phase::AfterRemoving, 0)
        .add_compiler_pass(recording("remove", &log), Phase::Remove, 0)
        .add_compiler_pass(recording("before_removing", &log), Phase::BeforeRemoving, 0)
        .add_compiler_pass(recording("optimize", &log), Phase::Optimize, 0)
        .add_compiler_pass(recording("before_optimization", &log), Phase::BeforeOptimization, 0);

    container.compile().await.unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "before_optimization:false",
            "optimize:false",
            "before_removing:false",
            "remove:false",
            "after_removing:false",
        ]
    );
    // a custom optimize pass replaces the default, yet compile still freezes
    assert!(container.is_frozen());
}

#[tokio::test]
async fn test_priority_ordering_within_a_phase() {
    let log: Log = Arc::default();
    let mut container = ContainerBuilder::new();
    container
        .add_compiler_pass(recording("c", &log), Phase::BeforeRemoving, 20)
        .add_compiler_pass(recording("a", &log), Phase::BeforeRemoving, -5)
        .add_compiler_pass(recording("b1", &log), Phase::BeforeRemoving, 0)
        .add_compiler_pass(recording("b2", &log), Phase::BeforeRemoving, 0);

    container.compile().await.unwrap();

    // the default optimize pass froze the container before this phase
    assert_eq!(*log.lock().unwrap(), vec!["a:true", "b1:true", "b2:true", "c:true"]);
}

#[tokio::test]
async fn test_failing_pass_aborts_compilation() {
    let log: Log = Arc::default();
    let mut container = ContainerBuilder::new();
    container
        .add_compiler_pass(Failing, Phase::BeforeOptimization, 0)
        .add_compiler_pass(recording("never", &log), Phase::AfterRemoving, 0);

    assert!(container.compile().await.is_err());
    assert!(log.lock().unwrap().is_empty());
    assert!(!container.is_frozen());
}

#[tokio::test]
async fn test_compile_is_idempotent() {
    let log: Log = Arc::default();
    let mut container = ContainerBuilder::new();
    container.add_compiler_pass(recording("once", &log), Phase::AfterRemoving, 0);

    container.compile().await.unwrap();
    container.compile().await.unwrap();

    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_optimize_builds_eager_services_only() {
    let built = Arc::new(AtomicUsize::new(0));
    let target = {
        let built = built.clone();
        move || {
            let built = built.clone();
            Target::new(move |_| {
                built.fetch_add(1, Ordering::SeqCst);
                Ok(Clock)
            })
        }
    };

    let mut container = ContainerBuilder::new();
    container.register("eager", target()).unwrap();
    container.register("private", target()).unwrap().set_public(false);
    container.register("lazy", target()).unwrap().set_lazy(true);
    container.register("unshared", target()).unwrap().set_shared(false);
    container.register("template", target()).unwrap().set_abstract(true);
    container.register_synthetic("request").unwrap();

    container.compile().await.unwrap();

    assert_eq!(built.load(Ordering::SeqCst), 2);
    assert!(container.is_set("eager"));
    assert!(container.is_set("private"));
    assert!(!container.is_set("lazy"));

    container.get("lazy").unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_remove_prunes_private_definitions() {
    let mut container = ContainerBuilder::new();
    container.register("public", Target::new(|_| Ok(Clock))).unwrap().tag("clock");
    container
        .register("private", Target::new(|_| Ok(Clock)))
        .unwrap()
        .tag("clock")
        .set_public(false);

    container.compile().await.unwrap();

    assert!(container.has_definition("public"));
    assert!(!container.has_definition("private"));
    let tagged: Vec<&str> = container.find_tagged_service_ids("clock").map(|(id, _)| id).collect();
    assert_eq!(tagged, vec!["public"]);
}

#[tokio::test]
async fn test_abstract_after_compile() {
    let mut container = ContainerBuilder::new();
    container.register("base", Target::new(|_| Ok(Clock))).unwrap().set_abstract(true);

    container.compile().await.unwrap();

    assert_eq!(
        container.get("base").unwrap_err(),
        DiError::AbstractService { id: "base".into() }
    );
}

#[tokio::test]
async fn test_default_passes_can_be_disabled() {
    let options = ContainerOptions::new().with_default_passes(DefaultPasses::none());
    let mut container = ContainerBuilder::with_options(options);
    container.register("hidden", Target::new(|_| Ok(Clock))).unwrap().set_public(false);

    container.compile().await.unwrap();

    assert!(container.is_frozen());
    assert!(container.has_definition("hidden"));
    assert!(!container.is_set("hidden"));
}

#[test]
fn test_phase_names() {
    assert_eq!("beforeOptimization".parse::<Phase>().unwrap(), Phase::BeforeOptimization);
    assert_eq!("after_removing".parse::<Phase>().unwrap(), Phase::AfterRemoving);
    let err = "cleanup".parse::<Phase>().unwrap_err();
    assert_eq!(err, DiError::InvalidPhase { phase: "cleanup".into() });
    assert_eq!(err.to_string(), "Invalid compiler pass phase: cleanup");
}

struct ClockExtension {
    log: Log,
}

impl Extension for ClockExtension {
    fn load(&self, compiler: &mut Compiler<'_>) -> DiResult<()> {
        compiler
            .container_mut()
            .register("clock", Target::new(|_| Ok(Clock)))?
            .set_public(false);
        compiler.add_pass(recording("extension", &self.log), Phase::AfterRemoving, 0);
        Ok(())
    }
}

#[tokio::test]
async fn test_extensions_load_before_phases() {
    let log: Log = Arc::default();
    let mut container = ContainerBuilder::new();
    container.register_extension(ClockExtension { log: log.clone() });

    container.compile().await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["extension:true"]);
    // private, yet built eagerly before being pruned
    assert!(container.is_set("clock"));
    assert!(!container.has_definition("clock"));
}

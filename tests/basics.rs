use ferrous_container::{
    Arguments, ContainerBuilder, ContainerOptions, DiError, Literal, PackageRegistry, Reference, Service, ServiceId,
    ServiceLocator, Target, TagReference, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Config {
    port: i64,
}
impl Service for Config {}

#[derive(Debug)]
struct Server {
    config: Arc<Config>,
    name: String,
}
impl Service for Server {}

fn config_target() -> Target {
    Target::new(|args: Arguments| Ok(Config { port: args.int(0)? }))
}

fn server_target() -> Target {
    Target::new(|args: Arguments| {
        Ok(Server {
            config: args.service(0)?,
            name: args.str(1)?.to_owned(),
        })
    })
}

#[test]
fn test_unknown_id_is_not_found() {
    let container = ContainerBuilder::new();
    let err = container.get("foo").unwrap_err();
    assert_eq!(err, DiError::ServiceNotFound { id: "foo".into() });
    assert_eq!(err.to_string(), "Service not found: foo");
}

#[test]
fn test_reference_injection_and_literals() {
    let mut container = ContainerBuilder::new();
    container.register("config", config_target()).unwrap().add_argument(8080);
    container
        .register("server", server_target())
        .unwrap()
        .add_argument(Reference::new("config"))
        .add_argument("MyServer");

    let server = container.get_as::<Server>("server").unwrap();
    let config = container.get_as::<Config>("config").unwrap();

    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
    assert!(Arc::ptr_eq(&server.config, &config));
}

#[test]
fn test_shared_and_unshared() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();

    let mut container = ContainerBuilder::new();
    container.register(
        "shared",
        Target::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Config { port: 1 })
        }),
    ).unwrap();
    container.register("fresh", config_target()).unwrap().add_argument(2).set_shared(false);

    let a = container.get("shared").unwrap();
    let b = container.get("shared").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(built.load(Ordering::SeqCst), 1);

    let c = container.get("fresh").unwrap();
    let d = container.get("fresh").unwrap();
    assert!(!Arc::ptr_eq(&c, &d));
    assert!(!container.is_set("fresh"));
}

#[test]
fn test_private_services_are_injectable_only() {
    let mut container = ContainerBuilder::new();
    container.register("config", config_target()).unwrap().add_argument(80).set_public(false);
    container
        .register("server", server_target())
        .unwrap()
        .add_argument(Reference::new("config"))
        .add_argument("web");

    assert_eq!(
        container.get("config").unwrap_err(),
        DiError::PrivateService { id: "config".into() }
    );
    assert_eq!(container.get_as::<Server>("server").unwrap().config.port, 80);
}

#[test]
fn test_abstract_services_cannot_be_built() {
    let mut container = ContainerBuilder::new();
    container.register("base", config_target()).unwrap().set_abstract(true);
    assert_eq!(
        container.get("base").unwrap_err(),
        DiError::AbstractService { id: "base".into() }
    );
}

#[test]
fn test_nullable_reference_to_missing_service() {
    struct Notifier {
        logger: Option<Arc<Config>>,
    }
    impl Service for Notifier {}

    let mut container = ContainerBuilder::new();
    container
        .register(
            "notifier",
            Target::new(|args: Arguments| Ok(Notifier { logger: args.optional_service(0)? })),
        )
        .unwrap()
        .add_argument(Reference::nullable("logger"));

    assert!(container.get_as::<Notifier>("notifier").unwrap().logger.is_none());
}

#[test]
fn test_missing_reference_fails() {
    let mut container = ContainerBuilder::new();
    container
        .register("server", server_target())
        .unwrap()
        .add_argument(Reference::new("config"))
        .add_argument("web");

    assert_eq!(
        container.get("server").unwrap_err(),
        DiError::ServiceNotFound { id: "config".into() }
    );
}

#[test]
fn test_aliases() {
    let mut container = ContainerBuilder::new();
    container.register("config", config_target()).unwrap().add_argument(1);
    container.set_alias("settings", "config").unwrap();

    assert!(container.has_alias("settings"));
    assert_eq!(container.get_alias("settings"), Some("config"));
    let a = container.get("settings").unwrap();
    let b = container.get("config").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_get_by_type() {
    let mut container = ContainerBuilder::new();
    container.register("config", config_target()).unwrap().add_argument(9);

    assert_eq!(container.get_by_type::<Config>().unwrap().port, 9);
    assert!(matches!(
        container.get(ServiceId::of::<Server>()),
        Err(DiError::ServiceNotFound { .. })
    ));
}

#[test]
fn test_get_by_type_skips_private_definitions() {
    let mut container = ContainerBuilder::new();
    container.register("internal", config_target()).unwrap().add_argument(1).set_public(false);
    container.register("public", config_target()).unwrap().add_argument(2);

    assert_eq!(container.get_by_type::<Config>().unwrap().port, 2);

    let mut hidden = ContainerBuilder::new();
    hidden.register("internal", config_target()).unwrap().add_argument(1).set_public(false);
    assert_eq!(
        hidden.get_by_type::<Config>().unwrap_err(),
        DiError::PrivateService { id: "internal".into() }
    );
}

#[test]
fn test_get_as_type_mismatch() {
    let mut container = ContainerBuilder::new();
    container.register("config", config_target()).unwrap().add_argument(9);

    let err = container.get_as::<Server>("config").unwrap_err();
    assert!(matches!(err, DiError::TypeMismatch { ref id, .. } if id == "config"));
}

#[test]
fn test_synthetic_services() {
    let mut container = ContainerBuilder::new();
    container.register_synthetic("request").unwrap();

    assert!(matches!(container.get("request"), Err(DiError::ServiceNotFound { .. })));

    container.set("request", Arc::new(Config { port: 443 }));
    assert!(container.is_set("request"));
    assert_eq!(container.get_as::<Config>("request").unwrap().port, 443);

    assert!(container.remove("request").is_some());
    assert!(!container.is_set("request"));
}

#[test]
fn test_tagged_arguments_follow_definition_order() {
    struct Listener(&'static str);
    impl Service for Listener {}

    struct Dispatcher {
        listeners: Vec<Arc<Listener>>,
    }
    impl Service for Dispatcher {}

    let mut container = ContainerBuilder::new();
    container.register("b", Target::new(|_| Ok(Listener("b")))).unwrap().tag("listener");
    container.register("unrelated", Target::new(|_| Ok(Listener("x")))).unwrap();
    container
        .register("a", Target::new(|_| Ok(Listener("a"))))
        .unwrap()
        .tag("listener")
        .set_public(false);
    container
        .register("dispatcher", Target::new(|args: Arguments| Ok(Dispatcher { listeners: args.services(0)? })))
        .unwrap()
        .add_argument(TagReference::new("listener"));

    let dispatcher = container.get_as::<Dispatcher>("dispatcher").unwrap();
    let names: Vec<&str> = dispatcher.listeners.iter().map(|l| l.0).collect();
    assert_eq!(names, vec!["b", "a"]);

    let tagged: Vec<&str> = container.find_tagged_service_ids("listener").map(|(id, _)| id).collect();
    assert_eq!(tagged, vec!["b", "a"]);
}

#[test]
fn test_package_arguments() {
    struct Storage {
        root: Arc<String>,
    }
    impl Service for Storage {}

    let packages = PackageRegistry::new().with_package("fs", String::from("/srv/data"));
    let mut container = ContainerBuilder::with_options(ContainerOptions::new().with_package_resolver(Arc::new(packages)));
    container
        .register("storage", Target::new(|args: Arguments| Ok(Storage { root: args.package(0)? })))
        .unwrap()
        .add_argument(ferrous_container::PackageReference::new("fs"));
    container
        .register("broken", Target::new(|args: Arguments| Ok(Storage { root: args.package(0)? })))
        .unwrap()
        .add_argument(ferrous_container::PackageReference::new("net"));

    assert_eq!(*container.get_as::<Storage>("storage").unwrap().root, "/srv/data");
    assert_eq!(
        container.get("broken").unwrap_err(),
        DiError::PackageNotFound { id: "net".into() }
    );
}

#[test]
fn test_container_as_service() {
    let mut container = ContainerBuilder::with_options(ContainerOptions::new().container_as_service(true));
    container.register("config", config_target()).unwrap().add_argument(3);
    container.get("config").unwrap();

    let locator = container.get_as::<ServiceLocator>("service_container").unwrap();
    assert!(locator.is_set("config"));
    assert_eq!(locator.get_as::<Config>("config").unwrap().port, 3);

    let plain = ContainerBuilder::new();
    assert!(plain.get("service_container").is_err());
}

#[test]
fn test_nullable_container_reference() {
    struct Holder(Value);
    impl Service for Holder {}

    let holder = || Target::new(|args: Arguments| Ok(Holder(args.into_vec().remove(0))));

    let mut container = ContainerBuilder::with_options(ContainerOptions::new().container_as_service(true));
    container
        .register("holder", holder())
        .unwrap()
        .add_argument(Reference::nullable("service_container"));
    let injected = container.get_as::<Holder>("holder").unwrap();
    assert!(injected.0.service::<ServiceLocator>().is_some());

    let mut plain = ContainerBuilder::new();
    plain
        .register("holder", holder())
        .unwrap()
        .add_argument(Reference::nullable("service_container"));
    assert!(plain.get_as::<Holder>("holder").unwrap().0.is_null());
}

#[test]
fn test_literal_values_pass_through() {
    struct Holder(Vec<Value>);
    impl Service for Holder {}

    let list = Literal::List(vec![Literal::from("@not-a-reference"), Literal::Null]);
    let mut container = ContainerBuilder::new();
    container
        .register("holder", Target::new(|args: Arguments| Ok(Holder(args.into_vec()))))
        .unwrap()
        .add_argument(list.clone())
        .add_argument(1.5)
        .add_argument(true);

    let holder = container.get_as::<Holder>("holder").unwrap();
    assert_eq!(holder.0[0].as_literal(), Some(&list));
    assert_eq!(holder.0[1].as_literal(), Some(&Literal::Float(1.5)));
    assert_eq!(holder.0[2].as_literal(), Some(&Literal::Bool(true)));
}

#![cfg(feature = "config")]

use ferrous_container::config::{dump, ConfigLoader, ServiceEntry, ServicesConfig, TargetRegistry};
use ferrous_container::{
    Argument, Arguments, ContainerBuilder, DiError, Literal, PackageReference, Reference, Service, TagReference, Target, Value,
};
use std::sync::Arc;

struct Transport {
    dsn: String,
}
impl Service for Transport {}

struct Mailer {
    transport: Arc<Transport>,
    sender: String,
    listeners: usize,
}
impl Service for Mailer {}

struct Listener;
impl Service for Listener {}

struct Anything(Vec<Value>);
impl Service for Anything {}

fn registry() -> TargetRegistry {
    TargetRegistry::new()
        .with_target("Transport", Target::new(|args: Arguments| Ok(Transport { dsn: args.str(0)?.to_owned() })))
        .with_target(
            "Mailer",
            Target::new(|args: Arguments| {
                Ok(Mailer {
                    transport: args.service(0)?,
                    sender: args.str(1)?.to_owned(),
                    listeners: args.services::<Listener>(2)?.len(),
                })
            }),
        )
        .with_target("Listener", Target::new(|_| Ok(Listener)))
        .with_target("Anything", Target::new(|args: Arguments| Ok(Anything(args.into_vec()))))
}

const SERVICES: &str = r#"
parameters:
  mailer.dsn: smtp://localhost
  mailer.sender: "@noreply"
services:
  transport:
    class: Transport
    arguments: ['%mailer.dsn%']
    public: false
  listener.audit:
    class: Listener
    tags:
      - name: mail.listener
        attributes: { priority: 10 }
  mailer:
    class: Mailer
    arguments: ['@transport', '@@noreply', '!tagged mail.listener']
  base:
    abstract: true
    append_arguments: ['b']
  child:
    class: Anything
    arguments: ['a', '@?missing', '%fs', 3, 1.5, [x, y]]
    parent: base
    lazy: true
    shared: false
    deprecated: child is deprecated
  notifier: '@mailer'
"#;

#[test]
fn test_load_yaml() {
    let registry = registry();
    let mut container = ContainerBuilder::new();
    ConfigLoader::new(&registry).load_yaml(&mut container, SERVICES).unwrap();

    let mailer = container.get_as::<Mailer>("notifier").unwrap();
    assert_eq!(mailer.transport.dsn, "smtp://localhost");
    assert_eq!(mailer.sender, "@noreply");
    assert_eq!(mailer.listeners, 1);

    let child = container.get_definition("child").unwrap();
    let expected: Vec<Argument> = vec![
        "a".into(),
        Reference::nullable("missing").into(),
        PackageReference::new("fs").into(),
        Literal::Int(3).into(),
        Literal::Float(1.5).into(),
        Literal::List(vec!["x".into(), "y".into()]).into(),
    ];
    assert_eq!(child.arguments(), expected.as_slice());
    assert_eq!(child.parent(), Some("base"));
    assert!(!child.is_shared());
    assert!(container.get_definition("base").unwrap().is_abstract());
    assert_eq!(
        container.get_definition("mailer").unwrap().arguments()[2],
        Argument::from(TagReference::new("mail.listener"))
    );
    assert_eq!(
        container.get_parameter("mailer.sender").unwrap(),
        &Literal::from("@noreply")
    );
}

#[tokio::test]
async fn test_dump_then_load_round_trips() {
    let registry = registry();
    let mut original = ContainerBuilder::new();
    ConfigLoader::new(&registry).load_yaml(&mut original, SERVICES).unwrap();

    let dumped = dump(&original, &registry).unwrap();
    let yaml = dumped.to_yaml().unwrap();

    let mut reloaded = ContainerBuilder::new();
    ConfigLoader::new(&registry).load_yaml(&mut reloaded, &yaml).unwrap();
    assert_eq!(dump(&reloaded, &registry).unwrap(), dumped);

    for (id, definition) in original.definitions() {
        assert_eq!(reloaded.get_definition(id).unwrap(), definition, "{id}");
    }
    assert_eq!(reloaded.get_alias("notifier"), Some("mailer"));

    reloaded.compile().await.unwrap();
    assert_eq!(reloaded.get_as::<Mailer>("mailer").unwrap().sender, "@noreply");
}

#[test]
fn test_json_round_trip() {
    let registry = registry();
    let mut original = ContainerBuilder::new();
    ConfigLoader::new(&registry).load_yaml(&mut original, SERVICES).unwrap();

    let json = dump(&original, &registry).unwrap().to_json().unwrap();
    let parsed = ServicesConfig::from_json(&json).unwrap();
    assert!(matches!(parsed.services.get("notifier"), Some(ServiceEntry::Alias(target)) if target == "@mailer"));

    let mut reloaded = ContainerBuilder::new();
    ConfigLoader::new(&registry).load(&mut reloaded, parsed).unwrap();
    assert_eq!(reloaded.definitions().count(), original.definitions().count());
}

#[test]
fn test_unknown_class() {
    let registry = TargetRegistry::new();
    let mut container = ContainerBuilder::new();
    let err = ConfigLoader::new(&registry)
        .load_yaml(&mut container, "services:\n  x:\n    class: Missing\n")
        .unwrap_err();
    assert!(matches!(err, DiError::Config { ref message } if message.contains("Missing")));
}

#[test]
fn test_missing_parameter() {
    let registry = registry();
    let mut container = ContainerBuilder::new();
    let err = ConfigLoader::new(&registry)
        .load_yaml(&mut container, "services:\n  t:\n    class: Transport\n    arguments: ['%nope%']\n")
        .unwrap_err();
    assert_eq!(err, DiError::ParameterNotFound { key: "nope".into() });
}

#[test]
fn test_invalid_yaml() {
    let registry = registry();
    let mut container = ContainerBuilder::new();
    let err = ConfigLoader::new(&registry).load_yaml(&mut container, "services: [").unwrap_err();
    assert!(matches!(err, DiError::Config { .. }));
}

#[test]
fn test_dump_requires_registered_classes() {
    struct Unknown;
    impl Service for Unknown {}

    let mut container = ContainerBuilder::new();
    container.register("unknown", Target::new(|_| Ok(Unknown))).unwrap();
    assert!(matches!(dump(&container, &registry()), Err(DiError::Config { .. })));
}

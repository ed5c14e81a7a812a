#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_container::config::{dump, ConfigLoader, ServicesConfig, TargetRegistry};
use ferrous_container::{ContainerBuilder, Service, Target};

struct Plain;
impl Service for Plain {}

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = ServicesConfig::from_yaml(source) else {
        return;
    };

    let registry = TargetRegistry::new().with_target("Plain", Target::new(|_| Ok(Plain)));
    let mut container = ContainerBuilder::new();
    if ConfigLoader::new(&registry).load(&mut container, config).is_err() {
        return;
    }

    // whatever loads must dump and load again
    let dumped = dump(&container, &registry).unwrap();
    let mut reloaded = ContainerBuilder::new();
    ConfigLoader::new(&registry).load(&mut reloaded, dumped).unwrap();
    assert_eq!(reloaded.definitions().count(), container.definitions().count());
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_container::{Arguments, ContainerBuilder, DiError, Reference, Service, Target};

struct Node;
impl Service for Node {}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Each byte pair wires service `a % 16` to service `b % 16`; flags come from the high bits
    let mut container = ContainerBuilder::new();
    for pair in data.chunks_exact(2) {
        let from = format!("s{}", pair[0] % 16);
        let to = format!("s{}", pair[1] % 16);
        if !container.has_definition(&from) {
            let definition = container
                .register(from.clone(), Target::new(|_: Arguments| Ok(Node)))
                .unwrap();
            definition.set_public(pair[0] & 0x40 == 0).set_shared(pair[0] & 0x80 == 0);
        }
        let reference = if pair[1] & 0x80 == 0 { Reference::new(to) } else { Reference::nullable(to) };
        container.get_definition_mut(&from).unwrap().add_argument(reference);
    }

    for i in 0..16 {
        match container.get(format!("s{i}")) {
            Ok(_) => {}
            Err(DiError::CircularReference { path }) => {
                // a cycle path starts and ends with the same id
                assert!(path.len() >= 2);
                assert_eq!(path.first(), path.last());
            }
            Err(_) => {}
        }
    }
});

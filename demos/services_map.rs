/// Example: Loading a services map and dumping it back
///
/// Services are described in YAML with the textual argument grammar:
/// `@id` for a reference, `%key%` for a parameter and `!tagged name` for
/// every service carrying a tag. The compiled container is then dumped to
/// JSON.

use ferrous_container::config::{dump, ConfigLoader, TargetRegistry};
use ferrous_container::{Arguments, ContainerBuilder, DiResult, Service, Target};
use std::sync::Arc;

// ===== Services =====

pub struct Database {
    pub url: String,
}

impl Service for Database {}

pub struct Handler {
    pub route: String,
}

impl Service for Handler {}

pub struct Router {
    pub database: Arc<Database>,
    pub handlers: Vec<Arc<Handler>>,
}

impl Service for Router {}

const SERVICES: &str = r#"
parameters:
  database.url: postgresql://localhost:5432/app
services:
  database:
    class: Database
    arguments: ['%database.url%']
    public: false
  handler.users:
    class: Handler
    arguments: [/users]
    tags:
      - name: http.handler
  handler.orders:
    class: Handler
    arguments: [/orders]
    tags:
      - name: http.handler
  router:
    class: Router
    arguments: ['@database', '!tagged http.handler']
  http: '@router'
"#;

fn registry() -> TargetRegistry {
    TargetRegistry::new()
        .with_target("Database", Target::new(|args: Arguments| Ok(Database { url: args.str(0)?.to_owned() })))
        .with_target("Handler", Target::new(|args: Arguments| Ok(Handler { route: args.str(0)?.to_owned() })))
        .with_target(
            "Router",
            Target::new(|args: Arguments| {
                Ok(Router {
                    database: args.service(0)?,
                    handlers: args.services(1)?,
                })
            }),
        )
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> DiResult<()> {
    let registry = registry();
    let mut container = ContainerBuilder::new();
    ConfigLoader::new(&registry).load_yaml(&mut container, SERVICES)?;

    // Dump before compiling: the remove pass prunes the private database
    let map = dump(&container, &registry)?;
    println!("{}", map.to_json()?);

    container.compile().await?;

    let router = container.get_as::<Router>("http")?;
    println!("router on {}", router.database.url);
    for handler in &router.handlers {
        println!("  route {}", handler.route);
    }

    Ok(())
}

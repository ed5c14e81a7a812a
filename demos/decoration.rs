/// Example: Wrapping a service with decorators
///
/// Two decorators wrap the same mail transport. After compilation the
/// transport id resolves to the outermost decorator, and each decorator
/// receives the service it wraps through `<decorator>.inner`.

use ferrous_container::{Arguments, ContainerBuilder, DiResult, Instance, Reference, Service, Target};
use std::sync::Arc;

trait Transport: Send + Sync {
    fn send(&self, to: &str) -> String;
}

// ===== Base transport =====

pub struct SmtpTransport {
    host: String,
}

impl Service for SmtpTransport {}

impl Transport for SmtpTransport {
    fn send(&self, to: &str) -> String {
        format!("smtp://{} -> {}", self.host, to)
    }
}

// ===== Decorators =====

pub struct Logging {
    inner: Instance,
}

impl Service for Logging {}

pub struct Retrying {
    attempts: i64,
    inner: Instance,
}

impl Service for Retrying {}

fn send(instance: &Instance, to: &str) -> String {
    if let Some(smtp) = instance.downcast_ref::<SmtpTransport>() {
        return smtp.send(to);
    }
    if let Some(logging) = instance.downcast_ref::<Logging>() {
        return format!("[log] {}", send(&logging.inner, to));
    }
    if let Some(retrying) = instance.downcast_ref::<Retrying>() {
        return format!("[retry x{}] {}", retrying.attempts, send(&retrying.inner, to));
    }
    format!("<{}>", instance.type_name())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> DiResult<()> {
    let mut container = ContainerBuilder::new();

    container
        .register("transport", Target::new(|args: Arguments| Ok(SmtpTransport { host: args.str(0)?.to_owned() })))?
        .add_argument("mail.example.com");

    // Lower priority wraps first, so logging ends up innermost
    container
        .register("transport.logging", Target::new(|args: Arguments| {
            let inner: Arc<dyn Service> = match args.get(0) {
                Some(ferrous_container::Value::Service(instance)) => instance.clone(),
                _ => return Err(ferrous_container::DiError::InvalidArgument { index: 0, expected: "service" }),
            };
            Ok(Logging { inner })
        }))?
        .add_argument(Reference::new("transport.logging.inner"))
        .set_decorated_service("transport", 1);

    container
        .register("transport.retrying", Target::new(|args: Arguments| {
            let inner = match args.get(1) {
                Some(ferrous_container::Value::Service(instance)) => instance.clone(),
                _ => return Err(ferrous_container::DiError::InvalidArgument { index: 1, expected: "service" }),
            };
            Ok(Retrying { attempts: args.int(0)?, inner })
        }))?
        .add_argument(3)
        .add_argument(Reference::new("transport.retrying.inner"))
        .set_decorated_service("transport", 5);

    container.compile().await?;

    let transport = container.get("transport")?;
    println!("{}", send(&transport, "ops@example.com"));

    let original = container.get("transport.logging.inner")?;
    println!("original: {}", send(&original, "ops@example.com"));

    for (alias, id) in container.aliases() {
        println!("alias {alias} -> {id}");
    }

    Ok(())
}

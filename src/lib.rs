//! # ferrous-container
//!
//! A compiled service container: register definitions, compile once, resolve
//! services by id.
//!
//! ## Features
//!
//! - **Definitions as data**: constructor arguments, properties, setter calls,
//!   tags, factories, parent templates and decorators
//! - **Compiler passes**: five ordered phases with priorities; decoration,
//!   eager building and pruning of private services come built in
//! - **Visibility**: private services are injectable but not retrievable
//! - **Circular reference detection** with the full dependency chain
//! - **Services maps** (feature `config`): load and dump YAML or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_container::{Arguments, ContainerBuilder, Reference, Service, Target};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//! impl Service for Database {}
//!
//! struct UserRepository {
//!     db: Arc<Database>,
//! }
//! impl Service for UserRepository {}
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> ferrous_container::DiResult<()> {
//! let mut container = ContainerBuilder::new();
//! container
//!     .register("db", Target::new(|args: Arguments| Ok(Database { url: args.str(0)?.to_owned() })))?
//!     .add_argument("postgres://localhost");
//! container
//!     .register("users", Target::new(|args: Arguments| Ok(UserRepository { db: args.service(0)? })))?
//!     .add_argument(Reference::new("db"));
//!
//! container.compile().await?;
//!
//! let users = container.get_as::<UserRepository>("users")?;
//! assert_eq!(users.db.url, "postgres://localhost");
//! # Ok(())
//! # }
//! ```
//!
//! ## Decoration
//!
//! ```rust
//! use ferrous_container::{Arguments, ContainerBuilder, Reference, Service, Target};
//! use std::sync::Arc;
//!
//! struct Mailer;
//! impl Service for Mailer {}
//!
//! struct LoggingMailer {
//!     inner: Arc<Mailer>,
//! }
//! impl Service for LoggingMailer {}
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> ferrous_container::DiResult<()> {
//! let mut container = ContainerBuilder::new();
//! container.register("mailer", Target::new(|_| Ok(Mailer)))?;
//! container
//!     .register("logging_mailer", Target::new(|args: Arguments| Ok(LoggingMailer { inner: args.service(0)? })))?
//!     .add_argument(Reference::new("logging_mailer.inner"))
//!     .set_decorated_service("mailer", 0);
//!
//! container.compile().await?;
//!
//! assert!(container.get("mailer")?.is::<LoggingMailer>());
//! assert!(container.get("logging_mailer.inner")?.is::<Mailer>());
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod container;
pub mod definition;
pub mod error;
pub mod extension;
pub mod instance;
pub mod key;
pub mod logger;
pub mod package;
pub mod reference;
pub mod service;
pub mod value;

#[cfg(feature = "config")]
pub mod config;

// Internal modules
mod internal;

// Re-exports
pub use compiler::passes::{DecoratePass, OptimizePass, RemovePass};
pub use compiler::{Compiler, CompilerPass, DefaultPasses, Phase};
pub use container::{ContainerBuilder, ContainerOptions};
pub use definition::{Definition, Factory, FactorySource, MethodCall, Tag};
pub use error::{DiError, DiResult};
pub use extension::Extension;
pub use instance::{ServiceLocator, SERVICE_CONTAINER_ID};
pub use key::ServiceId;
pub use logger::{Logger, TracingLogger};
pub use package::{PackageRegistry, PackageResolver};
pub use reference::{Argument, PackageReference, Reference, TagReference};
pub use service::{AsAny, Constructible, Instance, Service, StaticMethod, Target};
pub use value::{Arguments, Literal, Package, Value};

//! Services maps: loading definitions from YAML or JSON and dumping them back.
//!
//! A services map has two sections. `parameters` holds plain values,
//! `services` maps ids to either a definition or an alias (`"@target"`).
//! Inside `arguments`, `properties`, `calls` and `append_arguments`, strings
//! follow a small grammar:
//!
//! | Form              | Meaning                                   |
//! |-------------------|-------------------------------------------|
//! | `@id`             | reference to service `id`                 |
//! | `@?id`            | nullable reference                        |
//! | `%key%`           | value of parameter `key`                  |
//! | `%env(NAME)%`     | environment variable `NAME`               |
//! | `%pkg`            | external package `pkg`                    |
//! | `!tagged name`    | every service tagged `name`               |
//! | `@@x`, `%%x`, `!!x` | the literal string `@x`, `%x`, `!x`     |
//!
//! Anything else is a literal. Class names are mapped to [`Target`]s through
//! a [`TargetRegistry`].
//!
//! ```yaml
//! parameters:
//!   mailer.dsn: smtp://localhost
//! services:
//!   transport:
//!     class: Transport
//!     arguments: ['%mailer.dsn%']
//!     public: false
//!   mailer:
//!     class: Mailer
//!     arguments: ['@transport']
//!     tags: [{ name: notifier }]
//!   notifier: '@mailer'
//! ```

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};
use crate::service::Target;
use crate::value::Literal;

pub mod dump;
pub mod loader;

pub use dump::dump;
pub use loader::ConfigLoader;

/// Root of a services map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, Literal>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub services: IndexMap<String, ServiceEntry>,
}

impl ServicesConfig {
    pub fn from_yaml(source: &str) -> DiResult<Self> {
        serde_yaml::from_str(source).map_err(|err| DiError::Config { message: format!("invalid YAML services map: {err}") })
    }

    pub fn from_json(source: &str) -> DiResult<Self> {
        serde_json::from_str(source).map_err(|err| DiError::Config { message: format!("invalid JSON services map: {err}") })
    }

    pub fn to_yaml(&self) -> DiResult<String> {
        serde_yaml::to_string(self).map_err(|err| DiError::Config { message: format!("YAML serialization failed: {err}") })
    }

    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| DiError::Config { message: format!("JSON serialization failed: {err}") })
    }
}

/// A service entry: an alias (`"@target"`) or a full definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceEntry {
    Alias(String),
    Definition(Box<ServiceConfig>),
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

fn default_true() -> bool {
    true
}

/// One definition in a services map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Literal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub append_arguments: Vec<Literal>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Literal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<CallConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagConfig>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub public: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub shared: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub lazy: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub synthetic: bool,
    #[serde(default, rename = "abstract", skip_serializing_if = "is_false")]
    pub abstract_: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorates: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub decoration_priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<FactoryConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            class: None,
            arguments: Vec::new(),
            append_arguments: Vec::new(),
            properties: IndexMap::new(),
            calls: Vec::new(),
            tags: Vec::new(),
            public: true,
            shared: true,
            lazy: false,
            synthetic: false,
            abstract_: false,
            deprecated: None,
            parent: None,
            decorates: None,
            decoration_priority: 0,
            factory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallConfig {
    pub method: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Literal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Literal>,
}

/// `class::method` or `@service::method`. Exactly one of `class` and
/// `service` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub method: String,
}

/// Maps class names used in services maps to [`Target`]s.
///
/// ```
/// use ferrous_container::config::TargetRegistry;
/// use ferrous_container::{Service, Target};
///
/// struct Clock;
/// impl Service for Clock {}
///
/// let registry = TargetRegistry::new().with_target("Clock", Target::new(|_| Ok(Clock)));
/// assert!(registry.get("Clock").is_ok());
/// assert_eq!(registry.name_of(&Target::new(|_| Ok(Clock))), Some("Clock"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: HashMap<String, Target>,
    names: HashMap<TypeId, String>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, class: impl Into<String>, target: Target) -> Self {
        self.insert(class, target);
        self
    }

    pub fn insert(&mut self, class: impl Into<String>, target: Target) {
        let class = class.into();
        self.names.insert(target.type_id(), class.clone());
        self.targets.insert(class, target);
    }

    pub fn get(&self, class: &str) -> DiResult<&Target> {
        self.targets
            .get(class)
            .ok_or_else(|| DiError::Config { message: format!("unknown class {class}") })
    }

    /// The class name registered for the type `target` builds.
    pub fn name_of(&self, target: &Target) -> Option<&str> {
        self.names.get(&target.type_id()).map(String::as_str)
    }
}

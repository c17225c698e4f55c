//! Rules turning URL components into configuration entries.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::query::query_to_native_types;
use super::url::{Component, UrlComponents};

type MappingFunction = Arc<dyn Fn(&UrlComponents, &str) -> Value + Send + Sync>;

/// How one configuration entry is derived from the URL.
#[derive(Clone)]
pub enum Mapping {
    /// Copies a component as-is (`null` when absent).
    Component(Component),
    /// Computes the entry from all components; also receives the entry's key.
    Function(MappingFunction),
}

impl Mapping {
    /// Creates a [`Mapping::Function`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cumulus::dsn::{Mapping, Mappings, UrlComponents};
    /// use serde_json::Value;
    ///
    /// let upper_host = Mapping::function(|components: &UrlComponents, _key: &str| {
    ///     components
    ///         .host
    ///         .as_deref()
    ///         .map_or(Value::Null, |host| Value::from(host.to_uppercase()))
    /// });
    ///
    /// let mappings = Mappings::new().with("host", upper_host);
    /// let components = UrlComponents::parse("redis://cache.local").unwrap();
    /// assert_eq!(mappings.apply(&components)["host"], "CACHE.LOCAL");
    /// ```
    pub fn function<F>(function: F) -> Self
    where
        F: Fn(&UrlComponents, &str) -> Value + Send + Sync + 'static,
    {
        Self::Function(Arc::new(function))
    }

    /// Evaluates the mapping for the entry named `key`.
    #[must_use]
    pub fn resolve(&self, components: &UrlComponents, key: &str) -> Value {
        match self {
            Self::Component(component) => components.value(*component),
            Self::Function(function) => function(components, key),
        }
    }
}

impl From<Component> for Mapping {
    fn from(component: Component) -> Self {
        Self::Component(component)
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(component) => formatter.debug_tuple("Component").field(component).finish(),
            Self::Function(_) => formatter.write_str("Function(..)"),
        }
    }
}

/// An ordered set of configuration keys and their [`Mapping`]s.
///
/// The configuration produced by [`apply`](Mappings::apply) lists its keys
/// in this order.
#[derive(Clone, Debug, Default)]
pub struct Mappings {
    entries: Vec<(String, Mapping)>,
}

impl Mappings {
    /// Creates an empty set of mappings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The mappings used by [`Dsn`](super::Dsn) unless told otherwise.
    ///
    /// | key | value |
    /// |-----|-------|
    /// | `driver` | scheme |
    /// | `port` | port |
    /// | `host` | host |
    /// | `username` | user |
    /// | `password` | pass |
    /// | `database` | path without its leading `/` |
    /// | `params` | query decoded by [`query_to_native_types`] |
    /// | `fragment` | fragment |
    /// | `pdo` | `"{scheme}:host={host};dbname={database}"` |
    #[must_use]
    pub fn defaults() -> Self {
        Self::new()
            .with("driver", Component::Scheme)
            .with("port", Component::Port)
            .with("host", Component::Host)
            .with("username", Component::User)
            .with("password", Component::Pass)
            .with(
                "database",
                Mapping::function(|components: &UrlComponents, _: &str| {
                    components
                        .path
                        .as_deref()
                        .map_or(Value::Null, |path| Value::from(database_name(path)))
                }),
            )
            .with(
                "params",
                Mapping::function(|components: &UrlComponents, _: &str| {
                    components
                        .query
                        .as_deref()
                        .map_or(Value::Null, |query| Value::Object(query_to_native_types(query)))
                }),
            )
            .with("fragment", Component::Fragment)
            .with(
                "pdo",
                Mapping::function(|components: &UrlComponents, _: &str| {
                    Value::from(format!(
                        "{}:host={};dbname={}",
                        components.scheme.as_deref().unwrap_or_default(),
                        components.host.as_deref().unwrap_or_default(),
                        database_name(components.path.as_deref().unwrap_or_default()),
                    ))
                }),
            )
    }

    /// Sets the mapping for `key`.
    ///
    /// An existing key keeps its position and gets the new mapping; a new key
    /// is appended.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, mapping: impl Into<Mapping>) -> Self {
        let key = key.into();
        let mapping = mapping.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = mapping,
            None => self.entries.push((key, mapping)),
        }
        self
    }

    /// Lays `overrides` over these mappings, entry by entry, as [`with`](Mappings::with) does.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        overrides
            .entries
            .into_iter()
            .fold(self, |merged, (key, mapping)| merged.with(key, mapping))
    }

    /// Returns the configured keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the configuration for `components`.
    ///
    /// Every key is present in the result; entries whose source is missing
    /// are `null`.
    #[must_use]
    pub fn apply(&self, components: &UrlComponents) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(key, mapping)| (key.clone(), mapping.resolve(components, key)))
            .collect()
    }
}

fn database_name(path: &str) -> &str {
    path.trim_start_matches('/')
}

use std::fmt;

use fnv::FnvHashMap;
use serde_json::Value;
use thiserror::Error as ThisError;

use super::args::Arguments;
use crate::types::InterfaceType;

/// A failure reported by a resolver. Recorded as a field error at the
/// resolver's slot.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ResolverError {
    message: String,
}

impl ResolverError {
    pub fn new(message: impl Into<String>) -> ResolverError {
        ResolverError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ResolverError {
    fn from(message: String) -> Self {
        ResolverError { message }
    }
}

impl From<&str> for ResolverError {
    fn from(message: &str) -> Self {
        ResolverError::new(message)
    }
}

/// Produces a field's raw value from its parent value and bound arguments.
pub trait Resolver: Send + Sync {
    fn resolve(&self, parent: &Value, args: &Arguments) -> Result<Value, ResolverError>;
}

impl<F> Resolver for F
where
    F: Fn(&Value, &Arguments) -> Result<Value, ResolverError> + Send + Sync,
{
    fn resolve(&self, parent: &Value, args: &Arguments) -> Result<Value, ResolverError> {
        self(parent, args)
    }
}

/// Picks the concrete object type of a value reached through an interface.
pub trait TypeResolver: Send + Sync {
    fn resolve_type(&self, interface: &InterfaceType, value: &Value) -> Option<String>;
}

impl<F> TypeResolver for F
where
    F: Fn(&InterfaceType, &Value) -> Option<String> + Send + Sync,
{
    fn resolve_type(&self, interface: &InterfaceType, value: &Value) -> Option<String> {
        self(interface, value)
    }
}

/// Reads the concrete type name from a member of the value itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypenameField {
    member: String,
}

impl TypenameField {
    pub fn new(member: impl Into<String>) -> TypenameField {
        TypenameField {
            member: member.into(),
        }
    }
}

impl Default for TypenameField {
    fn default() -> Self {
        TypenameField::new("__typename")
    }
}

impl TypeResolver for TypenameField {
    fn resolve_type(&self, _interface: &InterfaceType, value: &Value) -> Option<String> {
        value.get(&self.member)?.as_str().map(str::to_string)
    }
}

/// Resolvers keyed by type name, then field name.
///
/// Fields without a registered resolver read the same-named member of their
/// parent value, so an empty registry is enough to serve plain JSON.
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: FnvHashMap<String, FnvHashMap<String, Box<dyn Resolver>>>,
    type_resolver: Option<Box<dyn TypeResolver>>,
}

impl ResolverRegistry {
    pub fn new() -> ResolverRegistry {
        ResolverRegistry::default()
    }

    pub fn register<R>(&mut self, type_name: &str, field_name: &str, resolver: R)
    where
        R: Resolver + 'static,
    {
        self.resolvers
            .entry(type_name.to_string())
            .or_default()
            .insert(field_name.to_string(), Box::new(resolver));
    }

    /// Registers a closure. Closures passed here get their argument types
    /// inferred, unlike those passed to [`ResolverRegistry::register`].
    pub fn register_fn<F>(&mut self, type_name: &str, field_name: &str, f: F)
    where
        F: Fn(&Value, &Arguments) -> Result<Value, ResolverError> + Send + Sync + 'static,
    {
        self.register(type_name, field_name, f)
    }

    pub fn with_resolver<R>(mut self, type_name: &str, field_name: &str, resolver: R) -> Self
    where
        R: Resolver + 'static,
    {
        self.register(type_name, field_name, resolver);
        self
    }

    pub fn with_fn<F>(mut self, type_name: &str, field_name: &str, f: F) -> Self
    where
        F: Fn(&Value, &Arguments) -> Result<Value, ResolverError> + Send + Sync + 'static,
    {
        self.register_fn(type_name, field_name, f);
        self
    }

    pub fn with_type_resolver<T>(mut self, type_resolver: T) -> Self
    where
        T: TypeResolver + 'static,
    {
        self.type_resolver = Some(Box::new(type_resolver));
        self
    }

    pub fn lookup(&self, type_name: &str, field_name: &str) -> Option<&dyn Resolver> {
        self.resolvers
            .get(type_name)?
            .get(field_name)
            .map(|resolver| &**resolver)
    }

    pub fn type_resolver(&self) -> Option<&dyn TypeResolver> {
        self.type_resolver.as_deref()
    }

    pub fn len(&self) -> usize {
        self.resolvers.values().map(|fields| fields.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<String> = self
            .resolvers
            .iter()
            .flat_map(|(t, fields)| fields.keys().map(move |field| format!("{}.{}", t, field)))
            .collect();
        fields.sort();
        f.debug_struct("ResolverRegistry")
            .field("resolvers", &fields)
            .field("type_resolver", &self.type_resolver.is_some())
            .finish()
    }
}

/// Reads the member named `field_name` off `parent`; anything else is null.
pub(crate) fn default_resolve(parent: &Value, field_name: &str) -> Value {
    parent.get(field_name).cloned().unwrap_or(Value::Null)
}

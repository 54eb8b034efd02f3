//! Query execution.
//!
//! An [`Executor`] walks the selected operation of a [`QueryDoc`] against a
//! [`Schema`], calling resolvers from a [`ResolverRegistry`] and completing
//! every raw value against its declared [`TypeRef`].
//!
//! Errors are recorded once, at the path where they happen. A failure at a
//! nullable position becomes `null` there. A failure at a non-null position
//! makes the position's parent null instead, and so on up to the nearest
//! nullable ancestor; if there is none, `data` is null.

use indexmap::IndexMap;
use log::{debug, trace, warn};
use rayon::prelude::*;
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::types::{InterfaceType, NamedType, ObjectType, TypeRef};
use crate::{parse_query, Error, Field, OpType, Operation, QueryDoc, Schema};

mod args;
pub use args::Arguments;

mod cancel;
pub use cancel::CancellationToken;

mod resolver;
pub use resolver::{Resolver, ResolverError, ResolverRegistry, TypeResolver, TypenameField};

mod response;
pub use response::{ErrorKind, ExecutionError, PathSegment, Response, ResultNode};

/// Errors that prevent an execution from producing a response at all.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("{op_type} operations are not supported")]
    UnsupportedOperation { op_type: &'static str },

    #[error("query document has no operations")]
    NoOperation,

    #[error("unknown operation: {name:?}")]
    UnknownOperation { name: String },

    #[error("document has {count} operations and no operation name was given")]
    AmbiguousOperation { count: usize },

    #[error("root type not found: {name:?}")]
    MissingRootType { name: String },
}

/// How sibling fields of one selection set are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// One after another on the calling thread.
    #[default]
    Serial,
    /// Concurrently on the rayon thread pool. Output is identical to `Serial`.
    Parallel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub strategy: Strategy,
}

impl ExecutorConfig {
    pub fn new() -> ExecutorConfig {
        ExecutorConfig::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> ExecutorConfig {
        self.strategy = strategy;
        self
    }
}

/// Runs the sole (or the named) query operation of `doc` with default settings.
pub fn execute_query(
    schema: &Schema,
    doc: &QueryDoc<'_>,
    resolvers: &ResolverRegistry,
    root: &Value,
    cancellation: &CancellationToken,
) -> Result<Response, RequestError> {
    Executor::new(schema, resolvers).execute(doc, None, root, cancellation)
}

pub struct Executor<'s> {
    schema: &'s Schema,
    resolvers: &'s ResolverRegistry,
    config: ExecutorConfig,
}

impl<'s> Executor<'s> {
    pub fn new(schema: &'s Schema, resolvers: &'s ResolverRegistry) -> Executor<'s> {
        Executor {
            schema,
            resolvers,
            config: ExecutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Executor<'s> {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn execute(
        &self,
        doc: &QueryDoc<'_>,
        operation_name: Option<&str>,
        root: &Value,
        cancellation: &CancellationToken,
    ) -> Result<Response, RequestError> {
        let operation = select_operation(doc, operation_name)?;
        let op_type = operation.op_type();
        if op_type != OpType::Query {
            return Err(RequestError::UnsupportedOperation {
                op_type: op_type.as_str(),
            });
        }
        let root_type = self
            .schema
            .query_type()
            .map_err(|_| RequestError::MissingRootType {
                name: self.schema.query_type_name().to_string(),
            })?;
        debug!(
            "executing query {} on {} ({:?})",
            operation.name().map_or("<anonymous>", |name| name.as_str()),
            root_type.name(),
            self.config.strategy
        );

        let ctx = Context {
            schema: self.schema,
            resolvers: self.resolvers,
            strategy: self.config.strategy,
            cancellation,
        };
        let mut errors = Vec::new();
        let selections = operation.selection_set();
        let data = ctx
            .resolve_selection_set(root_type, None, root, selections, &[], &mut errors)
            .unwrap_or(ResultNode::Null);
        debug!("execution finished with {} errors", errors.len());
        Ok(Response::new(data, errors))
    }

    /// Parses `query` and executes it.
    pub fn execute_str(
        &self,
        query: &str,
        operation_name: Option<&str>,
        root: &Value,
        cancellation: &CancellationToken,
    ) -> Result<Response, Error> {
        let doc = parse_query(query)?;
        let response = self.execute(&doc, operation_name, root, cancellation)?;
        Ok(response)
    }
}

fn select_operation<'d, 'a>(
    doc: &'d QueryDoc<'a>,
    operation_name: Option<&str>,
) -> Result<&'d Operation<'a>, RequestError> {
    match (operation_name, doc.definitions.as_slice()) {
        (_, []) => Err(RequestError::NoOperation),
        (Some(name), definitions) => definitions
            .iter()
            .find(|op| op.name().map(|n| n.as_str()) == Some(name))
            .ok_or_else(|| RequestError::UnknownOperation {
                name: name.to_string(),
            }),
        (None, [only]) => Ok(only),
        (None, definitions) => Err(RequestError::AmbiguousOperation {
            count: definitions.len(),
        }),
    }
}

/// Signals that a non-null position failed; the error is already recorded and
/// the nearest nullable ancestor must become null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bubble;

type Completion = Result<ResultNode, Bubble>;

struct FieldOutcome<'q> {
    key: &'q str,
    result: Completion,
    errors: Vec<ExecutionError>,
}

struct Context<'e> {
    schema: &'e Schema,
    resolvers: &'e ResolverRegistry,
    strategy: Strategy,
    cancellation: &'e CancellationToken,
}

impl<'e> Context<'e> {
    /// Resolves `selections` on `object`. When the object was reached through
    /// an interface, fields are looked up on `interface` first.
    fn resolve_selection_set(
        &self,
        object: &ObjectType,
        interface: Option<&InterfaceType>,
        parent: &Value,
        selections: &[Field<'_>],
        path: &[PathSegment],
        errors: &mut Vec<ExecutionError>,
    ) -> Completion {
        let outcomes: Vec<FieldOutcome<'_>> = match self.strategy {
            Strategy::Serial => selections
                .iter()
                .map(|field| self.resolve_field(object, interface, parent, field, path))
                .collect(),
            Strategy::Parallel => selections
                .par_iter()
                .map(|field| self.resolve_field(object, interface, parent, field, path))
                .collect(),
        };

        let mut map = IndexMap::with_capacity(outcomes.len());
        let mut bubbled = false;
        for outcome in outcomes {
            errors.extend(outcome.errors);
            match outcome.result {
                Ok(node) => {
                    map.insert(outcome.key.to_string(), node);
                }
                Err(Bubble) => bubbled = true,
            }
        }
        if bubbled {
            Err(Bubble)
        } else {
            Ok(ResultNode::Object(map))
        }
    }

    fn resolve_field<'q>(
        &self,
        object: &ObjectType,
        interface: Option<&InterfaceType>,
        parent: &Value,
        field: &'q Field<'_>,
        path: &[PathSegment],
    ) -> FieldOutcome<'q> {
        let key = field.response_name();
        let mut field_path = path.to_vec();
        field_path.push(PathSegment::Field(key.to_string()));
        let mut errors = Vec::new();
        let result =
            self.resolve_field_value(object, interface, parent, field, &field_path, &mut errors);
        FieldOutcome {
            key,
            result,
            errors,
        }
    }

    fn resolve_field_value(
        &self,
        object: &ObjectType,
        interface: Option<&InterfaceType>,
        parent: &Value,
        field: &Field<'_>,
        path: &[PathSegment],
        errors: &mut Vec<ExecutionError>,
    ) -> Completion {
        let field_name = field.name.as_str();
        // without fragments, only the interface's own fields are selectable
        let visible = interface.map_or(true, |i| i.field(field_name).is_ok());
        let def = match object.field(field_name) {
            Ok(def) if visible => def,
            _ => {
                let type_name = interface.map_or(object.name(), |i| i.name());
                let message = format!(
                    "cannot query field \"{}\" on type \"{}\"",
                    field_name, type_name
                );
                errors.push(ExecutionError::new(ErrorKind::UnknownField, message, path));
                return Ok(ResultNode::Null);
            }
        };
        let ty = def.ty();

        if let Err(message) = self.check_selection(ty, &field.selection_set) {
            return fail(ty, ErrorKind::InvalidSelection, message, path, errors);
        }

        if self.cancellation.is_cancelled() {
            warn!("execution cancelled before {}.{}", object.name(), field_name);
            return fail(ty, ErrorKind::ExecutionCancelled, "execution cancelled", path, errors);
        }

        let args = match args::bind(self.schema, def, &field.arguments) {
            Ok(args) => args,
            Err(e) => return fail(ty, e.kind, e.message, path, errors),
        };

        trace!("resolving {}.{}", object.name(), field_name);
        let raw = match self.resolvers.lookup(object.name(), field_name) {
            Some(resolver) => match resolver.resolve(parent, &args) {
                Ok(raw) => raw,
                Err(e) => return fail(ty, ErrorKind::Resolver, e.message(), path, errors),
            },
            None => resolver::default_resolve(parent, field_name),
        };
        self.complete_value(ty, &raw, &field.selection_set, path, errors)
    }

    fn complete_value(
        &self,
        ty: &TypeRef,
        raw: &Value,
        selections: &[Field<'_>],
        path: &[PathSegment],
        errors: &mut Vec<ExecutionError>,
    ) -> Completion {
        match ty {
            TypeRef::NonNull(inner) => {
                if raw.is_null() {
                    let message = format!("null returned for non-null type {}", ty);
                    errors.push(ExecutionError::new(
                        ErrorKind::NullOnRequiredField,
                        message,
                        path,
                    ));
                    return Err(Bubble);
                }
                // errors below were recorded already; only propagate
                self.complete_non_null(inner, raw, selections, path, errors)
            }
            _ if raw.is_null() => Ok(ResultNode::Null),
            _ => Ok(self
                .complete_non_null(ty, raw, selections, path, errors)
                .unwrap_or(ResultNode::Null)),
        }
    }

    /// Completes a non-null `raw` against `ty`, which is not itself wrapped in
    /// non-null. Any failure is recorded and reported as `Bubble`.
    fn complete_non_null(
        &self,
        ty: &TypeRef,
        raw: &Value,
        selections: &[Field<'_>],
        path: &[PathSegment],
        errors: &mut Vec<ExecutionError>,
    ) -> Completion {
        let name = match ty {
            TypeRef::NonNull(inner) => {
                return self.complete_value(inner, raw, selections, path, errors)
            }
            TypeRef::List(element) => {
                let items = match raw.as_array() {
                    Some(items) => items,
                    None => {
                        return record(
                            errors,
                            path,
                            ErrorKind::ScalarCoercion,
                            format!("expected a list for type {}, found {}", ty, raw),
                        )
                    }
                };
                return self.complete_list(element, items, selections, path, errors);
            }
            TypeRef::Named(name) => name,
        };

        let named = match self.schema.get_type(name) {
            Ok(named) => named,
            Err(e) => return record(errors, path, ErrorKind::UnknownField, e.to_string()),
        };
        match named {
            NamedType::Scalar(scalar) => match scalar.kind().serialize(raw) {
                Ok(value) => Ok(ResultNode::Scalar(value)),
                Err(message) => record(errors, path, ErrorKind::ScalarCoercion, message),
            },
            NamedType::Enum(enum_type) => match raw.as_str() {
                Some(value) if enum_type.has_value(value) => {
                    Ok(ResultNode::Scalar(Value::String(value.to_string())))
                }
                _ => record(
                    errors,
                    path,
                    ErrorKind::EnumValue,
                    format!("{} is not a member of enum {}", raw, enum_type.name()),
                ),
            },
            NamedType::Object(object) => {
                self.resolve_selection_set(object, None, raw, selections, path, errors)
            }
            NamedType::Interface(interface) => match self.resolve_concrete_type(interface, raw) {
                Ok(object) => {
                    self.resolve_selection_set(object, Some(interface), raw, selections, path, errors)
                }
                Err(message) => record(errors, path, ErrorKind::InterfaceResolution, message),
            },
        }
    }

    /// Leaves take no selection set and objects or interfaces need one. This
    /// depends on the declared type only, never on the resolved value.
    fn check_selection(&self, ty: &TypeRef, selections: &[Field<'_>]) -> Result<(), String> {
        let name = ty.innermost_name();
        let named = self.schema.get_type(name).map_err(|e| e.to_string())?;
        match (named.is_leaf(), selections.is_empty()) {
            (true, false) => Err(format!("{} {} cannot have a selection set", named.kind(), name)),
            (false, true) => Err(format!("{} {} requires a selection set", named.kind(), name)),
            _ => Ok(()),
        }
    }

    fn complete_list(
        &self,
        element: &TypeRef,
        items: &[Value],
        selections: &[Field<'_>],
        path: &[PathSegment],
        errors: &mut Vec<ExecutionError>,
    ) -> Completion {
        let mut nodes = Vec::with_capacity(items.len());
        let mut bubbled = false;
        for (i, item) in items.iter().enumerate() {
            let mut item_path = path.to_vec();
            item_path.push(PathSegment::Index(i));
            // keep going so every failing element is reported
            match self.complete_value(element, item, selections, &item_path, errors) {
                Ok(node) => nodes.push(node),
                Err(Bubble) => bubbled = true,
            }
        }
        if bubbled {
            Err(Bubble)
        } else {
            Ok(ResultNode::List(nodes))
        }
    }

    fn resolve_concrete_type(
        &self,
        interface: &InterfaceType,
        raw: &Value,
    ) -> Result<&'e ObjectType, String> {
        let type_resolver = self
            .resolvers
            .type_resolver()
            .ok_or_else(|| format!("no type resolver for interface {}", interface.name()))?;
        let type_name = type_resolver
            .resolve_type(interface, raw)
            .ok_or_else(|| format!("could not resolve the type of a {} value", interface.name()))?;
        let object = self
            .schema
            .get_object(&type_name)
            .map_err(|_| format!("{} is not an object type", type_name))?;
        if !object.implements(interface.name()) {
            return Err(format!(
                "{} does not implement {}",
                object.name(),
                interface.name()
            ));
        }
        Ok(object)
    }
}

/// Records an error at `path` and bubbles.
fn record(
    errors: &mut Vec<ExecutionError>,
    path: &[PathSegment],
    kind: ErrorKind,
    message: String,
) -> Completion {
    errors.push(ExecutionError::new(kind, message, path));
    Err(Bubble)
}

/// Records a field-scoped error and nulls the field, or bubbles if the field
/// is non-null.
fn fail(
    ty: &TypeRef,
    kind: ErrorKind,
    message: impl Into<String>,
    path: &[PathSegment],
    errors: &mut Vec<ExecutionError>,
) -> Completion {
    errors.push(ExecutionError::new(kind, message, path));
    if ty.is_non_null() {
        Err(Bubble)
    } else {
        Ok(ResultNode::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SDL: &str = r#"
        type Query {
            a: Int
            b: Int!
            inner: Inner
            strict: Inner!
        }
        type Inner {
            x: Int!
            y: String
        }
    "#;

    fn run(query: &str, root: Value) -> Response {
        let schema = Schema::parse(SDL).unwrap();
        let resolvers = ResolverRegistry::new();
        let doc = parse_query(query).unwrap();
        execute_query(&schema, &doc, &resolvers, &root, &CancellationToken::new()).unwrap()
    }

    #[test]
    fn default_resolver_serves_plain_json() {
        let response = run(
            "{ a b inner { y x } }",
            json!({ "a": 1, "b": 2, "inner": { "x": 3, "y": "why" } }),
        );
        assert!(response.is_ok(), "{:?}", response.errors);
        assert_eq!(
            response.to_json(),
            json!({ "data": { "a": 1, "b": 2, "inner": { "y": "why", "x": 3 } } })
        );
    }

    #[test]
    fn nullable_failures_stay_in_place() {
        let response = run("{ a inner { x y } }", json!({ "a": "nope", "inner": { "y": "y" } }));
        assert_eq!(
            response.data.to_value(),
            json!({ "a": null, "inner": null })
        );
        let kinds: Vec<ErrorKind> = response.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::ScalarCoercion, ErrorKind::NullOnRequiredField]
        );
        assert_eq!(
            response.errors[1].path,
            vec![PathSegment::from("inner"), PathSegment::from("x")]
        );
    }

    #[test]
    fn non_null_failures_reach_the_root() {
        let response = run("{ a strict { x } }", json!({ "a": 1, "strict": {} }));
        assert_eq!(response.data, ResultNode::Null);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].kind, ErrorKind::NullOnRequiredField);
    }

    #[test]
    fn selection_sets_must_match_the_type() {
        let response = run("{ a { x } inner }", json!({ "a": 1, "inner": {} }));
        assert_eq!(response.data.to_value(), json!({ "a": null, "inner": null }));
        assert!(response
            .errors
            .iter()
            .all(|e| e.kind == ErrorKind::InvalidSelection));
        assert_eq!(response.errors.len(), 2);
    }

    #[test]
    fn selection_shape_does_not_depend_on_the_value() {
        let response = run("{ a { x } inner }", json!({ "a": null, "inner": null }));
        assert_eq!(response.data.to_value(), json!({ "a": null, "inner": null }));
        let paths: Vec<Vec<PathSegment>> = response.errors.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![vec![PathSegment::from("a")], vec![PathSegment::from("inner")]]
        );
        assert!(response
            .errors
            .iter()
            .all(|e| e.kind == ErrorKind::InvalidSelection));
    }

    #[test]
    fn invalid_selections_on_non_null_fields_bubble() {
        let response = run("{ a b { x } }", json!({ "a": 1, "b": null }));
        assert_eq!(response.data, ResultNode::Null);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].kind, ErrorKind::InvalidSelection);
        assert_eq!(response.errors[0].path, vec![PathSegment::from("b")]);
    }

    #[test]
    fn operations_are_selected_by_name() {
        let schema = Schema::parse(SDL).unwrap();
        let resolvers = ResolverRegistry::new();
        let executor = Executor::new(&schema, &resolvers);
        let root = json!({ "a": 1, "b": 2 });
        let token = CancellationToken::new();
        let doc = parse_query("query One { a } query Two { b }").unwrap();

        let response = executor.execute(&doc, Some("Two"), &root, &token).unwrap();
        assert_eq!(response.to_json(), json!({ "data": { "b": 2 } }));
        assert_eq!(
            executor.execute(&doc, None, &root, &token).unwrap_err(),
            RequestError::AmbiguousOperation { count: 2 }
        );
        assert_eq!(
            executor.execute(&doc, Some("Three"), &root, &token).unwrap_err(),
            RequestError::UnknownOperation {
                name: "Three".to_string()
            }
        );
        assert_eq!(
            executor
                .execute(&QueryDoc::new(), None, &root, &token)
                .unwrap_err(),
            RequestError::NoOperation
        );
    }

    #[test]
    fn only_queries_execute() {
        let schema = Schema::parse(SDL).unwrap();
        let resolvers = ResolverRegistry::new();
        let err = Executor::new(&schema, &resolvers)
            .execute_str("mutation { a }", None, &Value::Null, &CancellationToken::new())
            .unwrap_err();
        assert_eq!(
            err,
            Error::Request(RequestError::UnsupportedOperation {
                op_type: "mutation"
            })
        );
    }

    #[test]
    fn a_missing_root_type_is_a_request_error() {
        let schema = Schema::parse("type Other { a: Int }").unwrap();
        let resolvers = ResolverRegistry::new();
        let doc = parse_query("{ a }").unwrap();
        let err = execute_query(&schema, &doc, &resolvers, &Value::Null, &CancellationToken::new())
            .unwrap_err();
        assert_eq!(
            err,
            RequestError::MissingRootType {
                name: "Query".to_string()
            }
        );
    }
}

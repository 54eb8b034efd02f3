// Checks that run over a fully populated schema before it is handed out.

use log::trace;

use crate::types::{Field, InterfaceType, NamedType, ObjectType, TypeRef};
use crate::{Schema, SchemaError};

pub trait SchemaCheck {
    fn check(&self, schema: &Schema) -> Result<(), SchemaError>;
}

pub(crate) const CHECKS: &[&dyn SchemaCheck] = &[&InterfaceConformance];

/// Every object exposes each member of the interfaces it implements with a
/// compatible shape.
///
/// An object field conforms when its arguments include every interface
/// argument with an identical type, any extra arguments are nullable, and its
/// type is a subtype of the interface field's type.
pub struct InterfaceConformance;

impl SchemaCheck for InterfaceConformance {
    fn check(&self, schema: &Schema) -> Result<(), SchemaError> {
        let mut objects: Vec<&ObjectType> = schema
            .types()
            .filter_map(|t| match t {
                NamedType::Object(object) => Some(object),
                _ => None,
            })
            .collect();
        // registry order is arbitrary; report errors deterministically
        objects.sort_by(|a, b| a.name().cmp(b.name()));

        for object in objects {
            for interface_name in object.interfaces() {
                let interface = schema.get_interface(interface_name)?;
                trace!("checking {} implements {}", object.name(), interface.name());
                check_object(schema, object, interface)?;
            }
        }
        Ok(())
    }
}

fn check_object(
    schema: &Schema,
    object: &ObjectType,
    interface: &InterfaceType,
) -> Result<(), SchemaError> {
    let fail = |reason: String| SchemaError::nonconforming(object.name(), interface.name(), reason);

    for expected in interface.fields().iter() {
        let actual = object
            .field(expected.name())
            .map_err(|_| fail(format!("missing field `{}`", expected.name())))?;
        check_arguments(expected, actual).map_err(&fail)?;
        if !is_subtype(schema, actual.ty(), expected.ty()) {
            return Err(fail(format!(
                "field `{}` has type {} which is not compatible with {}",
                expected.name(),
                actual.ty(),
                expected.ty()
            )));
        }
    }
    Ok(())
}

fn check_arguments(expected: &Field, actual: &Field) -> Result<(), String> {
    for param in expected.parameters() {
        let found = actual.parameters().iter().find(|p| p.name() == param.name());
        match found {
            Some(p) if p.ty() == param.ty() => (),
            Some(p) => {
                return Err(format!(
                    "argument `{}({})` has type {} but the interface expects {}",
                    expected.name(),
                    param.name(),
                    p.ty(),
                    param.ty()
                ))
            }
            None => {
                return Err(format!(
                    "field `{}` is missing argument `{}`",
                    expected.name(),
                    param.name()
                ))
            }
        }
    }
    for extra in actual.parameters() {
        let declared = expected.parameters().iter().any(|p| p.name() == extra.name());
        if !declared && extra.required() {
            return Err(format!(
                "additional argument `{}({})` must not be required",
                actual.name(),
                extra.name()
            ));
        }
    }
    Ok(())
}

/// Whether a value of type `sub` can stand in where `sup` is expected.
pub(crate) fn is_subtype(schema: &Schema, sub: &TypeRef, sup: &TypeRef) -> bool {
    match (sub, sup) {
        (TypeRef::NonNull(a), TypeRef::NonNull(b)) => is_subtype(schema, a, b),
        (TypeRef::NonNull(a), b) => is_subtype(schema, a, b),
        (_, TypeRef::NonNull(_)) => false,
        (TypeRef::List(a), TypeRef::List(b)) => is_subtype(schema, a, b),
        (TypeRef::Named(a), TypeRef::Named(b)) => {
            a == b
                || schema
                    .get_object(a)
                    .map(|object| object.implements(b))
                    .unwrap_or(false)
        }
        _ => false,
    }
}

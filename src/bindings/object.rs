//! SerializableObject, SerializableObjectWithMetadata and UnknownSchema

use super::{call, project, read, require_class, Wrapper};
use crate::context::BridgeContext;
use crate::dispatch;
use crate::error::{check, BridgeError};
use crate::wrapper::ManagedObject;
use otio_native::{SchemaKind, SerializableObject};
use std::path::Path;

/// Construct a default native object of `kind` and wrap it
pub fn create(ctx: &BridgeContext, kind: SchemaKind, name: &str) -> Wrapper {
    let object = SerializableObject::new(kind);
    if kind.has_metadata() {
        object.set_name(name);
    }
    dispatch::project(ctx, object)
}

pub fn schema_name(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    read(wrapper, SchemaKind::SerializableObject, "schema_name", |o| o.schema_name())
}

pub fn schema_version(wrapper: &ManagedObject) -> Result<u32, BridgeError> {
    read(wrapper, SchemaKind::SerializableObject, "schema_version", |o| o.schema_version())
}

pub fn is_unknown_schema(wrapper: &ManagedObject) -> Result<bool, BridgeError> {
    read(wrapper, SchemaKind::SerializableObject, "is_unknown_schema", |o| o.is_unknown_schema())
}

/// Native shares held on the wrapped object, this wrapper's included
pub fn current_ref_count(wrapper: &ManagedObject) -> Result<u32, BridgeError> {
    read(wrapper, SchemaKind::SerializableObject, "current_ref_count", |o| o.current_ref_count())
}

pub fn name(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    read(wrapper, SchemaKind::SerializableObjectWithMetadata, "name", |o| o.name())
}

pub fn set_name(wrapper: &ManagedObject, name: &str) -> Result<(), BridgeError> {
    read(wrapper, SchemaKind::SerializableObjectWithMetadata, "set_name", |o| o.set_name(name))
}

/// Copy of the metadata as an `AnyDictionary` wrapper
pub fn metadata(wrapper: &ManagedObject) -> Result<Wrapper, BridgeError> {
    let metadata = read(wrapper, SchemaKind::SerializableObjectWithMetadata, "metadata", |o| {
        o.metadata()
    })?;
    Ok(ManagedObject::dictionary(wrapper.context(), metadata))
}

pub fn set_metadata(wrapper: &ManagedObject, metadata: &ManagedObject) -> Result<(), BridgeError> {
    require_class(wrapper, SchemaKind::SerializableObjectWithMetadata, "set_metadata")?;
    let value = metadata.with_dictionary(|d| d.clone())?;
    wrapper.with_object(|o| o.set_metadata(value))
}

/// Encode with `indent` spaces, or the configured default
pub fn to_json_string(wrapper: &ManagedObject, indent: Option<u32>) -> Result<String, BridgeError> {
    let indent = indent.unwrap_or(wrapper.context().config().serialization.indent) as usize;
    call(wrapper, SchemaKind::SerializableObject, "to_json_string", |o| {
        o.to_json_string(indent)
    })
}

pub fn to_json_file(
    wrapper: &ManagedObject,
    path: impl AsRef<Path>,
    indent: Option<u32>,
) -> Result<(), BridgeError> {
    let indent = indent.unwrap_or(wrapper.context().config().serialization.indent) as usize;
    call(wrapper, SchemaKind::SerializableObject, "to_json_file", |o| {
        o.to_json_file(path, indent)
    })
}

pub fn from_json_string(ctx: &BridgeContext, input: &str) -> Result<Wrapper, BridgeError> {
    let object = check(ctx, SerializableObject::from_json_string(input))?;
    Ok(dispatch::project(ctx, object))
}

pub fn from_json_file(ctx: &BridgeContext, path: impl AsRef<Path>) -> Result<Wrapper, BridgeError> {
    let object = check(ctx, SerializableObject::from_json_file(path))?;
    Ok(dispatch::project(ctx, object))
}

pub fn is_equivalent_to(wrapper: &ManagedObject, other: &ManagedObject) -> Result<bool, BridgeError> {
    let other = super::argument(other, SchemaKind::SerializableObject, "is_equivalent_to")?;
    read(wrapper, SchemaKind::SerializableObject, "is_equivalent_to", |o| {
        o.is_equivalent_to(&other)
    })
}

pub fn deep_copy(wrapper: &ManagedObject) -> Result<Wrapper, BridgeError> {
    let copy = call(wrapper, SchemaKind::SerializableObject, "deep_copy", |o| o.deep_copy())?;
    Ok(project(wrapper, copy))
}

pub fn original_schema_name(wrapper: &ManagedObject) -> Result<String, BridgeError> {
    call(wrapper, SchemaKind::UnknownSchema, "original_schema_name", |o| {
        o.original_schema_name()
    })
}

pub fn original_schema_version(wrapper: &ManagedObject) -> Result<u32, BridgeError> {
    call(wrapper, SchemaKind::UnknownSchema, "original_schema_version", |o| {
        o.original_schema_version()
    })
}

//! Trampolines
//!
//! Each function here is one managed-side method: check the receiver's
//! class, resolve its handle, run the native operation, route the status
//! through [`check`] and project any objects that come back.

pub mod any;
pub mod composition;
pub mod item;
pub mod object;
pub mod opentime;
pub mod reference;
pub mod timeline;

use crate::dispatch::{self, ClassDescriptor};
use crate::error::{check, BridgeError};
use crate::wrapper::ManagedObject;
use otio_native::{ErrorStatus, ObjectRetainer, SchemaKind, SerializableObject};
use std::sync::Arc;

pub type Wrapper = Arc<ManagedObject>;

pub(crate) fn require_class(
    wrapper: &ManagedObject,
    base: SchemaKind,
    operation: &str,
) -> Result<(), BridgeError> {
    if wrapper.class().is_a_schema(base) {
        Ok(())
    } else {
        Err(BridgeError::class_cast(
            operation,
            dispatch::class_for(base).qualified_name,
            wrapper.class().qualified_name,
        ))
    }
}

/// Run a native call on `wrapper`'s object once its class has been checked
pub(crate) fn call<T>(
    wrapper: &ManagedObject,
    base: SchemaKind,
    operation: &str,
    f: impl FnOnce(&SerializableObject) -> Result<T, ErrorStatus>,
) -> Result<T, BridgeError> {
    require_class(wrapper, base, operation)?;
    let result = wrapper.with_object(|retainer| f(retainer.value()))?;
    check(wrapper.context(), result)
}

/// Like [`call`] for operations that cannot fail natively
pub(crate) fn read<T>(
    wrapper: &ManagedObject,
    base: SchemaKind,
    operation: &str,
    f: impl FnOnce(&SerializableObject) -> T,
) -> Result<T, BridgeError> {
    require_class(wrapper, base, operation)?;
    wrapper.with_object(|retainer| f(retainer.value()))
}

/// Native share of an argument wrapper, checked against `base`
pub(crate) fn argument(
    wrapper: &ManagedObject,
    base: SchemaKind,
    operation: &str,
) -> Result<ObjectRetainer, BridgeError> {
    require_class(wrapper, base, operation)?;
    wrapper.retain()
}

pub(crate) fn arguments(
    wrappers: &[Wrapper],
    base: SchemaKind,
    operation: &str,
) -> Result<Vec<ObjectRetainer>, BridgeError> {
    wrappers
        .iter()
        .map(|w| argument(w, base, operation))
        .collect()
}

pub(crate) fn project(wrapper: &ManagedObject, retainer: ObjectRetainer) -> Wrapper {
    dispatch::project(wrapper.context(), retainer)
}

pub(crate) fn project_all(wrapper: &ManagedObject, retainers: Vec<ObjectRetainer>) -> Vec<Wrapper> {
    dispatch::project_all(wrapper.context(), retainers)
}

pub fn class_of(wrapper: &ManagedObject) -> &'static ClassDescriptor {
    wrapper.class()
}

//! AnyDictionary, AnyVector and AnyVector.Iterator

use super::Wrapper;
use crate::context::BridgeContext;
use crate::error::{check, BridgeError, FailureKind};
use crate::wrapper::ManagedObject;
use otio_native::{AnyDictionary, AnyValue, AnyVector};

pub fn create_dictionary(ctx: &BridgeContext) -> Wrapper {
    ManagedObject::dictionary(ctx, AnyDictionary::new())
}

pub fn create_vector(ctx: &BridgeContext) -> Wrapper {
    ManagedObject::vector(ctx, AnyVector::new())
}

pub fn dictionary_get(wrapper: &ManagedObject, key: &str) -> Result<AnyValue, BridgeError> {
    let value = wrapper.with_dictionary(|d| d.require(key).cloned())?;
    check(wrapper.context(), value)
}

pub fn dictionary_set(wrapper: &ManagedObject, key: &str, value: AnyValue) -> Result<Option<AnyValue>, BridgeError> {
    wrapper.with_dictionary(|d| d.set(key, value))
}

pub fn dictionary_remove(wrapper: &ManagedObject, key: &str) -> Result<Option<AnyValue>, BridgeError> {
    wrapper.with_dictionary(|d| d.remove(key))
}

pub fn dictionary_contains(wrapper: &ManagedObject, key: &str) -> Result<bool, BridgeError> {
    wrapper.with_dictionary(|d| d.contains_key(key))
}

pub fn dictionary_len(wrapper: &ManagedObject) -> Result<usize, BridgeError> {
    wrapper.with_dictionary(|d| d.len())
}

pub fn dictionary_keys(wrapper: &ManagedObject) -> Result<Vec<String>, BridgeError> {
    wrapper.with_dictionary(|d| d.keys().map(str::to_string).collect())
}

pub fn vector_push(wrapper: &ManagedObject, value: AnyValue) -> Result<(), BridgeError> {
    wrapper.with_vector(|v| v.push(value))
}

/// Element at `index`; negative or past-the-end indices fail
pub fn vector_get(wrapper: &ManagedObject, index: i64) -> Result<AnyValue, BridgeError> {
    let index = usize::try_from(index).map_err(|_| {
        BridgeError::new(FailureKind::IndexOutOfBounds, format!("negative index {}", index))
    })?;
    let value = wrapper.with_vector(|v| v.get(index).cloned())?;
    check(wrapper.context(), value)
}

pub fn vector_len(wrapper: &ManagedObject) -> Result<usize, BridgeError> {
    wrapper.with_vector(|v| v.len())
}

/// Iterator over a snapshot of the vector's current contents
pub fn vector_iterator(wrapper: &ManagedObject) -> Result<Wrapper, BridgeError> {
    let cursor = wrapper.with_vector(|v| v.cursor())?;
    Ok(ManagedObject::cursor(wrapper.context(), cursor))
}

pub fn iterator_has_next(wrapper: &ManagedObject) -> Result<bool, BridgeError> {
    wrapper.with_cursor(|c| c.has_next())
}

pub fn iterator_next(wrapper: &ManagedObject) -> Result<AnyValue, BridgeError> {
    wrapper
        .with_cursor(|c| c.next())?
        .ok_or_else(|| BridgeError::new(FailureKind::IndexOutOfBounds, "iterator is exhausted"))
}

pub fn iterator_has_previous(wrapper: &ManagedObject) -> Result<bool, BridgeError> {
    wrapper.with_cursor(|c| c.has_previous())
}

pub fn iterator_previous(wrapper: &ManagedObject) -> Result<AnyValue, BridgeError> {
    wrapper
        .with_cursor(|c| c.previous())?
        .ok_or_else(|| BridgeError::new(FailureKind::IndexOutOfBounds, "iterator is at the start"))
}

//! Untyped values - metadata dictionaries, value lists and list cursors
//!
//! Values are plain JSON values. They are copied across the boundary, never
//! shared, so none of these types carry a reference count.

use crate::status::{ErrorStatus, Outcome};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub type AnyValue = Value;

/// String-keyed value map with sorted keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnyDictionary {
    entries: BTreeMap<String, Value>,
}

impl AnyDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Like [`get`](Self::get) but reports a missing key as `KEY_NOT_FOUND`
    pub fn require(&self, key: &str) -> Result<&Value, ErrorStatus> {
        self.entries.get(key).ok_or_else(|| {
            ErrorStatus::with_details(Outcome::KeyNotFound, format!("no key '{}' in dictionary", key))
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        )
    }

    pub fn from_json(map: Map<String, Value>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

/// Ordered value list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnyVector {
    items: Vec<Value>,
}

impl AnyVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn get(&self, index: usize) -> Result<&Value, ErrorStatus> {
        self.items.get(index).ok_or_else(|| illegal_index(index, self.items.len()))
    }

    pub fn set(&mut self, index: usize, value: Value) -> Result<Value, ErrorStatus> {
        let len = self.items.len();
        let slot = self.items.get_mut(index).ok_or_else(|| illegal_index(index, len))?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn remove(&mut self, index: usize) -> Result<Value, ErrorStatus> {
        if index >= self.items.len() {
            return Err(illegal_index(index, self.items.len()));
        }
        Ok(self.items.remove(index))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Cursor positioned before the first element, over a snapshot of the list
    pub fn cursor(&self) -> AnyVectorCursor {
        AnyVectorCursor {
            items: self.items.clone(),
            position: 0,
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Array(self.items.clone())
    }

    pub fn from_json(items: Vec<Value>) -> Self {
        Self { items }
    }
}

fn illegal_index(index: usize, len: usize) -> ErrorStatus {
    ErrorStatus::with_details(
        Outcome::IllegalIndex,
        format!("index {} out of range for length {}", index, len),
    )
}

/// Bidirectional cursor; the position sits between elements
#[derive(Debug, Clone)]
pub struct AnyVectorCursor {
    items: Vec<Value>,
    position: usize,
}

impl AnyVectorCursor {
    pub fn has_next(&self) -> bool {
        self.position < self.items.len()
    }

    pub fn next(&mut self) -> Option<Value> {
        let value = self.items.get(self.position)?.clone();
        self.position += 1;
        Some(value)
    }

    pub fn has_previous(&self) -> bool {
        self.position > 0
    }

    pub fn previous(&mut self) -> Option<Value> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(self.items[self.position].clone())
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod property_key;

pub use property_key::PropertyKey;

use super::{Function, Value};
use crate::heap::{
    Array, OrdinaryObject,
    heap_gc::{HeapMarkAndSweep, WorkQueues},
};

/// Any value of the Object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Object {
    Object(OrdinaryObject),
    Array(Array),
    Function(Function),
}

impl TryFrom<Value> for Object {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(o) => Ok(Object::Object(o)),
            Value::Array(a) => Ok(Object::Array(a)),
            Value::Function(f) => Ok(Object::Function(f)),
            _ => Err(()),
        }
    }
}

impl From<OrdinaryObject> for Object {
    fn from(value: OrdinaryObject) -> Self {
        Object::Object(value)
    }
}

impl From<Array> for Object {
    fn from(value: Array) -> Self {
        Object::Array(value)
    }
}

impl From<Function> for Object {
    fn from(value: Function) -> Self {
        Object::Function(value)
    }
}

/// Storage of an ordinary object: its \[\[Prototype\]\] and its own data
/// properties in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ObjectHeapData {
    pub(crate) prototype: Option<OrdinaryObject>,
    pub(crate) keys: Vec<PropertyKey>,
    pub(crate) values: Vec<Value>,
}

impl ObjectHeapData {
    pub(crate) fn new(prototype: Option<OrdinaryObject>) -> Self {
        Self {
            prototype,
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    fn position(&self, key: PropertyKey) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }

    pub(crate) fn get_own(&self, key: PropertyKey) -> Option<Value> {
        self.position(key).map(|index| self.values[index])
    }

    pub(crate) fn has_own(&self, key: PropertyKey) -> bool {
        self.position(key).is_some()
    }

    pub(crate) fn set_own(&mut self, key: PropertyKey, value: Value) {
        match self.position(key) {
            Some(index) => self.values[index] = value,
            None => {
                self.keys.push(key);
                self.values.push(value);
            }
        }
    }

    pub(crate) fn delete_own(&mut self, key: PropertyKey) -> bool {
        if let Some(index) = self.position(key) {
            self.keys.remove(index);
            self.values.remove(index);
        }
        true
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (PropertyKey, Value)> + '_ {
        self.keys.iter().copied().zip(self.values.iter().copied())
    }
}

impl HeapMarkAndSweep for Object {
    fn mark_values(&self, queues: &mut WorkQueues) {
        match self {
            Object::Object(o) => o.mark_values(queues),
            Object::Array(a) => a.mark_values(queues),
            Object::Function(f) => f.mark_values(queues),
        }
    }
}

impl HeapMarkAndSweep for ObjectHeapData {
    fn mark_values(&self, queues: &mut WorkQueues) {
        self.prototype.mark_values(queues);
        self.keys.mark_values(queues);
        self.values.mark_values(queues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_properties_keep_insertion_order() {
        let mut data = ObjectHeapData::new(None);
        data.set_own(PropertyKey::Index(1), Value::Number(1.0));
        data.set_own(PropertyKey::Index(0), Value::Number(0.0));
        data.set_own(PropertyKey::Index(1), Value::Number(2.0));
        let entries: Vec<_> = data.entries().collect();
        assert_eq!(
            entries,
            vec![
                (PropertyKey::Index(1), Value::Number(2.0)),
                (PropertyKey::Index(0), Value::Number(0.0)),
            ]
        );
    }

    #[test]
    fn deleting_a_missing_property_succeeds() {
        let mut data = ObjectHeapData::new(None);
        assert!(data.delete_own(PropertyKey::Index(7)));
        assert!(!data.has_own(PropertyKey::Index(7)));
    }
}
